//! Offer commands: new, show, list, transition, next.

use clap::Subcommand;
use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

use crate::{
    lifecycle::{Lifecycle, TransitionRequest},
    model::{Offer, OfferStatus, OfferTerms},
    storage::OfferStore,
};

use super::format::{format_error, format_offer_line, format_statuses, short_id};

#[derive(Debug, Subcommand)]
pub enum OfferCommand {
    /// Open a new offer as the buyer. Prints the offer ID.
    New {
        /// Product being bought.
        #[arg(long)]
        product: String,

        /// The seller who listed the product.
        #[arg(long)]
        seller: String,

        /// Agreed price.
        #[arg(long)]
        price: f64,

        /// Agreed quantity.
        #[arg(long)]
        quantity: f64,

        /// Delivery options (e.g. `pickup`, `delivery`). Repeatable.
        #[arg(long = "delivery", required = true)]
        delivery: Vec<String>,

        /// Hours the seller has to answer before the offer expires.
        #[arg(long)]
        expires_in_hours: Option<i64>,
    },

    /// Print an offer as JSON.
    Show {
        /// Offer ID: full UUID or unambiguous prefix.
        offer: String,
    },

    /// List offers you are a party to.
    List,

    /// Request a status change. Prints the updated offer as JSON.
    ///
    /// Receipt statuses (`to_receive`, `picked_up`) complete the offer
    /// immediately.
    Transition {
        /// Offer ID: full UUID or unambiguous prefix.
        offer: String,

        /// Target status, e.g. `accepted`, `to_ship`, `cancelled`.
        status: OfferStatus,

        /// Why the offer is being cancelled.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Show the statuses you may request next.
    Next {
        /// Offer ID: full UUID or unambiguous prefix.
        offer: String,
    },
}

pub(super) fn dispatch<S: OfferStore>(
    lifecycle: &Lifecycle<S>,
    user: &str,
    command: OfferCommand,
) -> Result<(), String> {
    match command {
        OfferCommand::New {
            product,
            seller,
            price,
            quantity,
            delivery,
            expires_in_hours,
        } => {
            let now = Timestamp::now();
            let expires_at = expires_in_hours
                .map(|h| expiry_after(now, h))
                .transpose()?;
            let terms = OfferTerms {
                product_id: product,
                buyer_id: user.to_string(),
                seller_id: seller,
                price,
                quantity,
                delivery_options: delivery,
                expires_at,
            };
            cmd_new(lifecycle, terms, now)
        }
        OfferCommand::Show { offer } => {
            let id = resolve_offer(lifecycle, user, &offer)?;
            cmd_show(lifecycle, id)
        }
        OfferCommand::List => cmd_list(lifecycle, user),
        OfferCommand::Transition {
            offer,
            status,
            reason,
        } => {
            let id = resolve_offer(lifecycle, user, &offer)?;
            let request = TransitionRequest {
                offer_id: id,
                user_id: user.to_string(),
                requested: status,
                reason,
            };
            cmd_transition(lifecycle, &request)
        }
        OfferCommand::Next { offer } => {
            let id = resolve_offer(lifecycle, user, &offer)?;
            cmd_next(lifecycle, id, user)
        }
    }
}

fn cmd_new<S: OfferStore>(
    lifecycle: &Lifecycle<S>,
    terms: OfferTerms,
    now: Timestamp,
) -> Result<(), String> {
    let offer = Offer::open(terms, now)?;

    lifecycle
        .store()
        .insert(&offer)
        .map_err(|e| format!("failed to create offer: {e}"))?;

    tracing::info!(offer = %offer.id, buyer = %offer.buyer_id, seller = %offer.seller_id, "offer opened");
    println!("{}", offer.id);
    Ok(())
}

fn cmd_show<S: OfferStore>(lifecycle: &Lifecycle<S>, id: Uuid) -> Result<(), String> {
    let offer = lifecycle
        .view(id, Timestamp::now())
        .map_err(|e| format_error(&e))?;
    print_json(&offer)
}

fn cmd_list<S: OfferStore>(lifecycle: &Lifecycle<S>, user: &str) -> Result<(), String> {
    let offers = lifecycle
        .store()
        .list_for_user(user)
        .map_err(|e| format!("failed to list offers: {e}"))?;

    if offers.is_empty() {
        println!("No offers");
        return Ok(());
    }

    let now = Timestamp::now();
    for offer in &offers {
        println!("{}", format_offer_line(offer, user, now));
    }

    Ok(())
}

fn cmd_transition<S: OfferStore>(
    lifecycle: &Lifecycle<S>,
    request: &TransitionRequest,
) -> Result<(), String> {
    let offer = lifecycle
        .request_transition(request, Timestamp::now())
        .map_err(|e| format_error(&e))?;

    if offer.status != request.requested {
        eprintln!(
            "Offer {} moved to {} (requested {})",
            short_id(offer.id),
            offer.status,
            request.requested
        );
    }
    print_json(&offer)
}

fn cmd_next<S: OfferStore>(lifecycle: &Lifecycle<S>, id: Uuid, user: &str) -> Result<(), String> {
    let next = lifecycle
        .available(id, user, Timestamp::now())
        .map_err(|e| format_error(&e))?;

    if next.is_empty() {
        println!("No transitions available");
    } else {
        println!("{}", format_statuses(&next));
    }
    Ok(())
}

fn expiry_after(now: Timestamp, hours: i64) -> Result<Timestamp, String> {
    if hours <= 0 {
        return Err(format!("--expires-in-hours must be positive, got {hours}"));
    }
    let secs = hours
        .checked_mul(3600)
        .ok_or_else(|| format!("--expires-in-hours is too large: {hours}"))?;
    now.checked_add(SignedDuration::from_secs(secs))
        .map_err(|e| format!("invalid expiry: {e}"))
}

fn print_json(offer: &Offer) -> Result<(), String> {
    let json = serde_json::to_string_pretty(offer)
        .map_err(|e| format!("failed to serialize offer: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Resolve an offer reference (full UUID or unambiguous prefix) to an offer id.
///
/// Prefixes only match offers the user is a party to.
fn resolve_offer<S: OfferStore>(
    lifecycle: &Lifecycle<S>,
    user: &str,
    reference: &str,
) -> Result<Uuid, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return Ok(id);
    }

    let offers = lifecycle
        .store()
        .list_for_user(user)
        .map_err(|e| format!("failed to list offers: {e}"))?;
    match_prefix(&offers, reference)
}

fn match_prefix(offers: &[Offer], reference: &str) -> Result<Uuid, String> {
    let matches: Vec<&Offer> = offers
        .iter()
        .filter(|o| o.id.to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no offer matching '{reference}'")),
        [offer] => Ok(offer.id),
        many => {
            let ids: Vec<String> = many.iter().map(|o| short_id(o.id)).collect();
            Err(format!(
                "'{reference}' is ambiguous, matches {} offers: {}",
                many.len(),
                ids.join(", ")
            ))
        }
    }
}
