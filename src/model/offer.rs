//! Offer types: a negotiated transaction between a buyer and a seller.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DeliveryBranch, OfferStatus, Party};

/// A buyer's proposed terms against a seller's product.
///
/// Product and user ids are opaque references into other systems;
/// nothing here ever dereferences them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: Uuid,
    pub product_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub price: f64,
    pub quantity: f64,

    /// Delivery tags chosen at creation (e.g. "pickup", "delivery").
    pub delivery_options: Vec<String>,

    pub status: OfferStatus,
    pub created_at: Timestamp,

    /// When `status` last changed.
    pub status_updated_at: Timestamp,

    pub accepted_at: Option<Timestamp>,
    pub shipped_at: Option<Timestamp>,
    pub received_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,

    /// Set only on cancelled offers.
    pub cancelled_by: Option<Party>,
    pub cancellation_reason: Option<String>,

    /// Deadline for the seller's answer. Checked at read time.
    pub expires_at: Option<Timestamp>,
}

/// Terms for a new offer, as produced by the negotiation flow.
#[derive(Debug, Clone)]
pub struct OfferTerms {
    pub product_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub price: f64,
    pub quantity: f64,
    pub delivery_options: Vec<String>,
    pub expires_at: Option<Timestamp>,
}

impl Offer {
    /// Opens a new `pending` offer from negotiated terms.
    pub fn open(terms: OfferTerms, now: Timestamp) -> Result<Self, String> {
        if terms.buyer_id == terms.seller_id {
            return Err("buyer and seller must be different users".to_string());
        }
        if terms.delivery_options.iter().all(|t| t.trim().is_empty()) {
            return Err("at least one delivery option is required".to_string());
        }
        if !(terms.price.is_finite() && terms.price >= 0.0) {
            return Err(format!("invalid price: {}", terms.price));
        }
        if !(terms.quantity.is_finite() && terms.quantity > 0.0) {
            return Err(format!("invalid quantity: {}", terms.quantity));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            product_id: terms.product_id,
            buyer_id: terms.buyer_id,
            seller_id: terms.seller_id,
            price: terms.price,
            quantity: terms.quantity,
            delivery_options: terms.delivery_options,
            status: OfferStatus::Pending,
            created_at: now,
            status_updated_at: now,
            accepted_at: None,
            shipped_at: None,
            received_at: None,
            completed_at: None,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
            expires_at: terms.expires_at,
        })
    }

    /// Which side of this offer `user_id` is on, if any.
    pub fn role_of(&self, user_id: &str) -> Option<Party> {
        if user_id == self.seller_id {
            Some(Party::Seller)
        } else if user_id == self.buyer_id {
            Some(Party::Buyer)
        } else {
            None
        }
    }

    /// The post-acceptance branch these delivery options select.
    pub fn branch(&self) -> DeliveryBranch {
        DeliveryBranch::for_options(&self.delivery_options)
    }

    /// Whether a pending offer has run past its deadline at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.status == OfferStatus::Pending && self.expires_at.is_some_and(|at| at < now)
    }

    /// The status as observed at `now`: `expired` for a pending offer
    /// past its deadline, the stored status otherwise.
    pub fn effective_status(&self, now: Timestamp) -> OfferStatus {
        if self.is_expired(now) {
            OfferStatus::Expired
        } else {
            self.status
        }
    }
}
