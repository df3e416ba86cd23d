//! Output formatting for CLI display.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    lifecycle::LifecycleError,
    model::{Offer, OfferStatus},
};

/// The first eight characters of an id, enough to address it by prefix.
pub(super) fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// One-line summary of an offer from `user`'s side.
pub(super) fn format_offer_line(offer: &Offer, user: &str, now: Timestamp) -> String {
    let role = offer.role_of(user).map_or("-", |p| p.as_str());
    format!(
        "{}  [{}] [{role}]  {}  {} @ {}  ({})",
        short_id(offer.id),
        offer.effective_status(now),
        offer.product_id,
        offer.quantity,
        offer.price,
        offer.delivery_options.join(", "),
    )
}

pub(super) fn format_statuses(statuses: &[OfferStatus]) -> String {
    statuses
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error text carrying the kind and the HTTP status an endpoint would answer with.
pub(super) fn format_error(err: &LifecycleError) -> String {
    format!("{} ({}): {err}", err.kind(), err.http_status())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::OfferTerms;

    #[test]
    fn offer_line_shows_role_and_effective_status() {
        let now = Timestamp::new(1_700_000_000, 0).unwrap();
        let mut offer = Offer::open(
            OfferTerms {
                product_id: "sorghum".into(),
                buyer_id: "bea".into(),
                seller_id: "sam".into(),
                price: 12.5,
                quantity: 3.0,
                delivery_options: vec!["pickup".into(), "delivery".into()],
                expires_at: Some(Timestamp::new(1_600_000_000, 0).unwrap()),
            },
            now,
        )
        .unwrap();
        offer.id = "5f2c9a10-0000-4000-8000-000000000000".parse().unwrap();

        let line = format_offer_line(&offer, "sam", now);
        assert_eq!(
            line,
            "5f2c9a10  [expired] [seller]  sorghum  3 @ 12.5  (pickup, delivery)"
        );
    }

    #[test]
    fn statuses_join_as_tokens() {
        let s = format_statuses(&[OfferStatus::ReadyToPickup, OfferStatus::Cancelled]);
        assert_eq!(s, "ready_to_pickup, cancelled");
    }

    #[test]
    fn error_carries_kind_and_status() {
        let err = LifecycleError::NotFound(Uuid::nil());
        assert_eq!(
            format_error(&err),
            "not_found (404): offer not found: 00000000-0000-0000-0000-000000000000"
        );
    }
}
