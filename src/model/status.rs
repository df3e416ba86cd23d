//! Offer status: where an offer stands in its lifecycle.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Where an offer stands in its lifecycle.
///
/// The snake-case tokens are the wire contract. Renaming one is a
/// compatibility break for every client and every stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Proposed by the buyer, awaiting the seller's answer.
    Pending,

    /// The seller agreed to the terms.
    Accepted,

    /// The seller declined the terms.
    Rejected,

    /// Accepted on the shipping branch, waiting to be sent.
    ToShip,

    /// Accepted on the pickup branch, waiting for the buyer to collect.
    ReadyToPickup,

    /// The seller sent the goods.
    Shipped,

    /// The buyer collected the goods. Never persisted; collapses to `Completed`.
    PickedUp,

    /// The buyer received shipped goods. Never persisted; collapses to `Completed`.
    ToReceive,

    /// Goods changed hands.
    Completed,

    /// Either party called the deal off.
    Cancelled,

    /// A pending offer ran past its deadline. Derived at read time only.
    Expired,
}

impl OfferStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 11] = [
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::ToShip,
        Self::ReadyToPickup,
        Self::Shipped,
        Self::PickedUp,
        Self::ToReceive,
        Self::Completed,
        Self::Cancelled,
        Self::Expired,
    ];

    /// The wire token for this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::ToShip => "to_ship",
            Self::ReadyToPickup => "ready_to_pickup",
            Self::Shipped => "shipped",
            Self::PickedUp => "picked_up",
            Self::ToReceive => "to_receive",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    /// Terminal statuses accept no further transition.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Rejected | Self::Cancelled | Self::Expired
        )
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status token that names no known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown offer status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OfferStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_parse_back_to_the_same_status() {
        for status in OfferStatus::ALL {
            assert_eq!(status.as_str().parse::<OfferStatus>().unwrap(), status);
        }
    }

    #[test]
    fn serde_uses_the_wire_tokens() {
        let json = serde_json::to_string(&OfferStatus::ReadyToPickup).unwrap();
        assert_eq!(json, "\"ready_to_pickup\"");

        let parsed: OfferStatus = serde_json::from_str("\"to_receive\"").unwrap();
        assert_eq!(parsed, OfferStatus::ToReceive);
    }

    #[test]
    fn unknown_token_is_rejected() {
        let err = "Shipped".parse::<OfferStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("Shipped".into()));
        assert!("delivered".parse::<OfferStatus>().is_err());
    }

    #[test]
    fn terminal_statuses() {
        let terminal: Vec<_> = OfferStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![
                OfferStatus::Rejected,
                OfferStatus::Completed,
                OfferStatus::Cancelled,
                OfferStatus::Expired,
            ]
        );
    }
}
