//! The transition table: which edges exist and who may walk them.

use crate::model::{DeliveryBranch, OfferStatus, Party};

/// Who may request a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permit {
    Seller,
    Buyer,
    Either,
}

impl Permit {
    pub const fn allows(self, party: Party) -> bool {
        matches!(
            (self, party),
            (Self::Either, _) | (Self::Seller, Party::Seller) | (Self::Buyer, Party::Buyer)
        )
    }
}

/// A legal edge of the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub permit: Permit,

    /// The delivery branch the offer must be on, for branch-selecting edges.
    pub branch: Option<DeliveryBranch>,
}

impl Edge {
    const fn by(permit: Permit) -> Self {
        Self {
            permit,
            branch: None,
        }
    }

    const fn on_branch(permit: Permit, branch: DeliveryBranch) -> Self {
        Self {
            permit,
            branch: Some(branch),
        }
    }
}

/// Looks up the edge from `from` to `to`, if there is one.
pub fn edge(from: OfferStatus, to: OfferStatus) -> Option<Edge> {
    use OfferStatus::{
        Accepted, Cancelled, PickedUp, Pending, ReadyToPickup, Rejected, Shipped, ToReceive,
        ToShip,
    };

    match (from, to) {
        (Pending, Accepted | Rejected) | (ToShip, Shipped) => Some(Edge::by(Permit::Seller)),
        (Accepted, ToShip) => Some(Edge::on_branch(Permit::Seller, DeliveryBranch::Ship)),
        (Accepted, ReadyToPickup) => Some(Edge::on_branch(Permit::Seller, DeliveryBranch::Pickup)),
        (Shipped, ToReceive) | (ReadyToPickup, PickedUp) => Some(Edge::by(Permit::Buyer)),
        (Pending | Accepted | ToShip | Shipped | ReadyToPickup, Cancelled) => {
            Some(Edge::by(Permit::Either))
        }
        _ => None,
    }
}

/// The status a transition actually lands on.
///
/// The buyer's "got it" signals complete the offer in the same step.
pub const fn settle(requested: OfferStatus) -> OfferStatus {
    match requested {
        OfferStatus::ToReceive | OfferStatus::PickedUp => OfferStatus::Completed,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::OfferStatus::*;

    #[test]
    fn table_has_exactly_twelve_edges() {
        let count = OfferStatus::ALL
            .into_iter()
            .flat_map(|from| OfferStatus::ALL.into_iter().map(move |to| (from, to)))
            .filter(|&(from, to)| edge(from, to).is_some())
            .count();
        assert_eq!(count, 12);
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for from in OfferStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
            for to in OfferStatus::ALL {
                assert_eq!(edge(from, to), None, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn transient_statuses_have_no_outgoing_edges() {
        for from in [PickedUp, ToReceive] {
            for to in OfferStatus::ALL {
                assert_eq!(edge(from, to), None, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn nothing_leads_into_expired_or_completed() {
        for from in OfferStatus::ALL {
            assert_eq!(edge(from, Expired), None);
            assert_eq!(edge(from, Completed), None);
        }
    }

    #[test]
    fn permits() {
        assert_eq!(edge(Pending, Accepted).unwrap().permit, Permit::Seller);
        assert_eq!(edge(Pending, Rejected).unwrap().permit, Permit::Seller);
        assert_eq!(edge(ToShip, Shipped).unwrap().permit, Permit::Seller);
        assert_eq!(edge(Shipped, ToReceive).unwrap().permit, Permit::Buyer);
        assert_eq!(edge(ReadyToPickup, PickedUp).unwrap().permit, Permit::Buyer);
        for from in [Pending, Accepted, ToShip, Shipped, ReadyToPickup] {
            assert_eq!(edge(from, Cancelled).unwrap().permit, Permit::Either);
        }
    }

    #[test]
    fn branch_edges_carry_their_branch() {
        assert_eq!(
            edge(Accepted, ToShip).unwrap().branch,
            Some(DeliveryBranch::Ship)
        );
        assert_eq!(
            edge(Accepted, ReadyToPickup).unwrap().branch,
            Some(DeliveryBranch::Pickup)
        );
        assert_eq!(edge(Pending, Accepted).unwrap().branch, None);
    }

    #[test]
    fn permit_allows() {
        assert!(Permit::Either.allows(Party::Buyer));
        assert!(Permit::Either.allows(Party::Seller));
        assert!(Permit::Seller.allows(Party::Seller));
        assert!(!Permit::Seller.allows(Party::Buyer));
        assert!(!Permit::Buyer.allows(Party::Seller));
    }

    #[test]
    fn settle_collapses_receipt_into_completion() {
        assert_eq!(settle(ToReceive), Completed);
        assert_eq!(settle(PickedUp), Completed);
        assert_eq!(settle(Shipped), Shipped);
        assert_eq!(settle(Cancelled), Cancelled);
    }
}
