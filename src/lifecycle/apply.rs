//! The pure transition step: validate a request and compute the next record.

use jiff::Timestamp;

use crate::model::{Offer, OfferStatus, Party};

use super::{
    LifecycleError,
    table::{edge, settle},
};

/// Validates `requested` against `offer` for `user_id` and returns the
/// record as it should be persisted.
///
/// Checks run in a fixed order: party membership, terminal status
/// (including read-time expiry), table membership and delivery branch,
/// then the role the edge requires. The input is never modified.
pub fn apply(
    offer: &Offer,
    user_id: &str,
    requested: OfferStatus,
    reason: Option<&str>,
    now: Timestamp,
) -> Result<Offer, LifecycleError> {
    let from = offer.effective_status(now);

    let Some(role) = offer.role_of(user_id) else {
        return Err(forbidden(offer, user_id, None, from, requested));
    };

    let invalid = || LifecycleError::InvalidTransition {
        id: offer.id,
        from,
        to: requested,
    };

    if from.is_terminal() {
        return Err(invalid());
    }

    let edge = edge(from, requested).ok_or_else(invalid)?;
    if edge.branch.is_some_and(|branch| branch != offer.branch()) {
        return Err(invalid());
    }
    if !edge.permit.allows(role) {
        return Err(forbidden(offer, user_id, Some(role), from, requested));
    }

    let mut next = offer.clone();
    stamp(&mut next, requested, role, reason, now);
    Ok(next)
}

/// Writes the new status and the audit fields this step owns.
fn stamp(offer: &mut Offer, requested: OfferStatus, role: Party, reason: Option<&str>, now: Timestamp) {
    match requested {
        OfferStatus::Accepted => offer.accepted_at = Some(now),
        OfferStatus::Shipped => offer.shipped_at = Some(now),
        OfferStatus::ToReceive | OfferStatus::PickedUp => offer.received_at = Some(now),
        OfferStatus::Cancelled => {
            offer.cancelled_at = Some(now);
            offer.cancelled_by = Some(role);
            offer.cancellation_reason = reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from);
        }
        _ => {}
    }

    let status = settle(requested);
    if status == OfferStatus::Completed {
        offer.completed_at = Some(now);
    }
    offer.status = status;
    offer.status_updated_at = now;
}

fn forbidden(
    offer: &Offer,
    user_id: &str,
    role: Option<Party>,
    from: OfferStatus,
    to: OfferStatus,
) -> LifecycleError {
    LifecycleError::Forbidden {
        id: offer.id,
        user: user_id.to_string(),
        role,
        from,
        to,
    }
}
