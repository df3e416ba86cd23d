//! The offer lifecycle engine.
//!
//! Offers move through a fixed graph of statuses. Each edge names the
//! party allowed to walk it; accepted offers branch on their delivery
//! options, and the buyer's receipt signal completes the offer at once:
//!
//! ```text
//! pending ─► accepted ─► to_ship ─► shipped ─► (to_receive) ─► completed
//!    │           └─────► ready_to_pickup ─► (picked_up) ─────► completed
//!    └─► rejected
//!
//! pending | accepted | to_ship | shipped | ready_to_pickup ─► cancelled
//! pending past its deadline reads as expired
//! ```
//!
//! The engine holds no offer state of its own. Each request loads the
//! record, validates against what it saw, and commits with a write
//! conditioned on that status still being current.

mod apply;
mod error;
mod table;

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{Offer, OfferStatus};
use crate::storage::OfferStore;

pub use apply::apply;
pub use error::LifecycleError;

pub type Result<T> = core::result::Result<T, LifecycleError>;

/// A caller asking to move an offer to a new status.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub offer_id: Uuid,

    /// The authenticated caller. Their role comes from the offer itself.
    pub user_id: String,

    pub requested: OfferStatus,

    /// Free-text cancellation reason. Ignored for other transitions.
    pub reason: Option<String>,
}

/// Drives offers through their lifecycle against an injected store.
pub struct Lifecycle<S> {
    store: S,
}

impl<S: OfferStore> Lifecycle<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads an offer as observed at `now`.
    ///
    /// A pending offer past its deadline comes back as `expired`.
    /// Nothing is written.
    pub fn view(&self, id: Uuid, now: Timestamp) -> Result<Offer> {
        let mut offer = self.store.load(id)?;
        offer.status = offer.effective_status(now);
        Ok(offer)
    }

    /// Validates and commits a transition, returning the offer as persisted.
    ///
    /// Receipt transitions come back already `completed`. A refused
    /// request leaves the stored offer untouched.
    pub fn request_transition(&self, request: &TransitionRequest, now: Timestamp) -> Result<Offer> {
        let current = self.store.load(request.offer_id)?;

        let next = apply(
            &current,
            &request.user_id,
            request.requested,
            request.reason.as_deref(),
            now,
        )
        .inspect_err(|e| {
            tracing::debug!(
                offer = %request.offer_id,
                user = %request.user_id,
                requested = %request.requested,
                kind = e.kind(),
                "transition refused: {e}"
            );
        })?;

        if let Err(e) = self.store.save(&next, current.status) {
            let e = LifecycleError::from(e);
            if matches!(e, LifecycleError::Conflict { .. }) {
                tracing::warn!(offer = %request.offer_id, observed = %current.status, "{e}");
            }
            return Err(e);
        }

        tracing::info!(
            offer = %next.id,
            from = %current.status,
            to = %next.status,
            requested = %request.requested,
            user = %request.user_id,
            "offer transitioned"
        );
        Ok(next)
    }

    /// The statuses `user_id` may request for this offer at `now`.
    pub fn available(&self, id: Uuid, user_id: &str, now: Timestamp) -> Result<Vec<OfferStatus>> {
        let offer = self.store.load(id)?;
        Ok(OfferStatus::ALL
            .into_iter()
            .filter(|&to| apply(&offer, user_id, to, None, now).is_ok())
            .collect())
    }
}
