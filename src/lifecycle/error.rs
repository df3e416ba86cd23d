//! Lifecycle errors, discriminated the way callers need to report them.

use uuid::Uuid;

use crate::model::{OfferStatus, Party};
use crate::storage::StorageError;

/// Why a transition request was refused.
///
/// Every variant is recoverable by the caller. None of them leave a
/// write behind: validation finishes before the store is touched.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("offer not found: {0}")]
    NotFound(Uuid),

    /// The caller is not a party to the offer, or holds the wrong role
    /// for this particular transition.
    #[error("{user} may not move offer {id} from {from} to {to}")]
    Forbidden {
        id: Uuid,
        user: String,
        role: Option<Party>,
        from: OfferStatus,
        to: OfferStatus,
    },

    /// The requested status is not reachable from the current one.
    #[error("offer {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: Uuid,
        from: OfferStatus,
        to: OfferStatus,
    },

    /// Someone else moved the offer between our read and our write.
    #[error("offer {id} changed while it was being updated (expected {expected}); reload and retry")]
    Conflict { id: Uuid, expected: OfferStatus },

    #[error("storage error: {0}")]
    Store(#[source] StorageError),
}

impl LifecycleError {
    /// Stable machine-readable name for this error kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Forbidden { .. } => "forbidden",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Conflict { .. } => "conflict",
            Self::Store(_) => "storage",
        }
    }

    /// The HTTP status a resource endpoint answers with for this error.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Forbidden { .. } => 403,
            Self::InvalidTransition { .. } => 400,
            Self::Conflict { .. } => 409,
            Self::Store(_) => 500,
        }
    }
}

impl From<StorageError> for LifecycleError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OfferNotFound(id) => Self::NotFound(id),
            StorageError::Conflict { id, expected } => Self::Conflict { id, expected },
            other => Self::Store(other),
        }
    }
}
