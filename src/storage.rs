//! Offer persistence.
//!
//! The lifecycle engine talks to storage only through [`OfferStore`].
//! Writes that move an offer forward are conditioned on the status the
//! caller observed, so two racing transitions can never both land:
//!
//! ```text
//! UPDATE offers SET ... WHERE id = ?id AND status = ?observed
//! ```
//!
//! Zero affected rows on an existing offer is a [`StorageError::Conflict`].

mod sqlite;

#[cfg(test)]
mod memory;

use std::io;

use uuid::Uuid;

use crate::model::{Offer, OfferStatus};

pub use sqlite::SqliteStore;

#[cfg(test)]
pub use memory::MemoryStore;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("offer not found: {0}")]
    OfferNotFound(Uuid),

    #[error("offer already exists: {0}")]
    OfferAlreadyExists(Uuid),

    /// The stored status no longer matches the one the writer observed.
    #[error("offer {id} is no longer {expected}")]
    Conflict { id: Uuid, expected: OfferStatus },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt offer record: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Durable home of offer records.
pub trait OfferStore {
    /// Loads a single offer.
    fn load(&self, id: Uuid) -> Result<Offer>;

    /// Overwrites an offer, but only if its stored status is still `observed`.
    ///
    /// Returns [`StorageError::Conflict`] when another writer got there first.
    fn save(&self, offer: &Offer, observed: OfferStatus) -> Result<()>;

    /// Stores a freshly opened offer.
    fn insert(&self, offer: &Offer) -> Result<()>;

    /// Offers where `user_id` is the buyer or the seller, oldest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Offer>>;
}
