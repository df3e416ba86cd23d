//! In-memory offer store for exercising the lifecycle engine without a database.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use uuid::Uuid;

use crate::model::{Offer, OfferStatus};

use super::{OfferStore, Result, StorageError};

/// Offer store holding records in a map, with the same
/// compare-and-swap semantics as the `SQLite` store.
#[derive(Default)]
pub struct MemoryStore {
    offers: Mutex<HashMap<Uuid, Offer>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a record unconditionally, bypassing the status check.
    pub fn put(&self, offer: Offer) {
        self.offers().insert(offer.id, offer);
    }

    fn offers(&self) -> MutexGuard<'_, HashMap<Uuid, Offer>> {
        self.offers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OfferStore for MemoryStore {
    fn load(&self, id: Uuid) -> Result<Offer> {
        self.offers()
            .get(&id)
            .cloned()
            .ok_or(StorageError::OfferNotFound(id))
    }

    fn save(&self, offer: &Offer, observed: OfferStatus) -> Result<()> {
        let mut offers = self.offers();
        let stored = offers
            .get_mut(&offer.id)
            .ok_or(StorageError::OfferNotFound(offer.id))?;
        if stored.status != observed {
            return Err(StorageError::Conflict {
                id: offer.id,
                expected: observed,
            });
        }
        *stored = offer.clone();
        Ok(())
    }

    fn insert(&self, offer: &Offer) -> Result<()> {
        let mut offers = self.offers();
        if offers.contains_key(&offer.id) {
            return Err(StorageError::OfferAlreadyExists(offer.id));
        }
        offers.insert(offer.id, offer.clone());
        Ok(())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Offer>> {
        let mut offers: Vec<Offer> = self
            .offers()
            .values()
            .filter(|o| o.buyer_id == user_id || o.seller_id == user_id)
            .cloned()
            .collect();
        offers.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(offers)
    }
}
