//! `SQLite` offer store: one database file holding every offer.

use std::{fs, path::Path, path::PathBuf, time::Duration};

use jiff::Timestamp;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};
use uuid::Uuid;

use crate::model::{Offer, OfferStatus, Party};

use super::{OfferStore, Result, StorageError};

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS offers (
    id                  TEXT PRIMARY KEY,
    product_id          TEXT NOT NULL,
    buyer_id            TEXT NOT NULL,
    seller_id           TEXT NOT NULL,
    price               REAL NOT NULL,
    quantity            REAL NOT NULL,
    delivery_options    TEXT NOT NULL,
    status              TEXT NOT NULL,
    created_at          TEXT NOT NULL,
    status_updated_at   TEXT NOT NULL,
    accepted_at         TEXT,
    shipped_at          TEXT,
    received_at         TEXT,
    completed_at        TEXT,
    cancelled_at        TEXT,
    cancelled_by        TEXT,
    cancellation_reason TEXT,
    expires_at          TEXT
);
CREATE INDEX IF NOT EXISTS offers_buyer ON offers (buyer_id);
CREATE INDEX IF NOT EXISTS offers_seller ON offers (seller_id);
";

const COLUMNS: &str = "id, product_id, buyer_id, seller_id, price, quantity, delivery_options, \
     status, created_at, status_updated_at, accepted_at, shipped_at, received_at, \
     completed_at, cancelled_at, cancelled_by, cancellation_reason, expires_at";

/// Offer store backed by a single `SQLite` file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`.
    ///
    /// Parent directories are created if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Returns the default database path: `~/.farmgate/offers.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".farmgate").join("offers.sqlite"))
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl OfferStore for SqliteStore {
    fn load(&self, id: Uuid) -> Result<Offer> {
        let sql = format!("SELECT {COLUMNS} FROM offers WHERE id = ?1");
        let raw = self
            .conn
            .query_row(&sql, [id.to_string()], read_row)
            .optional()?
            .ok_or(StorageError::OfferNotFound(id))?;
        raw.into_offer()
    }

    fn save(&self, offer: &Offer, observed: OfferStatus) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE offers
             SET status = ?1, status_updated_at = ?2, accepted_at = ?3, shipped_at = ?4,
                 received_at = ?5, completed_at = ?6, cancelled_at = ?7, cancelled_by = ?8,
                 cancellation_reason = ?9
             WHERE id = ?10 AND status = ?11",
            rusqlite::params![
                offer.status.as_str(),
                offer.status_updated_at.to_string(),
                offer.accepted_at.map(|t| t.to_string()),
                offer.shipped_at.map(|t| t.to_string()),
                offer.received_at.map(|t| t.to_string()),
                offer.completed_at.map(|t| t.to_string()),
                offer.cancelled_at.map(|t| t.to_string()),
                offer.cancelled_by.map(Party::as_str),
                offer.cancellation_reason.as_deref(),
                offer.id.to_string(),
                observed.as_str(),
            ],
        )?;
        if rows > 0 {
            return Ok(());
        }

        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM offers WHERE id = ?1",
                [offer.id.to_string()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            Err(StorageError::Conflict {
                id: offer.id,
                expected: observed,
            })
        } else {
            Err(StorageError::OfferNotFound(offer.id))
        }
    }

    fn insert(&self, offer: &Offer) -> Result<()> {
        let delivery_options = serde_json::to_string(&offer.delivery_options)?;
        let sql = format!(
            "INSERT INTO offers ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)"
        );
        let result = self.conn.execute(
            &sql,
            rusqlite::params![
                offer.id.to_string(),
                &offer.product_id,
                &offer.buyer_id,
                &offer.seller_id,
                offer.price,
                offer.quantity,
                delivery_options,
                offer.status.as_str(),
                offer.created_at.to_string(),
                offer.status_updated_at.to_string(),
                offer.accepted_at.map(|t| t.to_string()),
                offer.shipped_at.map(|t| t.to_string()),
                offer.received_at.map(|t| t.to_string()),
                offer.completed_at.map(|t| t.to_string()),
                offer.cancelled_at.map(|t| t.to_string()),
                offer.cancelled_by.map(Party::as_str),
                offer.cancellation_reason.as_deref(),
                offer.expires_at.map(|t| t.to_string()),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StorageError::OfferAlreadyExists(offer.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Offer>> {
        let sql = format!("SELECT {COLUMNS} FROM offers WHERE buyer_id = ?1 OR seller_id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut offers = stmt
            .query_map([user_id], read_row)?
            .map(|raw| raw?.into_offer())
            .collect::<Result<Vec<_>>>()?;
        offers.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(offers)
    }
}

/// An offer row as stored, before any parsing.
struct RawOffer {
    id: String,
    product_id: String,
    buyer_id: String,
    seller_id: String,
    price: f64,
    quantity: f64,
    delivery_options: String,
    status: String,
    created_at: String,
    status_updated_at: String,
    accepted_at: Option<String>,
    shipped_at: Option<String>,
    received_at: Option<String>,
    completed_at: Option<String>,
    cancelled_at: Option<String>,
    cancelled_by: Option<String>,
    cancellation_reason: Option<String>,
    expires_at: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawOffer> {
    Ok(RawOffer {
        id: row.get("id")?,
        product_id: row.get("product_id")?,
        buyer_id: row.get("buyer_id")?,
        seller_id: row.get("seller_id")?,
        price: row.get("price")?,
        quantity: row.get("quantity")?,
        delivery_options: row.get("delivery_options")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
        status_updated_at: row.get("status_updated_at")?,
        accepted_at: row.get("accepted_at")?,
        shipped_at: row.get("shipped_at")?,
        received_at: row.get("received_at")?,
        completed_at: row.get("completed_at")?,
        cancelled_at: row.get("cancelled_at")?,
        cancelled_by: row.get("cancelled_by")?,
        cancellation_reason: row.get("cancellation_reason")?,
        expires_at: row.get("expires_at")?,
    })
}

impl RawOffer {
    fn into_offer(self) -> Result<Offer> {
        let id = self
            .id
            .parse::<Uuid>()
            .map_err(|e| StorageError::Corrupt(format!("invalid offer id: {e}")))?;
        let status = self
            .status
            .parse::<OfferStatus>()
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let cancelled_by = self
            .cancelled_by
            .as_deref()
            .map(|s| {
                Party::from_token(s)
                    .ok_or_else(|| StorageError::Corrupt(format!("unknown party: {s}")))
            })
            .transpose()?;

        Ok(Offer {
            id,
            product_id: self.product_id,
            buyer_id: self.buyer_id,
            seller_id: self.seller_id,
            price: self.price,
            quantity: self.quantity,
            delivery_options: serde_json::from_str(&self.delivery_options)?,
            status,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            status_updated_at: parse_timestamp("status_updated_at", &self.status_updated_at)?,
            accepted_at: parse_optional("accepted_at", self.accepted_at.as_deref())?,
            shipped_at: parse_optional("shipped_at", self.shipped_at.as_deref())?,
            received_at: parse_optional("received_at", self.received_at.as_deref())?,
            completed_at: parse_optional("completed_at", self.completed_at.as_deref())?,
            cancelled_at: parse_optional("cancelled_at", self.cancelled_at.as_deref())?,
            cancelled_by,
            cancellation_reason: self.cancellation_reason,
            expires_at: parse_optional("expires_at", self.expires_at.as_deref())?,
        })
    }
}

fn parse_timestamp(column: &str, value: &str) -> Result<Timestamp> {
    value
        .parse::<Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid {column}: {e}")))
}

fn parse_optional(column: &str, value: Option<&str>) -> Result<Option<Timestamp>> {
    value.map(|v| parse_timestamp(column, v)).transpose()
}
