//! Core data model for farmgate.
//!
//! An offer is the only entity: its parties, terms, status, and the
//! audit stamps each transition leaves behind.

mod delivery;
mod offer;
mod party;
mod status;

pub use delivery::DeliveryBranch;
pub use offer::{Offer, OfferTerms};
pub use party::Party;
pub use status::OfferStatus;
