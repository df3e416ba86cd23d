//! Delivery branch selection.

use serde::{Deserialize, Serialize};

/// The post-acceptance path an offer follows.
///
/// Chosen once, when the seller moves an accepted offer forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryBranch {
    /// `to_ship` → `shipped` → `to_receive`.
    Ship,

    /// `ready_to_pickup` → `picked_up`.
    Pickup,
}

impl DeliveryBranch {
    /// Picks the branch for a set of delivery tags.
    ///
    /// Any tag equal to `pickup` (ignoring case and surrounding whitespace)
    /// selects the pickup branch; everything else ships.
    pub fn for_options<S: AsRef<str>>(options: &[S]) -> Self {
        if options
            .iter()
            .any(|tag| tag.as_ref().trim().eq_ignore_ascii_case("pickup"))
        {
            Self::Pickup
        } else {
            Self::Ship
        }
    }
}
