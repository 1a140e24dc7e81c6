//! Helpers for partial-update bodies

use serde::{Deserialize, Deserializer};

/// Field state in a patch: outer `None` leaves the field alone,
/// `Some(None)` clears it, `Some(Some(v))` sets it.
pub type Nullable<T> = Option<Option<T>>;

/// Deserialize a present field, keeping an explicit `null` as `Some(None)`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
