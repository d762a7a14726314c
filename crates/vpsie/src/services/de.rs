//! Serde helpers for provider payloads.

use serde::{Deserialize, Deserializer};

/// Read `null` as the type's default.
///
/// Pair with `#[serde(default)]` so an absent key is accepted as well.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
