//! Per-screen list modules: the typed filter schema, the lightly-typed
//! item shape and a controller alias for each list-backed screen.
//!
//! Business payloads are opaque to the core; item structs only name the
//! fields the filters key on and flatten everything else.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod activities;
pub mod fees;
pub mod health;
pub mod notes;
pub mod posts;
pub mod students;

/// Decodes an optional enum field leniently: a value outside the known
/// set becomes `None` instead of failing the whole row, so one
/// unrecognized status from the backend cannot take down a list screen.
pub(crate) fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
