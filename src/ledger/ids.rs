use std::fmt;

use serde::{
    de::{self, Deserializer, Visitor},
    Deserialize, Serialize,
};
use uuid::Uuid;

/// Opaque identifier for ledger entries.
///
/// Freshly created entries get a v4 UUID. Documents written by older versions stored numeric
/// ids (sometimes fractional), so deserialization accepts numbers and keeps their textual form.
/// Only uniqueness within a collection matters; ids carry no ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(EntryIdVisitor)
    }
}

struct EntryIdVisitor;

impl<'de> Visitor<'de> for EntryIdVisitor {
    type Value = EntryId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or numeric identifier")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<EntryId, E> {
        if value.trim().is_empty() {
            return Err(E::custom("identifier must not be empty"));
        }
        Ok(EntryId(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<EntryId, E> {
        Ok(EntryId(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<EntryId, E> {
        Ok(EntryId(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<EntryId, E> {
        if !value.is_finite() {
            return Err(E::custom("identifier must be finite"));
        }
        Ok(EntryId(value.to_string()))
    }
}
