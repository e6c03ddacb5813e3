//! In-memory route map document.
//!
//! ```text
//! {
//!   "meta": { "version": 1, ... },
//!   "map": [
//!     { "networks": ["10.0.0.0/8", ...], "labels": ["edge", ...] },
//!     ...
//!   ]
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The only document version this crate understands.
pub const SUPPORTED_VERSION: i64 = 1;

/// Largest network prefix allowed for IPv4 entries.
pub const MAX_NETWORK_BITS_V4: u8 = 26;

/// Largest network prefix allowed for IPv6 entries.
pub const MAX_NETWORK_BITS_V6: u8 = 64;

const META_VERSION_KEY: &str = "version";

/// A loosely-typed `meta` value.
///
/// Variants are tried in order, so JSON integers land in `Integer`, other
/// numbers in `Float`, strings in `Text`, and everything else in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl MetaValue {
    /// Read this value as an integer.
    ///
    /// Integers are taken as-is, finite floats are truncated toward zero,
    /// and strings must hold a base-10 integer with an optional sign.
    /// Anything else has no integer reading.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetaValue::Integer(value) => Some(*value),
            MetaValue::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            MetaValue::Float(_) => None,
            MetaValue::Text(text) => text.parse::<i64>().ok(),
            MetaValue::Other(_) => None,
        }
    }
}

/// One map segment: networks paired with the labels they route to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub networks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
}

/// The whole route map document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteMap {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub meta: BTreeMap<String, MetaValue>,
    #[serde(rename = "map", default, deserialize_with = "null_as_empty")]
    pub segments: Vec<Segment>,
}

impl RouteMap {
    /// The document version, if `meta.version` has an integer reading.
    pub fn meta_version(&self) -> Option<i64> {
        self.meta.get(META_VERSION_KEY).and_then(MetaValue::as_integer)
    }

    pub fn set_meta_version(&mut self, version: i64) {
        self.meta
            .insert(META_VERSION_KEY.to_string(), MetaValue::Integer(version));
    }

    /// Total network entries across all segments.
    pub fn network_count(&self) -> usize {
        self.segments.iter().map(|s| s.networks.len()).sum()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
