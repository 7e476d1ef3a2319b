//! Identifiers for facets and buckets.
//!
//! Answer options and facet values arrive from the grouping backend as JSON
//! scalars: usually strings, sometimes numbers (numeric ranges, years) and
//! occasionally structured values. Equality is strict (`1` and `"1"` are
//! different identifiers); the stringified form is used wherever metadata
//! lists are matched against data.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a facet or bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketId {
    Number(serde_json::Number),
    Text(String),
    Structured(serde_json::Value),
}

impl BucketId {
    /// Whether this identifier counts as empty.
    ///
    /// Numbers are never empty, including zero. Strings are empty when they
    /// have no characters; null, booleans and empty arrays/objects are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(text) => text.is_empty(),
            Self::Structured(value) => match value {
                serde_json::Value::Null | serde_json::Value::Bool(_) => true,
                serde_json::Value::String(s) => s.is_empty(),
                serde_json::Value::Array(items) => items.is_empty(),
                serde_json::Value::Object(map) => map.is_empty(),
                serde_json::Value::Number(_) => false,
            },
        }
    }

    /// Compare two identifiers for alphabetical ordering.
    ///
    /// Numbers sort numerically and before strings; strings sort by byte
    /// order; structured values sort last by their JSON text. Ties between
    /// representations that compare equal (`1` vs `1.0`) fall back to the
    /// stringified form so the ordering is total.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                let a_val = a.as_f64().unwrap_or(0.0);
                let b_val = b.as_f64().unwrap_or(0.0);
                a_val
                    .total_cmp(&b_val)
                    .then_with(|| a.to_string().cmp(&b.to_string()))
            }
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Structured(a), Self::Structured(b)) => a.to_string().cmp(&b.to_string()),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Structured(_) => 2,
        }
    }
}

impl Hash for BucketId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        self.to_string().hash(state);
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Structured(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for BucketId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BucketId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for BucketId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for BucketId {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}
