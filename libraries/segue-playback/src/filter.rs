//! Partial-match track filter for bulk removal
//!
//! A filter names only the fields it cares about; everything else is
//! ignored. Metadata is matched structurally: every key present in the
//! filter object must exist in the track's data with an equal value,
//! recursing through nested objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Track;

/// Partial-match filter over track fields
///
/// Fields left as `None` match any track. An entirely empty filter
/// therefore matches *every* track; callers of
/// [`remove`](crate::PlaybackQueue::remove) should name at least one field
/// unless they mean to sweep the whole queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackFilter {
    /// Exact key to match
    pub key: Option<u64>,

    /// Exact source URI to match
    pub src: Option<String>,

    /// Partial metadata to match (see module docs)
    pub data: Option<Value>,
}

impl TrackFilter {
    /// Filter by key
    pub fn by_key(key: u64) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    /// Filter by source URI
    pub fn by_src(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::default()
        }
    }

    /// Filter by partial metadata
    pub fn by_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Whether the track satisfies every field present in the filter
    pub fn matches(&self, track: &Track) -> bool {
        if let Some(key) = self.key {
            if track.key != key {
                return false;
            }
        }
        if let Some(ref src) = self.src {
            if track.src != *src {
                return false;
            }
        }
        if let Some(ref data) = self.data {
            if !partial_match(data, &track.data) {
                return false;
            }
        }
        true
    }
}

/// Structural partial equality over JSON-shaped values
///
/// Objects match when every key in `want` is present in `have` with a
/// matching value (recursively). Any other pair of values must be equal.
fn partial_match(want: &Value, have: &Value) -> bool {
    match (want, have) {
        (Value::Object(want), Value::Object(have)) => want
            .iter()
            .all(|(k, v)| have.get(k).is_some_and(|hv| partial_match(v, hv))),
        _ => want == have,
    }
}
