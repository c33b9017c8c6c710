//! Persisted opponent knowledge.
//!
//! Wire format, one record per counterpart identity:
//!
//! ```json
//! {
//!   "is_conceder": false,
//!   "issue_weights": {
//!     "price": { "weight": 0.8, "value_counts": { "low": 12, "mid": 2 } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use parley_core::{IssueId, ValueId};
use serde::{Deserialize, Serialize};

/// Exported state of an [`OpponentModel`](crate::OpponentModel).
///
/// Only counts, weights and the conceder flag are persisted. Value
/// utilities are always recomputed from the counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpponentSnapshot {
    /// Whether the opponent was classified as a conceder.
    #[serde(default)]
    pub is_conceder: bool,
    /// Per-issue estimator state.
    #[serde(default)]
    pub issue_weights: BTreeMap<IssueId, IssueSnapshot>,
}

/// Persisted state of one issue estimator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    /// Estimated issue weight.
    #[serde(default)]
    pub weight: f64,
    /// Observation count per value.
    #[serde(default)]
    pub value_counts: BTreeMap<ValueId, u64>,
}

impl OpponentSnapshot {
    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying JSON error for malformed input.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying JSON error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// What an import actually restored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Issues whose weight was restored.
    pub issues: usize,
    /// Value counts restored across all issues.
    pub values: usize,
    /// Entries skipped because the issue or value is not in the domain.
    pub skipped: usize,
}
