//! Per-issue frequency estimation.
//!
//! Each [`IssueEstimator`] counts how often the opponent proposes each value
//! of one issue. From those counts it derives:
//!
//! - an issue **weight**: 0 when proposals are spread evenly over all values
//!   (the issue does not matter to the opponent), 1 when the opponent always
//!   proposes the same value (the issue is critical);
//! - a **utility** per observed value, relative to the most proposed value
//!   and decayed by how long ago the value was last seen.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, VecDeque};

use parley_core::{Progress, ValueId};
use serde::{Deserialize, Serialize};

/// Denominators smaller than this are treated as zero.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Number of recent observation times kept per value.
const RECENT_OBSERVATIONS: usize = 3;

/// Progress span over which repeated observations of a value damp the weight.
const UNSTABLE_SPAN: f64 = 0.3;

/// Multiplier applied to the weight when a value is unstable.
const UNSTABLE_DAMPING: f64 = 0.9;

/// Observation record for one value of one issue.
///
/// Created on the value's first observation (or when restored from a
/// snapshot), never by lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    count: u64,
    last_seen: f64,
    utility: f64,
    recent: VecDeque<f64>,
}

impl ValueRecord {
    fn first_observation(progress: Progress) -> Self {
        let mut recent = VecDeque::with_capacity(RECENT_OBSERVATIONS);
        recent.push_back(progress.value());
        Self {
            count: 1,
            last_seen: progress.value(),
            utility: 0.0,
            recent,
        }
    }

    fn restored(count: u64) -> Self {
        Self {
            count,
            last_seen: 0.0,
            utility: 0.0,
            recent: VecDeque::with_capacity(RECENT_OBSERVATIONS),
        }
    }

    fn observe(&mut self, progress: Progress) {
        self.count += 1;
        self.last_seen = progress.value();
        if self.recent.len() == RECENT_OBSERVATIONS {
            self.recent.pop_front();
        }
        self.recent.push_back(progress.value());
    }

    /// Progress covered by the most recent observations, if at least two exist.
    fn recent_span(&self) -> Option<f64> {
        if self.recent.len() < 2 {
            return None;
        }
        let first = self.recent.front()?;
        let last = self.recent.back()?;
        Some(last - first)
    }

    fn recompute_utility(&mut self, max_count: u64, weight: f64, now: Progress) {
        let time_decay = 1.0 / (1.0 + (now.value() - self.last_seen));
        if weight >= 1.0 {
            self.utility = 1.0;
            return;
        }
        let exponent = 1.0 - weight;
        let numerator = (self.count as f64 + 1.0).powf(exponent) - 1.0;
        let denominator = (max_count as f64 + 1.0).powf(exponent) - 1.0;
        self.utility = if denominator <= f64::EPSILON {
            1.0
        } else {
            numerator / denominator * time_decay
        };
    }

    /// Number of times the value was proposed.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Progress at which the value was last proposed.
    #[must_use]
    pub const fn last_seen(&self) -> f64 {
        self.last_seen
    }

    /// Estimated utility of the value for the opponent.
    #[must_use]
    pub const fn utility(&self) -> f64 {
        self.utility
    }
}

/// Frequency estimator for a single issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueEstimator {
    values: BTreeMap<ValueId, ValueRecord>,
    value_count: usize,
    observations: u64,
    max_count: u64,
    weight: f64,
}

impl IssueEstimator {
    /// Creates an estimator for an issue with `value_count` possible values.
    #[must_use]
    pub fn new(value_count: usize) -> Self {
        Self {
            values: BTreeMap::new(),
            value_count,
            observations: 0,
            max_count: 0,
            weight: 0.0,
        }
    }

    /// Registers one proposal of `value` at `progress`.
    ///
    /// Recomputes the issue weight and then the utility of *every* observed
    /// value, since both depend on the issue-wide maximum count.
    pub fn update(&mut self, value: &ValueId, progress: Progress) {
        self.observations += 1;

        let record = match self.values.entry(value.clone()) {
            Entry::Occupied(entry) => {
                let record = entry.into_mut();
                record.observe(progress);
                record
            }
            Entry::Vacant(entry) => entry.insert(ValueRecord::first_observation(progress)),
        };
        self.max_count = self.max_count.max(record.count);
        let span = record.recent_span();

        self.weight = self.raw_weight();

        for record in self.values.values_mut() {
            record.recompute_utility(self.max_count, self.weight, progress);
        }

        // Utilities above use the undamped weight.
        if span.is_some_and(|span| span > UNSTABLE_SPAN) {
            self.weight *= UNSTABLE_DAMPING;
        }
    }

    /// `(max − n/v) / (n − n/v)`, or 0 when the denominator vanishes.
    fn raw_weight(&self) -> f64 {
        if self.value_count == 0 {
            return 0.0;
        }
        let n = self.observations as f64;
        let equal_share = n / self.value_count as f64;
        let denominator = n - equal_share;
        if denominator.abs() < WEIGHT_EPSILON {
            return 0.0;
        }
        (self.max_count as f64 - equal_share) / denominator
    }

    /// Restores a weight and per-value counts from persisted state.
    ///
    /// Utilities are left untouched; they are recomputed on the next
    /// [`update`](Self::update).
    pub(crate) fn restore(&mut self, weight: f64, counts: impl IntoIterator<Item = (ValueId, u64)>) {
        self.weight = weight;
        for (value, count) in counts {
            match self.values.entry(value) {
                Entry::Occupied(mut entry) => entry.get_mut().count = count,
                Entry::Vacant(entry) => {
                    entry.insert(ValueRecord::restored(count));
                }
            }
        }
        self.observations = self.values.values().map(ValueRecord::count).sum();
        self.max_count = self
            .values
            .values()
            .map(ValueRecord::count)
            .max()
            .unwrap_or(0);
    }

    /// Estimated importance of the issue to the opponent.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Total proposals observed for the issue.
    #[must_use]
    pub const fn observations(&self) -> u64 {
        self.observations
    }

    /// Number of possible values of the issue.
    #[must_use]
    pub const fn value_count(&self) -> usize {
        self.value_count
    }

    /// Highest count among the observed values.
    #[must_use]
    pub const fn max_count(&self) -> u64 {
        self.max_count
    }

    /// Estimated utility of `value`, 0 if it was never observed.
    #[must_use]
    pub fn value_utility(&self, value: &ValueId) -> f64 {
        self.values.get(value).map_or(0.0, ValueRecord::utility)
    }

    /// Observation record of `value`, if it was observed.
    #[must_use]
    pub fn record(&self, value: &ValueId) -> Option<&ValueRecord> {
        self.values.get(value)
    }

    /// Iterates over observed values and their records.
    pub fn records(&self) -> impl Iterator<Item = (&ValueId, &ValueRecord)> {
        self.values.iter()
    }
}
