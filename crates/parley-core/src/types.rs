//! Core value types: identifiers, bids and negotiation progress.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a negotiable issue.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(String);

impl IssueId {
    /// Creates a new issue ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IssueId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for IssueId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque identifier of one discrete value of an issue.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueId(String);

impl ValueId {
    /// Creates a new value ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ValueId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ValueId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One proposed outcome: a mapping from issue to the chosen value.
///
/// A `Bid` on its own is only a mapping; whether it is *complete* for a
/// particular negotiation is checked with [`Domain::validate`](crate::Domain::validate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bid {
    values: BTreeMap<IssueId, ValueId>,
}

impl Bid {
    /// Creates an empty bid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style assignment of `value` to `issue`.
    #[must_use]
    pub fn with(mut self, issue: impl Into<IssueId>, value: impl Into<ValueId>) -> Self {
        self.values.insert(issue.into(), value.into());
        self
    }

    /// Assigns `value` to `issue`, replacing any previous assignment.
    pub fn set(&mut self, issue: IssueId, value: ValueId) {
        self.values.insert(issue, value);
    }

    /// Returns the value assigned to `issue`, if any.
    #[must_use]
    pub fn value(&self, issue: &IssueId) -> Option<&ValueId> {
        self.values.get(issue)
    }

    /// Iterates over `(issue, value)` assignments in issue order.
    pub fn iter(&self) -> impl Iterator<Item = (&IssueId, &ValueId)> {
        self.values.iter()
    }

    /// Number of assigned issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no issue is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Counts the issues on which `self` and `other` assign the same value.
    #[must_use]
    pub fn shared_values(&self, other: &Self) -> usize {
        self.values
            .iter()
            .filter(|(issue, value)| other.values.get(*issue) == Some(*value))
            .count()
    }
}

impl<I, V> FromIterator<(I, V)> for Bid
where
    I: Into<IssueId>,
    V: Into<ValueId>,
{
    fn from_iter<T: IntoIterator<Item = (I, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(issue, value)| (issue.into(), value.into()))
                .collect(),
        }
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (issue, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{issue}={value}")?;
        }
        write!(f, "}}")
    }
}

/// Fraction of the negotiation deadline that has elapsed.
///
/// - 0.0 = session start
/// - 1.0 = deadline
///
/// Values outside `[0, 1]` are clamped on construction; NaN maps to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Progress(f64);

impl Progress {
    /// Session start.
    pub const START: Self = Self(0.0);

    /// Deadline.
    pub const DEADLINE: Self = Self(1.0);

    /// Creates a progress value, clamping into `[0, 1]`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Progress of round `round` out of `total` rounds.
    #[must_use]
    pub fn of_rounds(round: u32, total: u32) -> Self {
        if total == 0 {
            return Self::DEADLINE;
        }
        Self::new(f64::from(round) / f64::from(total))
    }

    /// Returns the raw fraction.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns true if progress lies in the half-open window `[start, end)`.
    #[must_use]
    pub fn in_window(self, start: f64, end: f64) -> bool {
        self.0 >= start && self.0 < end
    }
}

impl From<f64> for Progress {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Progress> for f64 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn bid_with_assigns_values() {
        let bid = Bid::new().with("price", "low").with("delivery", "fast");
        assert_eq!(bid.len(), 2);
        assert_eq!(bid.value(&IssueId::new("price")), Some(&ValueId::new("low")));
        assert_eq!(bid.value(&IssueId::new("colour")), None);
    }

    #[test]
    fn bid_shared_values_counts_matching_issues() {
        let a = Bid::new().with("a", "1").with("b", "1").with("c", "1");
        let b = Bid::new().with("a", "1").with("b", "2").with("c", "1");
        assert_eq!(a.shared_values(&b), 2);
        assert_eq!(b.shared_values(&a), 2);
        assert_eq!(a.shared_values(&a), 3);
    }

    #[test]
    fn bid_from_iterator() {
        let bid: Bid = [("x", "1"), ("y", "2")].into_iter().collect();
        assert_eq!(bid.to_string(), "{x=1, y=2}");
    }

    #[test]
    fn bid_serializes_as_plain_map() {
        let bid = Bid::new().with("price", "low");
        let json = serde_json::to_string(&bid).unwrap();
        assert_eq!(json, r#"{"price":"low"}"#);

        let parsed: Bid = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bid);
    }

    #[test_case(-0.5, 0.0 ; "below zero clamps")]
    #[test_case(0.25, 0.25 ; "inside range")]
    #[test_case(1.5, 1.0 ; "above one clamps")]
    #[test_case(f64::NAN, 0.0 ; "nan is start")]
    fn progress_new_clamps(input: f64, expected: f64) {
        assert_eq!(Progress::new(input).value(), expected);
    }

    #[test]
    fn progress_windows_are_half_open() {
        assert!(Progress::new(0.85).in_window(0.85, 0.95));
        assert!(!Progress::new(0.95).in_window(0.85, 0.95));
        assert!(Progress::new(0.95).in_window(0.95, f64::INFINITY));
    }

    #[test]
    fn progress_of_rounds() {
        assert_eq!(Progress::of_rounds(5, 10).value(), 0.5);
        assert_eq!(Progress::of_rounds(3, 0), Progress::DEADLINE);
    }
}
