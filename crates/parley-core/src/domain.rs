//! Negotiation domain: the issues and their finite value sets.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::{Bid, IssueId, ValueId};

/// Immutable set of issues, each with an ordered, finite set of values.
///
/// Serialized as `{ "issue": ["value", ...], ... }`. Deserialization runs
/// the same validation as [`Domain::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<IssueId, Vec<ValueId>>", into = "BTreeMap<IssueId, Vec<ValueId>>")]
pub struct Domain {
    issues: BTreeMap<IssueId, Vec<ValueId>>,
}

impl Domain {
    /// Creates a domain from an issue → values mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no issues, an issue has no values,
    /// or an issue lists a value twice.
    pub fn new(issues: BTreeMap<IssueId, Vec<ValueId>>) -> Result<Self> {
        if issues.is_empty() {
            return Err(CoreError::EmptyDomain);
        }
        for (issue, values) in &issues {
            if values.is_empty() {
                return Err(CoreError::EmptyIssue {
                    issue: issue.to_string(),
                });
            }
            let mut seen = BTreeSet::new();
            for value in values {
                if !seen.insert(value) {
                    return Err(CoreError::DuplicateValue {
                        issue: issue.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(Self { issues })
    }

    /// Starts a [`DomainBuilder`].
    #[must_use]
    pub fn builder() -> DomainBuilder {
        DomainBuilder::default()
    }

    /// Iterates over the issues in a stable order.
    pub fn issues(&self) -> impl Iterator<Item = &IssueId> {
        self.issues.keys()
    }

    /// Iterates over `(issue, values)` pairs in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&IssueId, &[ValueId])> {
        self.issues
            .iter()
            .map(|(issue, values)| (issue, values.as_slice()))
    }

    /// Returns the values of `issue`, if it belongs to the domain.
    #[must_use]
    pub fn values(&self, issue: &IssueId) -> Option<&[ValueId]> {
        self.issues.get(issue).map(Vec::as_slice)
    }

    /// Number of issues.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Returns true if `issue` belongs to the domain.
    #[must_use]
    pub fn contains_issue(&self, issue: &IssueId) -> bool {
        self.issues.contains_key(issue)
    }

    /// Returns true if `value` is one of the values of `issue`.
    #[must_use]
    pub fn contains_value(&self, issue: &IssueId, value: &ValueId) -> bool {
        self.issues
            .get(issue)
            .is_some_and(|values| values.contains(value))
    }

    /// Checks that `bid` assigns exactly one known value to every issue.
    ///
    /// # Errors
    ///
    /// Returns the first missing issue, unknown issue or unknown value found.
    pub fn validate(&self, bid: &Bid) -> Result<()> {
        for (issue, value) in bid.iter() {
            let values = self.issues.get(issue).ok_or_else(|| CoreError::UnknownIssue {
                issue: issue.to_string(),
            })?;
            if !values.contains(value) {
                return Err(CoreError::UnknownValue {
                    issue: issue.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if let Some(missing) = self.issues.keys().find(|issue| bid.value(issue).is_none()) {
            return Err(CoreError::MissingIssue {
                issue: missing.to_string(),
            });
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<IssueId, Vec<ValueId>>> for Domain {
    type Error = CoreError;

    fn try_from(issues: BTreeMap<IssueId, Vec<ValueId>>) -> Result<Self> {
        Self::new(issues)
    }
}

impl From<Domain> for BTreeMap<IssueId, Vec<ValueId>> {
    fn from(domain: Domain) -> Self {
        domain.issues
    }
}

/// Incremental constructor for [`Domain`].
#[derive(Debug, Default, Clone)]
pub struct DomainBuilder {
    issues: BTreeMap<IssueId, Vec<ValueId>>,
}

impl DomainBuilder {
    /// Adds an issue with its values.
    #[must_use]
    pub fn issue<I, V>(mut self, issue: impl Into<IssueId>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ValueId>,
    {
        self.issues
            .insert(issue.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Validates and builds the domain.
    ///
    /// # Errors
    ///
    /// See [`Domain::new`].
    pub fn build(self) -> Result<Domain> {
        Domain::new(self.issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_domain() -> Domain {
        Domain::builder()
            .issue("price", ["low", "mid", "high"])
            .issue("delivery", ["fast", "slow"])
            .build()
            .unwrap()
    }

    #[test]
    fn domain_builder_builds() {
        let domain = sample_domain();
        assert_eq!(domain.issue_count(), 2);
        assert_eq!(domain.values(&IssueId::new("price")).map(<[_]>::len), Some(3));
        assert!(domain.contains_value(&IssueId::new("delivery"), &ValueId::new("slow")));
        assert!(!domain.contains_value(&IssueId::new("delivery"), &ValueId::new("never")));
    }

    #[test]
    fn domain_rejects_empty() {
        let result = Domain::builder().build();
        assert_eq!(result, Err(CoreError::EmptyDomain));
    }

    #[test]
    fn domain_rejects_issue_without_values() {
        let result = Domain::builder().issue("price", Vec::<&str>::new()).build();
        assert!(matches!(result, Err(CoreError::EmptyIssue { .. })));
    }

    #[test]
    fn domain_rejects_duplicate_values() {
        let result = Domain::builder().issue("price", ["low", "low"]).build();
        assert!(matches!(result, Err(CoreError::DuplicateValue { .. })));
    }

    #[test]
    fn validate_accepts_complete_bid() {
        let domain = sample_domain();
        let bid = Bid::new().with("price", "mid").with("delivery", "fast");
        assert!(domain.validate(&bid).is_ok());
    }

    #[test]
    fn validate_rejects_partial_bid() {
        let domain = sample_domain();
        let bid = Bid::new().with("price", "mid");
        assert_eq!(
            domain.validate(&bid),
            Err(CoreError::MissingIssue {
                issue: "delivery".into()
            })
        );
    }

    #[test]
    fn validate_rejects_unknown_issue_and_value() {
        let domain = sample_domain();
        let extra = Bid::new()
            .with("price", "mid")
            .with("delivery", "fast")
            .with("colour", "red");
        assert!(matches!(domain.validate(&extra), Err(CoreError::UnknownIssue { .. })));

        let bad_value = Bid::new().with("price", "free").with("delivery", "fast");
        assert!(matches!(domain.validate(&bad_value), Err(CoreError::UnknownValue { .. })));
    }

    #[test]
    fn domain_json_roundtrip_validates() {
        let domain = sample_domain();
        let json = serde_json::to_string(&domain).unwrap();
        let parsed: Domain = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, domain);

        let invalid = serde_json::from_str::<Domain>(r#"{"price": []}"#);
        assert!(invalid.is_err());
    }
}
