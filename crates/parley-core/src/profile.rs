//! Self-utility evaluation.
//!
//! [`UtilitySpace`] is the seam through which the negotiation engine asks
//! "how good is this bid for me?". [`LinearAdditiveProfile`] is the bundled
//! implementation: a weighted sum of per-issue value utilities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::{CoreError, Result};
use crate::types::{Bid, IssueId, ValueId};

/// Tolerance on the issue-weight sum of a profile.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// A self-utility evaluator over a fixed domain.
pub trait UtilitySpace {
    /// The domain this evaluator is defined over.
    fn domain(&self) -> &Domain;

    /// Utility of `bid` in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bid cannot be evaluated, e.g. because it is
    /// not a complete bid of [`UtilitySpace::domain`].
    fn utility(&self, bid: &Bid) -> Result<f64>;
}

/// Linear additive preference profile.
///
/// `utility(bid) = Σ issue_weight[i] × value_utility[i][bid[i]]`
///
/// ```json
/// {
///   "domain": { "price": ["low", "high"] },
///   "issue_weights": { "price": 1.0 },
///   "value_utilities": { "price": { "low": 1.0, "high": 0.0 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct LinearAdditiveProfile {
    domain: Domain,
    issue_weights: BTreeMap<IssueId, f64>,
    value_utilities: BTreeMap<IssueId, BTreeMap<ValueId, f64>>,
}

#[derive(Deserialize)]
struct RawProfile {
    domain: Domain,
    issue_weights: BTreeMap<IssueId, f64>,
    value_utilities: BTreeMap<IssueId, BTreeMap<ValueId, f64>>,
}

impl TryFrom<RawProfile> for LinearAdditiveProfile {
    type Error = CoreError;

    fn try_from(raw: RawProfile) -> Result<Self> {
        Self::new(raw.domain, raw.issue_weights, raw.value_utilities)
    }
}

impl LinearAdditiveProfile {
    /// Creates a validated profile.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProfile`] if a weight is negative or the
    /// weights do not sum to 1, if a value utility lies outside `[0, 1]`,
    /// or if some domain value has no utility. Issues or values outside
    /// the domain are reported as unknown.
    pub fn new(
        domain: Domain,
        issue_weights: BTreeMap<IssueId, f64>,
        value_utilities: BTreeMap<IssueId, BTreeMap<ValueId, f64>>,
    ) -> Result<Self> {
        for issue in issue_weights.keys().chain(value_utilities.keys()) {
            if !domain.contains_issue(issue) {
                return Err(CoreError::UnknownIssue {
                    issue: issue.to_string(),
                });
            }
        }

        let mut sum = 0.0;
        for (issue, _) in domain.iter() {
            let weight = issue_weights.get(issue).copied().unwrap_or(0.0);
            if !weight.is_finite() || weight < 0.0 {
                return Err(CoreError::InvalidProfile {
                    reason: format!("weight of issue '{issue}' must be non-negative, got {weight}"),
                });
            }
            sum += weight;
        }
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CoreError::InvalidProfile {
                reason: format!("issue weights must sum to 1, got {sum}"),
            });
        }

        for (issue, values) in domain.iter() {
            let utilities = value_utilities.get(issue);
            for value in values {
                let utility = utilities.and_then(|u| u.get(value)).ok_or_else(|| {
                    CoreError::InvalidProfile {
                        reason: format!("no utility for value '{value}' of issue '{issue}'"),
                    }
                })?;
                if !(0.0..=1.0).contains(utility) {
                    return Err(CoreError::InvalidProfile {
                        reason: format!(
                            "utility of '{value}' for issue '{issue}' must be in [0, 1], got {utility}"
                        ),
                    });
                }
            }
            if let Some(utilities) = utilities {
                if let Some(unknown) = utilities.keys().find(|v| !values.contains(v)) {
                    return Err(CoreError::UnknownValue {
                        issue: issue.to_string(),
                        value: unknown.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            domain,
            issue_weights,
            value_utilities,
        })
    }

    /// Parses and validates a profile from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] for malformed JSON or failed validation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Weight of `issue`, 0 for issues without an explicit weight.
    #[must_use]
    pub fn issue_weight(&self, issue: &IssueId) -> f64 {
        self.issue_weights.get(issue).copied().unwrap_or(0.0)
    }

    /// Utility of `value` within `issue`, if defined.
    #[must_use]
    pub fn value_utility(&self, issue: &IssueId, value: &ValueId) -> Option<f64> {
        self.value_utilities.get(issue)?.get(value).copied()
    }
}

impl UtilitySpace for LinearAdditiveProfile {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn utility(&self, bid: &Bid) -> Result<f64> {
        self.domain.validate(bid)?;
        let total = bid
            .iter()
            .map(|(issue, value)| {
                self.issue_weight(issue) * self.value_utility(issue, value).unwrap_or(0.0)
            })
            .sum::<f64>();
        Ok(total.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_JSON: &str = r#"{
        "domain": { "price": ["low", "mid", "high"], "delivery": ["fast", "slow"] },
        "issue_weights": { "price": 0.7, "delivery": 0.3 },
        "value_utilities": {
            "price": { "low": 1.0, "mid": 0.5, "high": 0.0 },
            "delivery": { "fast": 1.0, "slow": 0.2 }
        }
    }"#;

    #[test]
    fn profile_parses_and_evaluates() {
        let profile = LinearAdditiveProfile::from_json(PROFILE_JSON).unwrap();
        let bid = Bid::new().with("price", "mid").with("delivery", "slow");
        let utility = profile.utility(&bid).unwrap();
        assert!((utility - (0.7 * 0.5 + 0.3 * 0.2)).abs() < 1e-12);
    }

    #[test]
    fn profile_best_bid_is_one() {
        let profile = LinearAdditiveProfile::from_json(PROFILE_JSON).unwrap();
        let bid = Bid::new().with("price", "low").with("delivery", "fast");
        assert!((profile.utility(&bid).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn profile_rejects_incomplete_bid() {
        let profile = LinearAdditiveProfile::from_json(PROFILE_JSON).unwrap();
        let bid = Bid::new().with("price", "low");
        assert!(matches!(profile.utility(&bid), Err(CoreError::MissingIssue { .. })));
    }

    #[test]
    fn profile_rejects_bad_weight_sum() {
        let json = PROFILE_JSON.replace("0.7", "0.9");
        let err = LinearAdditiveProfile::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("sum to 1"));
    }

    #[test]
    fn profile_rejects_missing_value_utility() {
        let json = PROFILE_JSON.replace(r#", "high": 0.0"#, "");
        let err = LinearAdditiveProfile::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("no utility for value 'high'"));
    }

    #[test]
    fn profile_rejects_out_of_range_utility() {
        let json = PROFILE_JSON.replace(r#""fast": 1.0"#, r#""fast": 1.5"#);
        assert!(LinearAdditiveProfile::from_json(&json).is_err());
    }

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = LinearAdditiveProfile::from_json(PROFILE_JSON).unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        let parsed = LinearAdditiveProfile::from_json(&json).unwrap();
        assert_eq!(parsed, profile);
    }
}
