//! The opponent model aggregate.
//!
//! An [`OpponentModel`] is created when the counterpart makes its first
//! proposal and is updated once per received proposal. It answers two
//! questions for the bidding strategy:
//!
//! - [`OpponentModel::predicted_utility`] — how much would the opponent
//!   like this bid?
//! - [`OpponentModel::classification`] — how is the opponent behaving?

use std::collections::BTreeMap;

use parley_core::{Bid, Domain, IssueId, Progress, UtilitySpace, ValueId};
use tracing::{debug, info};

use crate::classifier::{Classification, UtilitySeries};
use crate::error::{OpponentError, Result};
use crate::estimator::IssueEstimator;
use crate::snapshot::{ImportSummary, IssueSnapshot, OpponentSnapshot};


/// Frequency-based model of one counterpart's preferences and behaviour.
#[derive(Debug, Clone)]
pub struct OpponentModel {
    domain: Domain,
    offers: Vec<Bid>,
    consistency_score: f64,
    estimators: BTreeMap<IssueId, IssueEstimator>,
    series: UtilitySeries,
    classification: Classification,
}

impl OpponentModel {
    /// Creates an empty model with one estimator per domain issue.
    #[must_use]
    pub fn new(domain: &Domain) -> Self {
        let estimators = domain
            .iter()
            .map(|(issue, values)| (issue.clone(), IssueEstimator::new(values.len())))
            .collect();
        Self {
            domain: domain.clone(),
            offers: Vec::new(),
            consistency_score: 0.0,
            estimators,
            series: UtilitySeries::default(),
            classification: Classification::default(),
        }
    }

    /// Registers a proposal received from the opponent at `progress`.
    ///
    /// When `own_utility` is given, the bid's self-utility is recorded and
    /// the behaviour classifiers are re-run.
    ///
    /// # Errors
    ///
    /// Returns [`OpponentError::InvalidBid`] for an incomplete bid and
    /// [`OpponentError::Utility`] if the evaluator fails. The model is left
    /// unchanged in both cases.
    pub fn update(
        &mut self,
        bid: &Bid,
        progress: Progress,
        own_utility: Option<&dyn UtilitySpace>,
    ) -> Result<()> {
        self.domain.validate(bid).map_err(OpponentError::InvalidBid)?;
        let utility = own_utility
            .map(|space| space.utility(bid))
            .transpose()
            .map_err(OpponentError::Utility)?;

        if let Some(previous) = self.offers.last() {
            self.consistency_score += similarity(previous, bid, self.domain.issue_count());
        }
        self.offers.push(bid.clone());

        if let Some(utility) = utility {
            self.series.record(utility, progress);
            let raised = self.classification.refresh(&self.series);
            if raised.any() {
                info!(
                    conceding = raised.conceding,
                    stubborn = raised.stubborn,
                    deadlocked = raised.deadlocked,
                    late_conceding = raised.late_conceding,
                    %progress,
                    "opponent classification raised"
                );
            }
        }

        for (issue, estimator) in &mut self.estimators {
            if let Some(value) = bid.value(issue) {
                estimator.update(value, progress);
            }
        }

        debug!(
            offers = self.offers.len(),
            consistency = self.consistency_score,
            %progress,
            "opponent model updated"
        );
        Ok(())
    }

    /// Predicted utility of `bid` for the opponent, in `[0, 1]`.
    ///
    /// Returns 0 before any proposal has been observed. Issue weights are
    /// normalized to sum to 1, falling back to an equal split when they
    /// are all zero; values never proposed contribute 0.
    #[must_use]
    pub fn predicted_utility(&self, bid: &Bid) -> f64 {
        if self.offers.is_empty() || self.estimators.is_empty() {
            return 0.0;
        }

        let total_weight: f64 = self.estimators.values().map(IssueEstimator::weight).sum();
        let equal_share = 1.0 / self.estimators.len() as f64;

        self.estimators
            .iter()
            .map(|(issue, estimator)| {
                let weight = if total_weight == 0.0 {
                    equal_share
                } else {
                    estimator.weight() / total_weight
                };
                let value_utility = bid
                    .value(issue)
                    .map_or(0.0, |value| estimator.value_utility(value));
                weight * value_utility
            })
            .sum()
    }

    /// Exports the persisted subset of the model.
    #[must_use]
    pub fn export(&self) -> OpponentSnapshot {
        let issue_weights = self
            .estimators
            .iter()
            .map(|(issue, estimator)| {
                let value_counts = estimator
                    .records()
                    .map(|(value, record)| (value.clone(), record.count()))
                    .collect();
                (
                    issue.clone(),
                    IssueSnapshot {
                        weight: estimator.weight(),
                        value_counts,
                    },
                )
            })
            .collect();
        OpponentSnapshot {
            is_conceder: self.classification.conceding,
            issue_weights,
        }
    }

    /// Warm-starts the model from a snapshot of an earlier session.
    ///
    /// Entries for issues or values outside the domain, and non-finite
    /// weights, are skipped. The conceder flag can be raised, never cleared.
    pub fn import(&mut self, snapshot: &OpponentSnapshot) -> ImportSummary {
        let mut summary = ImportSummary::default();
        self.classification.conceding |= snapshot.is_conceder;

        for (issue, issue_snapshot) in &snapshot.issue_weights {
            let Some(estimator) = self.estimators.get_mut(issue) else {
                summary.skipped += 1 + issue_snapshot.value_counts.len();
                continue;
            };
            if !issue_snapshot.weight.is_finite() {
                summary.skipped += 1 + issue_snapshot.value_counts.len();
                continue;
            }

            let mut counts: Vec<(ValueId, u64)> = Vec::new();
            for (value, count) in &issue_snapshot.value_counts {
                if self.domain.contains_value(issue, value) {
                    counts.push((value.clone(), *count));
                } else {
                    summary.skipped += 1;
                }
            }
            summary.values += counts.len();
            summary.issues += 1;
            estimator.restore(issue_snapshot.weight, counts);
        }

        debug!(
            issues = summary.issues,
            values = summary.values,
            skipped = summary.skipped,
            "opponent model imported"
        );
        summary
    }

    /// The domain the model was built for.
    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Every received bid, oldest first.
    #[must_use]
    pub fn offers(&self) -> &[Bid] {
        &self.offers
    }

    /// The most recently received bid.
    #[must_use]
    pub fn last_offer(&self) -> Option<&Bid> {
        self.offers.last()
    }

    /// Number of updates applied.
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.offers.len()
    }

    /// Accumulated similarity between consecutive offers.
    #[must_use]
    pub const fn consistency_score(&self) -> f64 {
        self.consistency_score
    }

    /// Estimator of `issue`.
    #[must_use]
    pub fn estimator(&self, issue: &IssueId) -> Option<&IssueEstimator> {
        self.estimators.get(issue)
    }

    /// Estimated weight of `issue`, 0 for unknown issues.
    #[must_use]
    pub fn issue_weight(&self, issue: &IssueId) -> f64 {
        self.estimators.get(issue).map_or(0.0, IssueEstimator::weight)
    }

    /// Self-utility series of the received bids.
    #[must_use]
    pub const fn utility_series(&self) -> &UtilitySeries {
        &self.series
    }

    /// Current behaviour flags.
    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.classification
    }

    /// Opponent classified as conceding.
    #[must_use]
    pub const fn is_conceding(&self) -> bool {
        self.classification.conceding
    }

    /// Opponent classified as stubborn.
    #[must_use]
    pub const fn is_stubborn(&self) -> bool {
        self.classification.stubborn
    }

    /// Negotiation classified as deadlocked.
    #[must_use]
    pub const fn is_deadlocked(&self) -> bool {
        self.classification.deadlocked
    }

    /// Opponent classified as conceding late.
    #[must_use]
    pub const fn is_late_conceding(&self) -> bool {
        self.classification.late_conceding
    }
}

/// Fraction of issues on which two bids agree.
fn similarity(previous: &Bid, current: &Bid, issue_count: usize) -> f64 {
    if issue_count == 0 {
        return 0.0;
    }
    previous.shared_values(current) as f64 / issue_count as f64
}
