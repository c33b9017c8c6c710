//! Tunable constants of the bidding strategy.
//!
//! The defaults are the reference behaviour. Every section can be partially
//! overridden from JSON; missing fields keep their default.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};

/// Full strategy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Concession curve exponent: `target = 1 − progress^(1/beta)`.
    ///
    /// Below 1 is boulware (holds firm), above 1 is conceder.
    pub beta: f64,
    /// When to accept the received bid.
    pub acceptance: AcceptanceConfig,
    /// How counter-offers are searched.
    pub proposal: ProposalConfig,
    /// How candidate counter-offers are ranked.
    pub scoring: ScoringConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            beta: 0.2,
            acceptance: AcceptanceConfig::default(),
            proposal: ProposalConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl StrategyConfig {
    /// Parses a (possibly partial) configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::InvalidConfig`] for malformed JSON or
    /// values that fail [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| StrategyError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the strategy cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::InvalidConfig`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return invalid(format!("beta must be positive, got {}", self.beta));
        }
        if !(self.scoring.eps.is_finite() && self.scoring.eps > 0.0) {
            return invalid(format!("scoring.eps must be positive, got {}", self.scoring.eps));
        }
        if self.proposal.samples == 0 {
            return invalid("proposal.samples must be at least 1".to_string());
        }
        for (name, value) in [
            ("proposal.margin", self.proposal.margin),
            ("proposal.deadlock_margin", self.proposal.deadlock_margin),
            ("scoring.alpha_start", self.scoring.alpha_start),
            ("scoring.alpha_end", self.scoring.alpha_end),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be in [0, 1], got {value}"));
            }
        }
        Ok(())
    }
}

fn invalid(reason: String) -> Result<()> {
    Err(StrategyError::InvalidConfig { reason })
}

/// Thresholds for accepting the opponent's latest bid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceConfig {
    /// Reservation threshold at progress 0.
    pub reservation_start: f64,
    /// Reservation threshold drop over the whole session.
    pub reservation_decline: f64,
    /// Added to the reservation threshold against a conceder.
    pub conceder_reservation_bonus: f64,
    /// Progress after which a deadlock with a stubborn opponent is broken.
    pub deadlock_progress: f64,
    /// Minimum self-utility accepted when breaking a deadlock.
    pub deadlock_floor: f64,
    /// Fraction of the planned counter-offer's utility required normally.
    pub planned_ratio: f64,
    /// Fraction of the planned counter-offer's utility required against a conceder.
    pub conceder_planned_ratio: f64,
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            reservation_start: 0.6,
            reservation_decline: 0.4,
            conceder_reservation_bonus: 0.05,
            deadlock_progress: 0.9,
            deadlock_floor: 0.3,
            planned_ratio: 0.85,
            conceder_planned_ratio: 0.95,
        }
    }
}

impl AcceptanceConfig {
    /// `reservation_start − reservation_decline × progress`.
    #[must_use]
    pub fn reservation(&self, progress: f64) -> f64 {
        self.reservation_decline.mul_add(-progress, self.reservation_start)
    }
}

/// Parameters of the counter-offer search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalConfig {
    /// Random bids drawn per search round.
    pub samples: usize,
    /// Accepted distance between a candidate's utility and the target.
    pub margin: f64,
    /// Target increase against a conceder (capped at 1).
    pub conceder_target_bonus: f64,
    /// Target decrease against a stubborn opponent.
    pub stubborn_target_discount: f64,
    /// Lowest target after the stubborn adjustment.
    pub stubborn_target_floor: f64,
    /// Target decrease in a deadlock.
    pub deadlock_target_discount: f64,
    /// Lowest target after the deadlock adjustment.
    pub deadlock_target_floor: f64,
    /// Margin used in a deadlock.
    pub deadlock_margin: f64,
    /// Minimum self-utility of a fallback bid.
    pub fallback_floor: f64,
}

impl Default for ProposalConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            margin: 0.05,
            conceder_target_bonus: 0.05,
            stubborn_target_discount: 0.05,
            stubborn_target_floor: 0.7,
            deadlock_target_discount: 0.1,
            deadlock_target_floor: 0.55,
            deadlock_margin: 0.1,
            fallback_floor: 0.6,
        }
    }
}

/// Weights of the candidate score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of self-utility at progress 0.
    pub alpha_start: f64,
    /// Weight of self-utility at progress 1.
    pub alpha_end: f64,
    /// Time-pressure exponent: `1 − progress^(1/eps)`.
    pub eps: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha_start: 0.95,
            alpha_end: 0.5,
            eps: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_reference_behaviour() {
        let config = StrategyConfig::default();
        assert_eq!(config.beta, 0.2);
        assert_eq!(config.proposal.samples, 1000);
        assert_eq!(config.proposal.margin, 0.05);
        assert_eq!(config.acceptance.deadlock_floor, 0.3);
        assert_eq!(config.scoring.alpha_start, 0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reservation_declines_linearly() {
        let acceptance = AcceptanceConfig::default();
        assert!((acceptance.reservation(0.0) - 0.6).abs() < 1e-12);
        assert!((acceptance.reservation(0.5) - 0.4).abs() < 1e-12);
        assert!((acceptance.reservation(1.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = StrategyConfig::from_json(r#"{"beta": 0.5, "proposal": {"samples": 200}}"#).unwrap();
        assert_eq!(config.beta, 0.5);
        assert_eq!(config.proposal.samples, 200);
        assert_eq!(config.proposal.margin, 0.05);
        assert_eq!(config.acceptance, AcceptanceConfig::default());
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(StrategyConfig::from_json("{}").unwrap(), StrategyConfig::default());
    }

    #[test]
    fn rejects_non_positive_beta() {
        let err = StrategyConfig::from_json(r#"{"beta": 0.0}"#).unwrap_err();
        assert!(err.to_string().contains("beta must be positive"));
    }

    #[test]
    fn rejects_zero_samples() {
        let err = StrategyConfig::from_json(r#"{"proposal": {"samples": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("samples"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            StrategyConfig::from_json("{"),
            Err(StrategyError::InvalidConfig { .. })
        ));
    }
}
