//! Acceptance and counter-offer search.
//!
//! The strategy concedes along `1 − progress^(1/beta)` and bends that curve
//! with the opponent's behaviour flags: it asks for more from a conceder,
//! settles for a floor against a stubborn opponent, and looks for anything
//! the opponent might like once the negotiation is deadlocked.

use parley_core::{Bid, BidSpace, Progress, UtilitySpace};
use parley_opponent::{Classification, OpponentModel};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::StrategyConfig;
use crate::error::{Result, StrategyError};


/// Self-utility the strategy aims for at `progress`.
///
/// Equals 1 at progress 0 and 0 at progress 1. `beta` below 1 holds the
/// target high until late; above 1 it drops early.
#[must_use]
pub fn target_utility(progress: f64, beta: f64) -> f64 {
    1.0 - progress.powf(1.0 / beta)
}

/// One turn's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "bid", rename_all = "snake_case")]
pub enum Action {
    /// Accept the opponent's latest proposal.
    Accept(Bid),
    /// Propose a counter-offer.
    Offer(Bid),
}

impl Action {
    /// The bid accepted or offered.
    #[must_use]
    pub const fn bid(&self) -> &Bid {
        match self {
            Self::Accept(bid) | Self::Offer(bid) => bid,
        }
    }

    /// Whether this action ends the negotiation with an agreement.
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept(_))
    }
}

/// Time-dependent, opponent-aware bidding strategy over one utility profile.
#[derive(Debug)]
pub struct BiddingStrategy<U> {
    profile: U,
    bid_space: BidSpace,
    config: StrategyConfig,
    rng: StdRng,
}

impl<U: UtilitySpace> BiddingStrategy<U> {
    /// Creates a strategy seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::InvalidConfig`] for a config that fails
    /// validation and [`StrategyError::BidSpace`] if the profile's domain
    /// cannot be enumerated.
    pub fn new(profile: U, config: StrategyConfig) -> Result<Self> {
        Self::with_rng(profile, config, StdRng::from_entropy())
    }

    /// Creates a strategy whose random search is reproducible from `seed`.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn with_seed(profile: U, config: StrategyConfig, seed: u64) -> Result<Self> {
        Self::with_rng(profile, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(profile: U, config: StrategyConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let bid_space = BidSpace::new(profile.domain()).map_err(StrategyError::BidSpace)?;
        Ok(Self {
            profile,
            bid_space,
            config,
            rng,
        })
    }

    /// The self-utility profile.
    #[must_use]
    pub const fn profile(&self) -> &U {
        &self.profile
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Self-utility of `bid`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Utility`] if the profile cannot evaluate the bid.
    pub fn self_utility(&self, bid: &Bid) -> Result<f64> {
        self.profile.utility(bid).map_err(StrategyError::Utility)
    }

    /// Decides whether to accept `received` at `progress`.
    ///
    /// Always rejects when nothing has been received yet.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Utility`] if the profile fails on the
    /// received bid or on a sampled counter-offer.
    pub fn accept(
        &mut self,
        received: Option<&Bid>,
        progress: Progress,
        opponent: Option<&OpponentModel>,
    ) -> Result<bool> {
        Ok(self.judge(received, progress, opponent)?.accepted)
    }

    /// Searches the outcome space for a counter-offer.
    ///
    /// Never fails for lack of a suitable bid: when no sample lands near the
    /// target the search falls back to bids the opponent is predicted to
    /// like, and finally to any random bid.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Utility`] if the profile fails on a sample.
    pub fn propose(
        &mut self,
        progress: Progress,
        opponent: Option<&OpponentModel>,
    ) -> Result<Bid> {
        let flags = flags_of(opponent);
        let (target, margin) = self.adjusted_target(progress, flags);

        let mut best: Option<(f64, Bid)> = None;
        let mut candidates = 0_usize;
        for _ in 0..self.config.proposal.samples {
            let bid = self.bid_space.sample(&mut self.rng);
            let utility = self.self_utility(&bid)?;
            if (utility - target).abs() > margin {
                continue;
            }
            candidates += 1;
            let predicted = opponent.map_or(0.0, |model| model.predicted_utility(&bid));
            let score = self.blend(utility, predicted, progress);
            if best.as_ref().is_none_or(|(top, _)| score > *top) {
                best = Some((score, bid));
            }
        }

        if let Some((score, bid)) = best.filter(|_| !flags.deadlocked) {
            debug!(%progress, target, margin, candidates, score, %bid, "counter-offer found near target");
            return Ok(bid);
        }
        self.fallback(progress, opponent)
    }

    /// Ranks `bid` as a counter-offer at `progress`.
    ///
    /// Blends self-utility and predicted opponent utility, shifting weight
    /// towards the opponent as time runs out, and discounts both by time
    /// pressure. The opponent term is 0 without a model.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Utility`] if the profile fails on `bid`.
    pub fn score(
        &self,
        bid: &Bid,
        progress: Progress,
        opponent: Option<&OpponentModel>,
    ) -> Result<f64> {
        let utility = self.self_utility(bid)?;
        let predicted = opponent.map_or(0.0, |model| model.predicted_utility(bid));
        Ok(self.blend(utility, predicted, progress))
    }

    /// Accepts `received` or proposes a counter-offer.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Utility`] if the profile fails.
    pub fn decide(
        &mut self,
        received: Option<&Bid>,
        progress: Progress,
        opponent: Option<&OpponentModel>,
    ) -> Result<Action> {
        let judgement = self.judge(received, progress, opponent)?;
        let action = match (judgement.accepted, received) {
            (true, Some(bid)) => Action::Accept(bid.clone()),
            _ => match judgement.planned {
                Some(planned) => Action::Offer(planned),
                None => Action::Offer(self.propose(progress, opponent)?),
            },
        };
        info!(
            %progress,
            accept = action.is_accept(),
            bid = %action.bid(),
            "decision made"
        );
        Ok(action)
    }

    fn judge(
        &mut self,
        received: Option<&Bid>,
        progress: Progress,
        opponent: Option<&OpponentModel>,
    ) -> Result<Judgement> {
        let Some(received) = received else {
            return Ok(Judgement::rejected());
        };
        let acceptance = &self.config.acceptance;
        let time = progress.value();
        let flags = flags_of(opponent);

        let mut reservation = acceptance.reservation(time);
        if flags.conceding {
            reservation += acceptance.conceder_reservation_bonus;
        }
        let utility = self.self_utility(received)?;

        if flags.deadlocked
            && flags.stubborn
            && !flags.late_conceding
            && time > acceptance.deadlock_progress
        {
            let accepted = utility >= acceptance.deadlock_floor;
            debug!(%progress, utility, accepted, "breaking deadlock");
            return Ok(Judgement {
                accepted,
                planned: None,
            });
        }
        if utility < reservation {
            return Ok(Judgement::rejected());
        }

        let planned = self.propose(progress, opponent)?;
        let planned_utility = self.self_utility(&planned)?;
        let acceptance = &self.config.acceptance;
        let accepted = if flags.conceding {
            utility >= acceptance.conceder_planned_ratio * planned_utility
        } else {
            let target = target_utility(time, self.config.beta);
            utility >= target.max(acceptance.planned_ratio * planned_utility)
        };
        debug!(%progress, utility, reservation, planned_utility, accepted, "received bid judged");
        Ok(Judgement {
            accepted,
            planned: Some(planned),
        })
    }

    /// Target and margin after the behaviour adjustments.
    fn adjusted_target(&self, progress: Progress, flags: Classification) -> (f64, f64) {
        let proposal = &self.config.proposal;
        let mut target = target_utility(progress.value(), self.config.beta);
        let mut margin = proposal.margin;

        // Against an opponent both conceding and stubborn, conceding wins.
        if flags.conceding {
            target = (target + proposal.conceder_target_bonus).min(1.0);
        } else if flags.stubborn {
            target = (target - proposal.stubborn_target_discount).max(proposal.stubborn_target_floor);
        }
        if flags.deadlocked {
            target = (target - proposal.deadlock_target_discount).max(proposal.deadlock_target_floor);
            margin = proposal.deadlock_margin;
        }
        (target, margin)
    }

    /// Best bid for the opponent among acceptable ones, else any bid.
    fn fallback(&mut self, progress: Progress, opponent: Option<&OpponentModel>) -> Result<Bid> {
        let floor = self.config.proposal.fallback_floor;
        let mut best: Option<(f64, Bid)> = None;
        for _ in 0..self.config.proposal.samples {
            let bid = self.bid_space.sample(&mut self.rng);
            if self.self_utility(&bid)? < floor {
                continue;
            }
            let predicted = opponent.map_or(0.0, |model| model.predicted_utility(&bid));
            if best
                .as_ref()
                .is_none_or(|(top, _)| predicted.total_cmp(top).is_gt())
            {
                best = Some((predicted, bid));
            }
        }

        match best {
            Some((predicted, bid)) => {
                debug!(%progress, predicted, %bid, "fallback counter-offer");
                Ok(bid)
            }
            None => {
                let bid = self.bid_space.sample(&mut self.rng);
                debug!(%progress, %bid, "no acceptable fallback, offering random bid");
                Ok(bid)
            }
        }
    }

    fn blend(&self, utility: f64, predicted: f64, progress: Progress) -> f64 {
        let scoring = &self.config.scoring;
        let time = progress.value();
        let alpha = (scoring.alpha_start - scoring.alpha_end).mul_add(-time, scoring.alpha_start);
        let pressure = 1.0 - time.powf(1.0 / scoring.eps);
        alpha * pressure * utility + (1.0 - alpha) * pressure * predicted
    }
}

/// Outcome of judging a received bid, with the counter-offer planned on the way.
struct Judgement {
    accepted: bool,
    planned: Option<Bid>,
}

impl Judgement {
    const fn rejected() -> Self {
        Self {
            accepted: false,
            planned: None,
        }
    }
}

fn flags_of(opponent: Option<&OpponentModel>) -> Classification {
    opponent.map(OpponentModel::classification).unwrap_or_default()
}
