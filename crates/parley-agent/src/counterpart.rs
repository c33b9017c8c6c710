//! Reference counterparts to negotiate against.
//!
//! Classic time-dependent tactics plus a random baseline. They ignore the
//! opponent entirely and exist to exercise the [`Negotiator`](crate::Negotiator).

use std::fmt;
use std::str::FromStr;

use parley_core::{Bid, BidSpace, Progress, UtilitySpace};
use parley_strategy::Action;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::party::{Inform, Party, PartyId};

/// Largest outcome space a time-dependent party will rank up front.
pub const MAX_RANKED_BIDS: u128 = 1_000_000;

/// Self-utility above which the random party accepts.
pub const RANDOM_ACCEPTANCE: f64 = 0.6;

/// The bundled counterpart tactics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterpartKind {
    /// Concedes only near the deadline (`e = 0.2`).
    Boulware,
    /// Concedes linearly in time (`e = 1`).
    Linear,
    /// Concedes early (`e = 2`).
    Conceder,
    /// Never concedes (`e = 0`).
    Hardliner,
    /// Offers uniformly random bids.
    Random,
}

impl CounterpartKind {
    /// Every bundled tactic.
    pub const ALL: [Self; 5] = [
        Self::Boulware,
        Self::Linear,
        Self::Conceder,
        Self::Hardliner,
        Self::Random,
    ];

    /// Lowercase name, also used as the party name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boulware => "boulware",
            Self::Linear => "linear",
            Self::Conceder => "conceder",
            Self::Hardliner => "hardliner",
            Self::Random => "random",
        }
    }

    /// Concession exponent of the time-dependent tactics.
    #[must_use]
    pub const fn exponent(self) -> Option<f64> {
        match self {
            Self::Boulware => Some(0.2),
            Self::Linear => Some(1.0),
            Self::Conceder => Some(2.0),
            Self::Hardliner => Some(0.0),
            Self::Random => None,
        }
    }

    /// Builds instance `index` of this tactic over `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Core`] if the outcome space cannot be
    /// enumerated and [`AgentError::InvalidSession`] if it is too large to rank.
    pub fn build<U: UtilitySpace + 'static>(
        self,
        profile: U,
        index: usize,
        seed: u64,
    ) -> Result<Box<dyn Party>> {
        let id = PartyId::indexed(self.name(), index);
        Ok(match self.exponent() {
            Some(e) => Box::new(TimeDependentParty::new(id, profile, e)?),
            None => Box::new(RandomParty::with_seed(id, profile, seed)?),
        })
    }
}

impl fmt::Display for CounterpartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CounterpartKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| AgentError::UnknownCounterpart { name: s.to_string() })
    }
}

/// Concedes from its best bid towards its worst along `1 − t^(1/e)`.
///
/// Accepts as soon as the received bid is at least as good as what it
/// would offer itself.
#[derive(Debug)]
pub struct TimeDependentParty<U> {
    id: PartyId,
    profile: U,
    e: f64,
    /// Every bid with its utility, ascending.
    ranked: Vec<(f64, Bid)>,
    last_received: Option<Bid>,
}

impl<U: UtilitySpace> TimeDependentParty<U> {
    /// Ranks the outcome space of `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidSession`] for a negative or non-finite
    /// exponent or an outcome space above [`MAX_RANKED_BIDS`], and
    /// [`AgentError::Core`] if a bid cannot be evaluated.
    pub fn new(id: PartyId, profile: U, e: f64) -> Result<Self> {
        if !(e.is_finite() && e >= 0.0) {
            return Err(AgentError::InvalidSession(format!(
                "concession exponent must be non-negative, got {e}"
            )));
        }
        let space = BidSpace::new(profile.domain())?;
        if space.size() > MAX_RANKED_BIDS {
            return Err(AgentError::InvalidSession(format!(
                "outcome space of {} bids is too large to rank",
                space.size()
            )));
        }

        let mut ranked = space
            .iter()
            .map(|bid| Ok((profile.utility(&bid)?, bid)))
            .collect::<Result<Vec<_>>>()?;
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(Self {
            id,
            profile,
            e,
            ranked,
            last_received: None,
        })
    }

    /// Fraction of the utility range given up at `progress`.
    fn concession(&self, progress: Progress) -> f64 {
        if self.e == 0.0 {
            return 0.0;
        }
        progress.value().powf(1.0 / self.e)
    }

    /// Own utility aimed for at `progress`.
    #[must_use]
    pub fn target(&self, progress: Progress) -> f64 {
        let (Some((min, _)), Some((max, _))) = (self.ranked.first(), self.ranked.last()) else {
            return 0.0;
        };
        (max - min).mul_add(1.0 - self.concession(progress), *min)
    }

    /// Cheapest bid that still meets the target at `progress`.
    fn offer(&self, progress: Progress) -> Option<&(f64, Bid)> {
        let target = self.target(progress);
        let index = self.ranked.partition_point(|(utility, _)| *utility < target);
        self.ranked.get(index).or_else(|| self.ranked.last())
    }
}

impl<U: UtilitySpace> Party for TimeDependentParty<U> {
    fn id(&self) -> &PartyId {
        &self.id
    }

    fn profile(&self) -> &dyn UtilitySpace {
        &self.profile
    }

    fn inform(&mut self, event: Inform) -> Result<Option<Action>> {
        match event {
            Inform::ActionDone {
                actor,
                action: Action::Offer(bid),
                ..
            } if actor != self.id => {
                self.last_received = Some(bid);
                Ok(None)
            }
            Inform::YourTurn { progress } => {
                let Some((own_utility, own)) = self.offer(progress) else {
                    return Err(AgentError::InvalidSession("empty outcome space".into()));
                };
                if let Some(received) = &self.last_received {
                    if self.profile.utility(received)? >= *own_utility {
                        return Ok(Some(Action::Accept(received.clone())));
                    }
                }
                Ok(Some(Action::Offer(own.clone())))
            }
            Inform::ActionDone { .. } | Inform::Finished { .. } => Ok(None),
        }
    }
}

/// Offers random bids and accepts anything worth at least [`RANDOM_ACCEPTANCE`].
#[derive(Debug)]
pub struct RandomParty<U> {
    id: PartyId,
    profile: U,
    space: BidSpace,
    rng: StdRng,
    last_received: Option<Bid>,
}

impl<U: UtilitySpace> RandomParty<U> {
    /// Creates a random party reproducible from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Core`] if the outcome space cannot be enumerated.
    pub fn with_seed(id: PartyId, profile: U, seed: u64) -> Result<Self> {
        let space = BidSpace::new(profile.domain())?;
        Ok(Self {
            id,
            profile,
            space,
            rng: StdRng::seed_from_u64(seed),
            last_received: None,
        })
    }
}

impl<U: UtilitySpace> Party for RandomParty<U> {
    fn id(&self) -> &PartyId {
        &self.id
    }

    fn profile(&self) -> &dyn UtilitySpace {
        &self.profile
    }

    fn inform(&mut self, event: Inform) -> Result<Option<Action>> {
        match event {
            Inform::ActionDone {
                actor,
                action: Action::Offer(bid),
                ..
            } if actor != self.id => {
                self.last_received = Some(bid);
                Ok(None)
            }
            Inform::YourTurn { .. } => {
                if let Some(received) = &self.last_received {
                    if self.profile.utility(received)? >= RANDOM_ACCEPTANCE {
                        return Ok(Some(Action::Accept(received.clone())));
                    }
                }
                Ok(Some(Action::Offer(self.space.sample(&mut self.rng))))
            }
            Inform::ActionDone { .. } | Inform::Finished { .. } => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use parley_core::{Domain, IssueId, LinearAdditiveProfile, ValueId};
    use test_case::test_case;

    use super::*;

    /// Single issue with values `v0..=v4` worth `i / 4`.
    fn profile() -> LinearAdditiveProfile {
        let values: Vec<String> = (0..=4).map(|i| format!("v{i}")).collect();
        let domain = Domain::builder().issue("deal", values).build().unwrap();
        let utilities = (0..=4)
            .map(|i| (ValueId::new(format!("v{i}")), f64::from(i) / 4.0))
            .collect();
        LinearAdditiveProfile::new(
            domain,
            BTreeMap::from([(IssueId::from("deal"), 1.0)]),
            BTreeMap::from([(IssueId::from("deal"), utilities)]),
        )
        .unwrap()
    }

    fn deal(i: u32) -> Bid {
        Bid::new().with("deal", format!("v{i}"))
    }

    fn turn(party: &mut dyn Party, progress: f64) -> Action {
        party
            .inform(Inform::YourTurn {
                progress: Progress::new(progress),
            })
            .unwrap()
            .unwrap()
    }

    fn receive(party: &mut dyn Party, bid: Bid) {
        let event = Inform::ActionDone {
            actor: PartyId::from("parley_1"),
            action: Action::Offer(bid),
            progress: Progress::new(0.5),
        };
        assert_eq!(party.inform(event).unwrap(), None);
    }

    #[test_case("boulware", CounterpartKind::Boulware)]
    #[test_case("Linear", CounterpartKind::Linear)]
    #[test_case("CONCEDER", CounterpartKind::Conceder)]
    #[test_case("hardliner", CounterpartKind::Hardliner)]
    #[test_case("random", CounterpartKind::Random)]
    fn kind_parses(name: &str, kind: CounterpartKind) {
        assert_eq!(name.parse::<CounterpartKind>().unwrap(), kind);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(matches!(
            "tit-for-tat".parse::<CounterpartKind>(),
            Err(AgentError::UnknownCounterpart { .. })
        ));
    }

    #[test]
    fn built_parties_carry_indexed_ids() {
        for kind in CounterpartKind::ALL {
            let party = kind.build(profile(), 2, 0).unwrap();
            assert_eq!(party.id().name(), kind.name());
            assert_eq!(party.id().as_str(), format!("{kind}_2"));
        }
    }

    #[test]
    fn time_dependent_opens_with_best_bid() {
        let mut party = TimeDependentParty::new(PartyId::from("linear_2"), profile(), 1.0).unwrap();
        assert_eq!(turn(&mut party, 0.0), Action::Offer(deal(4)));
    }

    #[test]
    fn linear_concedes_with_time() {
        let mut party = TimeDependentParty::new(PartyId::from("linear_2"), profile(), 1.0).unwrap();
        // target 0.5 at half time
        assert_eq!(turn(&mut party, 0.5), Action::Offer(deal(2)));
        assert_eq!(turn(&mut party, 0.9), Action::Offer(deal(1)));
    }

    #[test]
    fn boulware_holds_longer_than_conceder() {
        let boulware = TimeDependentParty::new(PartyId::from("b_1"), profile(), 0.2).unwrap();
        let conceder = TimeDependentParty::new(PartyId::from("c_1"), profile(), 2.0).unwrap();
        let half = Progress::new(0.5);
        assert!(boulware.target(half) > conceder.target(half));
    }

    #[test]
    fn hardliner_never_concedes() {
        let mut party = TimeDependentParty::new(PartyId::from("hardliner_2"), profile(), 0.0).unwrap();
        for t in [0.0, 0.5, 0.99] {
            assert_eq!(turn(&mut party, t), Action::Offer(deal(4)));
        }
    }

    #[test]
    fn time_dependent_accepts_bid_as_good_as_own() {
        let mut party = TimeDependentParty::new(PartyId::from("linear_2"), profile(), 1.0).unwrap();
        receive(&mut party, deal(2));
        assert_eq!(turn(&mut party, 0.1), Action::Offer(deal(4)));
        assert_eq!(turn(&mut party, 0.5), Action::Accept(deal(2)));
    }

    #[test]
    fn time_dependent_ignores_own_offers() {
        let mut party = TimeDependentParty::new(PartyId::from("parley_1"), profile(), 1.0).unwrap();
        receive(&mut party, deal(4));
        assert_eq!(turn(&mut party, 0.0), Action::Offer(deal(4)));
    }

    #[test]
    fn negative_exponent_is_rejected() {
        assert!(matches!(
            TimeDependentParty::new(PartyId::from("x_1"), profile(), -1.0),
            Err(AgentError::InvalidSession(_))
        ));
    }

    #[test]
    fn random_accepts_good_enough_bid() {
        let mut party = RandomParty::with_seed(PartyId::from("random_2"), profile(), 9).unwrap();
        receive(&mut party, deal(3));
        assert_eq!(turn(&mut party, 0.2), Action::Accept(deal(3)));
    }

    #[test]
    fn random_offers_valid_bids() {
        let profile = profile();
        let domain = profile.domain().clone();
        let mut party = RandomParty::with_seed(PartyId::from("random_2"), profile, 9).unwrap();
        receive(&mut party, deal(0));
        for _ in 0..20 {
            let action = turn(&mut party, 0.2);
            assert!(!action.is_accept());
            assert!(domain.validate(action.bid()).is_ok());
        }
    }
}
