//! The adaptive negotiating party.
//!
//! Wires an [`OpponentModel`] and a [`BiddingStrategy`] to the session
//! protocol: every opponent offer updates the model, every turn asks the
//! strategy for a decision, and the learned model outlives the session
//! through an [`OpponentStore`].

use parley_core::{Bid, Progress, UtilitySpace};
use parley_opponent::OpponentModel;
use parley_strategy::{Action, BiddingStrategy};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::party::{Inform, Party, PartyId};
use crate::store::OpponentStore;

/// The opponent currently being modelled.
#[derive(Debug)]
struct Opponent {
    name: String,
    model: OpponentModel,
}

/// Party that learns its opponent and bids with a [`BiddingStrategy`].
#[derive(Debug)]
pub struct Negotiator<U> {
    id: PartyId,
    strategy: BiddingStrategy<U>,
    store: Option<OpponentStore>,
    opponent: Option<Opponent>,
    last_received: Option<Bid>,
}

impl<U: UtilitySpace> Negotiator<U> {
    /// Creates a negotiator that forgets its opponents after each session.
    #[must_use]
    pub fn new(id: PartyId, strategy: BiddingStrategy<U>) -> Self {
        Self {
            id,
            strategy,
            store: None,
            opponent: None,
            last_received: None,
        }
    }

    /// Warm-starts from, and persists to, `store`.
    #[must_use]
    pub fn with_store(mut self, store: OpponentStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Model of the current opponent, once it has made an offer.
    #[must_use]
    pub fn opponent_model(&self) -> Option<&OpponentModel> {
        self.opponent.as_ref().map(|opponent| &opponent.model)
    }

    /// Session-independent name of the current opponent.
    #[must_use]
    pub fn opponent_name(&self) -> Option<&str> {
        self.opponent.as_ref().map(|opponent| opponent.name.as_str())
    }

    /// The latest bid received from the opponent.
    #[must_use]
    pub const fn last_received(&self) -> Option<&Bid> {
        self.last_received.as_ref()
    }

    /// The underlying strategy.
    #[must_use]
    pub const fn strategy(&self) -> &BiddingStrategy<U> {
        &self.strategy
    }

    fn on_action(&mut self, actor: &PartyId, action: &Action, progress: Progress) -> Result<()> {
        if *actor == self.id {
            return Ok(());
        }
        let Action::Offer(bid) = action else {
            debug!(party = %self.id, %actor, "opponent accepted");
            return Ok(());
        };

        if self.opponent.is_none() {
            self.opponent = Some(self.meet(actor));
        }
        if let Some(opponent) = self.opponent.as_mut() {
            opponent
                .model
                .update(bid, progress, Some(self.strategy.profile()))?;
        }
        self.last_received = Some(bid.clone());
        Ok(())
    }

    fn meet(&self, actor: &PartyId) -> Opponent {
        let name = actor.name().to_string();
        let mut model = OpponentModel::new(self.strategy.profile().domain());

        if let Some(snapshot) = self.store.as_ref().and_then(|store| store.load(&name)) {
            let summary = model.import(&snapshot);
            info!(
                party = %self.id,
                opponent = %name,
                issues = summary.issues,
                values = summary.values,
                skipped = summary.skipped,
                "warm-started opponent model"
            );
        } else {
            debug!(party = %self.id, opponent = %name, "modelling new opponent");
        }
        Opponent { name, model }
    }

    fn on_turn(&mut self, progress: Progress) -> Result<Action> {
        let opponent = self.opponent.as_ref().map(|opponent| &opponent.model);
        Ok(self
            .strategy
            .decide(self.last_received.as_ref(), progress, opponent)?)
    }

    fn on_finished(&self, agreement: Option<&Bid>) {
        info!(party = %self.id, agreed = agreement.is_some(), "session finished");
        let (Some(store), Some(opponent)) = (&self.store, &self.opponent) else {
            return;
        };
        if let Err(e) = store.save(&opponent.name, &opponent.model.export()) {
            warn!(party = %self.id, opponent = %opponent.name, error = %e, "failed to persist opponent model");
        }
    }
}

impl<U: UtilitySpace> Party for Negotiator<U> {
    fn id(&self) -> &PartyId {
        &self.id
    }

    fn profile(&self) -> &dyn UtilitySpace {
        self.strategy.profile()
    }

    fn inform(&mut self, event: Inform) -> Result<Option<Action>> {
        match event {
            Inform::ActionDone {
                actor,
                action,
                progress,
            } => {
                self.on_action(&actor, &action, progress)?;
                Ok(None)
            }
            Inform::YourTurn { progress } => self.on_turn(progress).map(Some),
            Inform::Finished { agreement } => {
                self.on_finished(agreement.as_ref());
                Ok(None)
            }
        }
    }
}
