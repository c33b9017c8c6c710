//! Local alternating-offers session runner.
//!
//! Two parties take turns; each turn the active party either accepts the
//! other's latest offer, ending the session with an agreement, or makes an
//! offer of its own. Every action is broadcast to both parties. The session
//! ends without agreement after the configured number of rounds.

use parley_core::{Bid, Progress};
use parley_strategy::Action;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AgentError, Result};
use crate::party::{Inform, Party, PartyId};

/// Outcome of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique session ID.
    pub session_id: Uuid,
    /// Party that moved first.
    pub first: PartyId,
    /// Party that moved second.
    pub second: PartyId,
    /// Agreed bid, if any.
    pub agreement: Option<Bid>,
    /// Party that accepted the agreement.
    pub accepted_by: Option<PartyId>,
    /// Agreement utility for the first party, 0 without agreement.
    pub first_utility: f64,
    /// Agreement utility for the second party, 0 without agreement.
    pub second_utility: f64,
    /// Rounds played.
    pub rounds: u32,
    /// Round limit.
    pub max_rounds: u32,
}

impl SessionReport {
    /// Whether the session ended in an agreement.
    #[must_use]
    pub const fn is_agreement(&self) -> bool {
        self.agreement.is_some()
    }

    /// Sum of both parties' utilities.
    #[must_use]
    pub fn social_welfare(&self) -> f64 {
        self.first_utility + self.second_utility
    }
}

/// Runs one session of at most `max_rounds` rounds, `first` moving first.
///
/// Progress at round `r` is `r / max_rounds`. Both parties receive
/// [`Inform::Finished`] however the session ends, unless a party fails.
///
/// # Errors
///
/// Returns [`AgentError::InvalidSession`] for a zero round limit, duplicate
/// party IDs or mismatched domains, [`AgentError::Protocol`] when a party
/// skips its turn, offers an incomplete bid or accepts a bid that was not
/// offered to it, and any error a party raises.
pub fn run_session(
    first: &mut dyn Party,
    second: &mut dyn Party,
    max_rounds: u32,
) -> Result<SessionReport> {
    if max_rounds == 0 {
        return Err(AgentError::InvalidSession("round limit must be at least 1".into()));
    }
    if first.id() == second.id() {
        return Err(AgentError::InvalidSession(format!(
            "both parties are called {}",
            first.id()
        )));
    }
    if first.profile().domain() != second.profile().domain() {
        return Err(AgentError::InvalidSession(
            "parties negotiate over different domains".into(),
        ));
    }

    let session_id = Uuid::new_v4();
    let domain = first.profile().domain().clone();
    let mut parties: [&mut dyn Party; 2] = [first, second];
    let ids = [parties[0].id().clone(), parties[1].id().clone()];
    info!(session = %session_id, first = %ids[0], second = %ids[1], max_rounds, "session started");

    let mut last_offers: [Option<Bid>; 2] = [None, None];
    let mut agreement = None;
    let mut accepted_by = None;
    let mut rounds = max_rounds;

    'rounds: for round in 0..max_rounds {
        let progress = Progress::of_rounds(round, max_rounds);
        for turn in 0..2 {
            let actor = &ids[turn];
            let action = parties[turn]
                .inform(Inform::YourTurn { progress })?
                .ok_or_else(|| AgentError::protocol(actor, "did not act on its turn"))?;

            match &action {
                Action::Accept(bid) => {
                    if last_offers[1 - turn].as_ref() != Some(bid) {
                        return Err(AgentError::protocol(
                            actor,
                            "accepted a bid that was never offered to it",
                        ));
                    }
                }
                Action::Offer(bid) => {
                    domain
                        .validate(bid)
                        .map_err(|e| AgentError::protocol(actor, format!("offered {bid}: {e}")))?;
                    last_offers[turn] = Some(bid.clone());
                }
            }
            debug!(session = %session_id, round, %actor, accept = action.is_accept(), bid = %action.bid(), "action");

            for party in &mut parties {
                party.inform(Inform::ActionDone {
                    actor: actor.clone(),
                    action: action.clone(),
                    progress,
                })?;
            }

            if let Action::Accept(bid) = action {
                agreement = Some(bid);
                accepted_by = Some(actor.clone());
                rounds = round + 1;
                break 'rounds;
            }
        }
    }

    for party in &mut parties {
        party.inform(Inform::Finished {
            agreement: agreement.clone(),
        })?;
    }

    let [first_utility, second_utility] = match &agreement {
        Some(bid) => [parties[0].profile().utility(bid)?, parties[1].profile().utility(bid)?],
        None => [0.0, 0.0],
    };
    let [first, second] = ids;
    info!(
        session = %session_id,
        agreed = agreement.is_some(),
        rounds,
        first_utility,
        second_utility,
        "session finished"
    );

    Ok(SessionReport {
        session_id,
        first,
        second,
        agreement,
        accepted_by,
        first_utility,
        second_utility,
        rounds,
        max_rounds,
    })
}
