//! The protocol surface every negotiation party implements.

use std::fmt;

use parley_core::{Bid, Progress, UtilitySpace};
use parley_strategy::Action;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identifier of a party within one session, e.g. `boulware_2`.
///
/// The part before the last `_` names the party across sessions; the
/// suffix only distinguishes instances.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    /// Creates a new party ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates the ID of instance `index` of the party called `name`.
    #[must_use]
    pub fn indexed(name: &str, index: usize) -> Self {
        Self(format!("{name}_{index}"))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Session-independent name: everything before the last `_`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit_once('_').map_or(&self.0, |(name, _)| name)
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Event delivered to a party by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inform {
    /// Some party, possibly the receiver itself, acted.
    ActionDone {
        /// Who acted.
        actor: PartyId,
        /// What they did.
        action: Action,
        /// Progress at the time of the action.
        progress: Progress,
    },
    /// The receiver must act now.
    YourTurn {
        /// Progress at the start of the turn.
        progress: Progress,
    },
    /// The session is over.
    Finished {
        /// The agreed bid, if any.
        agreement: Option<Bid>,
    },
}

/// A participant in an alternating-offers session.
pub trait Party {
    /// This party's ID in the current session.
    fn id(&self) -> &PartyId;

    /// This party's own preferences.
    fn profile(&self) -> &dyn UtilitySpace;

    /// Handles one event.
    ///
    /// Must return an action for [`Inform::YourTurn`] and `None` otherwise.
    ///
    /// # Errors
    ///
    /// Implementation-specific; a failing party ends the session.
    fn inform(&mut self, event: Inform) -> Result<Option<Action>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("boulware_2", "boulware" ; "simple")]
    #[test_case("my_agent_17", "my_agent" ; "underscore in name")]
    #[test_case("solo", "solo" ; "no suffix")]
    #[test_case("trailing_", "trailing" ; "empty suffix")]
    fn name_strips_instance_suffix(id: &str, name: &str) {
        assert_eq!(PartyId::from(id).name(), name);
    }

    #[test]
    fn indexed_round_trips_through_name() {
        let id = PartyId::indexed("conceder", 3);
        assert_eq!(id.as_str(), "conceder_3");
        assert_eq!(id.name(), "conceder");
    }

    #[test]
    fn inform_json_shape() {
        let event = Inform::YourTurn {
            progress: Progress::new(0.5),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"your_turn","progress":0.5}"#);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn indexed_name_survives_underscores(name in "[a-z_]{0,12}", index in any::<usize>()) {
                let id = PartyId::indexed(&name, index);
                prop_assert_eq!(id.name(), name.as_str());
            }
        }
    }
}
