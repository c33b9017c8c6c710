//! # parley-agent
//!
//! Negotiation parties and the machinery to run them.
//!
//! This crate provides:
//!
//! - [`Negotiator`] — the adaptive party: opponent modelling plus bidding strategy
//! - [`OpponentStore`] — per-opponent JSON persistence for warm starts
//! - [`CounterpartKind`] — reference tactics (boulware, linear, conceder, hardliner, random)
//! - [`run_session`] — a local alternating-offers session producing a [`SessionReport`]
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use parley_agent::{CounterpartKind, Negotiator, PartyId, run_session};
//! use parley_core::{Domain, LinearAdditiveProfile};
//! use parley_strategy::{BiddingStrategy, StrategyConfig};
//!
//! let domain = Domain::builder()
//!     .issue("price", ["low", "mid", "high"])
//!     .build()
//!     .unwrap();
//! let profile = |low: f64, high: f64| {
//!     LinearAdditiveProfile::new(
//!         domain.clone(),
//!         BTreeMap::from([("price".into(), 1.0)]),
//!         BTreeMap::from([(
//!             "price".into(),
//!             BTreeMap::from([("low".into(), low), ("mid".into(), 0.5), ("high".into(), high)]),
//!         )]),
//!     )
//!     .unwrap()
//! };
//!
//! let strategy = BiddingStrategy::with_seed(profile(0.0, 1.0), StrategyConfig::default(), 7).unwrap();
//! let mut seller = Negotiator::new(PartyId::from("parley_1"), strategy);
//! let mut buyer = CounterpartKind::Conceder.build(profile(1.0, 0.0), 2, 7).unwrap();
//!
//! let report = run_session(&mut seller, buyer.as_mut(), 20).unwrap();
//! assert!(report.rounds <= 20);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod counterpart;
pub mod error;
pub mod negotiator;
pub mod party;
pub mod session;
pub mod store;

pub use counterpart::{CounterpartKind, RandomParty, TimeDependentParty};
pub use error::{AgentError, Result};
pub use negotiator::Negotiator;
pub use party::{Inform, Party, PartyId};
pub use session::{SessionReport, run_session};
pub use store::OpponentStore;
