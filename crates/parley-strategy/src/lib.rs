//! # parley-strategy
//!
//! Decides, turn by turn, whether to accept the opponent's proposal or what
//! to offer instead.
//!
//! This crate provides:
//!
//! - [`BiddingStrategy`] — acceptance test, counter-offer search and scoring
//! - [`target_utility`] — the time-dependent concession curve
//! - [`Action`] — the per-turn decision
//! - [`StrategyConfig`] — every tunable constant, loadable from JSON
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use parley_core::{Bid, Domain, LinearAdditiveProfile, Progress};
//! use parley_strategy::{BiddingStrategy, StrategyConfig};
//!
//! let domain = Domain::builder()
//!     .issue("price", ["low", "high"])
//!     .build()
//!     .unwrap();
//! let profile = LinearAdditiveProfile::new(
//!     domain,
//!     BTreeMap::from([("price".into(), 1.0)]),
//!     BTreeMap::from([(
//!         "price".into(),
//!         BTreeMap::from([("low".into(), 0.0), ("high".into(), 1.0)]),
//!     )]),
//! )
//! .unwrap();
//!
//! let mut strategy = BiddingStrategy::with_seed(profile, StrategyConfig::default(), 7).unwrap();
//! let offer = strategy.propose(Progress::START, None).unwrap();
//! assert_eq!(offer, Bid::new().with("price", "high"));
//!
//! let low = Bid::new().with("price", "low");
//! assert!(!strategy.accept(Some(&low), Progress::new(0.5), None).unwrap());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod strategy;

pub use config::{AcceptanceConfig, ProposalConfig, ScoringConfig, StrategyConfig};
pub use error::{Result, StrategyError};
pub use strategy::{Action, BiddingStrategy, target_utility};
