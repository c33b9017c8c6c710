//! # parley-opponent
//!
//! Online model of a negotiation counterpart, built from its proposals alone.
//!
//! This crate provides:
//!
//! - [`OpponentModel`] — per-issue frequency estimates and predicted opponent utility
//! - [`IssueEstimator`] / [`ValueRecord`] — the per-issue and per-value state
//! - [`Classification`] — sticky conceding / stubborn / deadlocked / late-conceding flags
//! - [`OpponentSnapshot`] — persisted warm-start state for the next session
//!
//! ## Example
//!
//! ```rust
//! use parley_core::{Bid, Domain, Progress};
//! use parley_opponent::OpponentModel;
//!
//! let domain = Domain::builder()
//!     .issue("price", ["low", "mid", "high"])
//!     .build()
//!     .unwrap();
//!
//! let mut model = OpponentModel::new(&domain);
//! let offer = Bid::new().with("price", "high");
//! for t in [0.1, 0.2, 0.3] {
//!     model.update(&offer, Progress::new(t), None).unwrap();
//! }
//!
//! assert_eq!(model.predicted_utility(&offer), 1.0);
//! assert_eq!(model.predicted_utility(&Bid::new().with("price", "low")), 0.0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classifier;
pub mod error;
pub mod estimator;
pub mod model;
pub mod snapshot;

pub use classifier::{Classification, UtilitySeries};
pub use error::{OpponentError, Result};
pub use estimator::{IssueEstimator, ValueRecord};
pub use model::OpponentModel;
pub use snapshot::{ImportSummary, IssueSnapshot, OpponentSnapshot};
