//! # parley-core
//!
//! Negotiation primitives shared by every Parley crate.
//!
//! This crate provides:
//!
//! - [`Domain`] — the fixed set of issues and their discrete values
//! - [`Bid`] — one complete outcome, one value per issue
//! - [`BidSpace`] — ordinal enumeration and uniform sampling of all bids
//! - [`Progress`] — normalized negotiation time in `[0, 1]`
//! - [`UtilitySpace`] — the self-utility evaluator seam, with
//!   [`LinearAdditiveProfile`] as the bundled implementation
//!
//! ## Example
//!
//! ```rust
//! use parley_core::{BidSpace, Domain};
//!
//! let domain = Domain::builder()
//!     .issue("price", ["low", "mid", "high"])
//!     .issue("delivery", ["fast", "slow"])
//!     .build()
//!     .unwrap();
//!
//! let space = BidSpace::new(&domain).unwrap();
//! assert_eq!(space.size(), 6);
//!
//! let bid = space.get(0).unwrap();
//! assert!(domain.validate(&bid).is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bidspace;
pub mod domain;
pub mod error;
pub mod profile;
pub mod types;

pub use bidspace::BidSpace;
pub use domain::{Domain, DomainBuilder};
pub use error::{CoreError, Result};
pub use profile::{LinearAdditiveProfile, UtilitySpace};
pub use types::{Bid, IssueId, Progress, ValueId};
