//! Enumeration and uniform sampling of every complete bid in a domain.
//!
//! Bids are numbered in mixed radix: the last issue (in domain order)
//! varies fastest. Sampling draws a uniform ordinal and decodes it, so each
//! complete bid is equally likely.

use rand::Rng;

use crate::domain::Domain;
use crate::error::{CoreError, Result};
use crate::types::{Bid, IssueId, ValueId};

/// All complete bids of a [`Domain`], addressable by ordinal.
#[derive(Debug, Clone)]
pub struct BidSpace {
    issues: Vec<(IssueId, Vec<ValueId>)>,
    size: u128,
}

impl BidSpace {
    /// Builds the bid space of `domain`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BidSpaceTooLarge`] if the number of bids
    /// overflows `u128`. A validated [`Domain`] never yields an empty space.
    pub fn new(domain: &Domain) -> Result<Self> {
        let issues: Vec<(IssueId, Vec<ValueId>)> = domain
            .iter()
            .map(|(issue, values)| (issue.clone(), values.to_vec()))
            .collect();

        let size = issues.iter().try_fold(1u128, |acc, (_, values)| {
            acc.checked_mul(values.len() as u128)
                .ok_or(CoreError::BidSpaceTooLarge)
        })?;

        Ok(Self { issues, size })
    }

    /// Total number of complete bids.
    #[must_use]
    pub const fn size(&self) -> u128 {
        self.size
    }

    /// Returns the bid with the given ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OrdinalOutOfRange`] if `ordinal >= size()`.
    pub fn get(&self, ordinal: u128) -> Result<Bid> {
        if ordinal >= self.size {
            return Err(CoreError::OrdinalOutOfRange {
                ordinal,
                size: self.size,
            });
        }
        Ok(self.decode(ordinal))
    }

    /// Draws one complete bid uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Bid {
        let ordinal = rng.gen_range(0..self.size);
        self.decode(ordinal)
    }

    /// Iterates over every bid in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = Bid> + '_ {
        (0..self.size).map(|ordinal| self.decode(ordinal))
    }

    fn decode(&self, mut ordinal: u128) -> Bid {
        let mut bid = Bid::new();
        for (issue, values) in self.issues.iter().rev() {
            let radix = values.len() as u128;
            let index = (ordinal % radix) as usize;
            ordinal /= radix;
            bid.set(issue.clone(), values[index].clone());
        }
        bid
    }
}
