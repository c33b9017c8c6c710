//! Shared fixtures: a fully opposed three-issue domain.

#![allow(dead_code)]

use std::collections::BTreeMap;

use parley_agent::{Negotiator, OpponentStore, PartyId};
use parley_core::{Domain, IssueId, LinearAdditiveProfile, ValueId};
use parley_strategy::{BiddingStrategy, StrategyConfig};

pub const ISSUES: [(&str, f64); 3] = [("price", 0.5), ("delivery", 0.3), ("warranty", 0.2)];
pub const LEVELS: [&str; 4] = ["l0", "l1", "l2", "l3"];

pub fn domain() -> Domain {
    let mut builder = Domain::builder();
    for (issue, _) in ISSUES {
        builder = builder.issue(issue, LEVELS);
    }
    builder.build().unwrap()
}

/// Seller likes high levels, buyer likes low ones.
pub fn profile(seller: bool) -> LinearAdditiveProfile {
    let weights = ISSUES
        .iter()
        .map(|(issue, weight)| (IssueId::from(*issue), *weight))
        .collect();
    let utilities = ISSUES
        .iter()
        .map(|(issue, _)| {
            let values = LEVELS
                .iter()
                .enumerate()
                .map(|(i, level)| {
                    let up = i as f64 / 3.0;
                    (ValueId::from(*level), if seller { up } else { 1.0 - up })
                })
                .collect::<BTreeMap<_, _>>();
            (IssueId::from(*issue), values)
        })
        .collect();
    LinearAdditiveProfile::new(domain(), weights, utilities).unwrap()
}

pub fn negotiator(seed: u64, store: Option<&OpponentStore>) -> Negotiator<LinearAdditiveProfile> {
    let strategy = BiddingStrategy::with_seed(profile(true), StrategyConfig::default(), seed).unwrap();
    let negotiator = Negotiator::new(PartyId::indexed("parley", 1), strategy);
    match store {
        Some(store) => negotiator.with_store(store.clone()),
        None => negotiator,
    }
}
