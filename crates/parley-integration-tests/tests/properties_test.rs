//! Cross-crate properties that hold for any seed.

mod common;

use parley_agent::{CounterpartKind, run_session};
use parley_core::{BidSpace, UtilitySpace};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn random_counterpart_never_breaks_a_session(seed in any::<u64>(), rounds in 1u32..60) {
        let mut ours = common::negotiator(seed, None);
        let mut theirs = CounterpartKind::Random
            .build(common::profile(false), 2, seed.wrapping_add(1))
            .unwrap();

        let report = run_session(&mut ours, theirs.as_mut(), rounds).unwrap();
        prop_assert!(report.rounds <= rounds);
        prop_assert!(report.social_welfare() <= 2.0 + 1e-9);
    }

    #[test]
    fn predictions_stay_in_unit_interval(seed in any::<u64>(), kind_index in 0usize..5) {
        let kind = CounterpartKind::ALL[kind_index];
        let mut ours = common::negotiator(seed, None);
        let mut theirs = kind.build(common::profile(false), 2, seed).unwrap();
        run_session(&mut ours, theirs.as_mut(), 30).unwrap();

        let model = ours.opponent_model().unwrap();
        let space = BidSpace::new(&common::domain()).unwrap();
        for bid in space.iter() {
            let predicted = model.predicted_utility(&bid);
            prop_assert!((0.0..=1.0 + 1e-9).contains(&predicted), "{bid}: {predicted}");
        }
    }

    #[test]
    fn accepted_deals_clear_the_reservation(seed in any::<u64>()) {
        let mut ours = common::negotiator(seed, None);
        let mut theirs = CounterpartKind::Random
            .build(common::profile(false), 2, seed)
            .unwrap();
        let report = run_session(&mut ours, theirs.as_mut(), 50).unwrap();

        if report.accepted_by.as_ref().is_some_and(|id| id.as_str() == "parley_1") {
            let agreement = report.agreement.as_ref().unwrap();
            let utility = common::profile(true).utility(agreement).unwrap();
            // The reservation threshold bottoms out at 0.2 on the deadline.
            prop_assert!(utility >= 0.2 - 1e-9, "{agreement}: {utility}");
        }
    }
}
