//! Property tests for the window rule, checked against a brute-force rescan.

mod common;

use cancelcheck::domain::ledger::CompanyLedger;
use cancelcheck::domain::report::{flagged_companies, well_behaved_count, Report};
use cancelcheck::domain::trade::{OrderType, Trade};
use cancelcheck::domain::window::{evaluate, Ratio, WindowPolicy};
use common::*;
use proptest::prelude::*;

/// Recomputes every window from scratch at the end of each timestamp group.
fn reference_is_excessive(trades: &[Trade], policy: &WindowPolicy) -> bool {
    let mut sorted = trades.to_vec();
    sorted.sort_by_key(|t| t.timestamp);

    (0..sorted.len())
        .filter(|&i| i + 1 == sorted.len() || sorted[i + 1].timestamp != sorted[i].timestamp)
        .any(|i| {
            let now = sorted[i].timestamp;
            let window = sorted[..=i].iter().filter(|t| {
                (now - t.timestamp).num_milliseconds() as f64 / 1000.0 <= policy.window_seconds
            });
            let (mut orders, mut cancels) = (0u128, 0u128);
            for t in window {
                orders += u128::from(t.quantity);
                if t.order_type == OrderType::Cancel {
                    cancels += u128::from(t.quantity);
                }
            }
            let r = policy.max_cancel_ratio;
            (orders == 0 && cancels > 0)
                || (orders > 0
                    && cancels * u128::from(r.denominator) > orders * u128::from(r.numerator))
        })
}

fn arb_trade() -> impl Strategy<Value = Trade> {
    (0i64..300, any::<bool>(), 1u64..1000).prop_map(|(secs, cancel, qty)| {
        let order_type = if cancel {
            OrderType::Cancel
        } else {
            OrderType::New
        };
        trade_at(secs, order_type, qty)
    })
}

fn arb_policy() -> impl Strategy<Value = WindowPolicy> {
    (1u32..120, 0u64..4, 1u64..6).prop_map(|(secs, num, den)| WindowPolicy {
        window_seconds: f64::from(secs),
        max_cancel_ratio: Ratio::new(num, den).unwrap(),
    })
}

proptest! {
    #[test]
    fn matches_brute_force_rescan(trades in prop::collection::vec(arb_trade(), 0..40)) {
        let policy = WindowPolicy::default();
        prop_assert_eq!(
            evaluate(&trades, &policy).is_excessive(),
            reference_is_excessive(&trades, &policy)
        );
    }

    #[test]
    fn matches_brute_force_under_any_policy(
        trades in prop::collection::vec(arb_trade(), 0..30),
        policy in arb_policy(),
    ) {
        prop_assert_eq!(
            evaluate(&trades, &policy).is_excessive(),
            reference_is_excessive(&trades, &policy)
        );
    }

    #[test]
    fn verdict_ignores_input_order(
        trades in prop::collection::vec(arb_trade(), 0..30),
        seed in any::<u64>(),
    ) {
        let mut shuffled = trades.clone();
        // Deterministic rotation plus reversal stands in for a shuffle.
        if !shuffled.is_empty() {
            let k = (seed as usize) % shuffled.len();
            shuffled.rotate_left(k);
            if seed % 2 == 0 {
                shuffled.reverse();
            }
        }
        let policy = WindowPolicy::default();
        prop_assert_eq!(evaluate(&trades, &policy), evaluate(&shuffled, &policy));
    }

    #[test]
    fn cancel_only_windows_always_flag(
        qtys in prop::collection::vec(1u64..1000, 1..10),
    ) {
        let trades: Vec<Trade> = qtys
            .iter()
            .enumerate()
            .map(|(i, q)| trade_at(i as i64, OrderType::Cancel, *q))
            .collect();
        prop_assert!(evaluate(&trades, &WindowPolicy::default()).is_excessive());
    }

    #[test]
    fn new_orders_alone_never_flag(
        trades in prop::collection::vec((0i64..600, 1u64..1000), 0..30),
    ) {
        let trades: Vec<Trade> = trades
            .into_iter()
            .map(|(s, q)| trade_at(s, OrderType::New, q))
            .collect();
        prop_assert!(!evaluate(&trades, &WindowPolicy::default()).is_excessive());
    }

    #[test]
    fn report_preserves_first_seen_order(
        entries in prop::collection::vec((0usize..6, arb_trade()), 0..60),
    ) {
        let names = ["Ape", "Bank", "Cauldron", "Dune", "Echo", "Fjord"];
        let mut ledger = CompanyLedger::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for (idx, trade) in entries {
            let name = names[idx];
            if !first_seen.contains(&name) {
                first_seen.push(name);
            }
            ledger.record(name, trade);
        }

        let policy = WindowPolicy::default();
        let flagged = flagged_companies(&ledger, &policy);
        let expected: Vec<&str> = first_seen
            .iter()
            .copied()
            .filter(|c| evaluate(ledger.trades_for(c).unwrap(), &policy).is_excessive())
            .collect();
        prop_assert_eq!(&flagged, &expected);
        prop_assert_eq!(flagged.len() + well_behaved_count(&ledger, &policy), ledger.len());

        let report = Report::build(&ledger, &policy);
        prop_assert_eq!(report.flagged(), expected);
    }
}
