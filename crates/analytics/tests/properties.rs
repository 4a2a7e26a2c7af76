//! Property tests for the analytics crate.
//!
//! Uses proptest to verify, over arbitrary trade sets:
//! 1. Outcome partition is exhaustive
//! 2. Ratio sentinels (profit factor / R:R)
//! 3. Equity curve agrees with the snapshot
//! 4. Fixed-size and count-preserving breakdowns
//! 5. Heat-map intensity stays inside [0.2, 1.0]

use analytics::breakdown::{by_hour, by_period, by_weekday};
use analytics::{AnalyticsEngine, HeatmapScale, Period, analyze_mistakes, build_equity_curve};
use chrono::{Duration, TimeZone, Utc};
use core_types::{NewTrade, Side, Symbol, Trade};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = Decimal> {
    (1i64..50_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_note() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("exited too early".to_string())),
        Just(Some("entered too early".to_string())),
        Just(Some("revenge".to_string())),
        Just(Some("something else entirely".to_string())),
    ]
}

fn arb_trade(index: usize) -> impl Strategy<Value = Trade> {
    (
        any::<bool>(),
        arb_price(),
        proptest::option::weighted(0.9, arb_price()),
        1i64..1_000,
        0i64..(60 * 24 * 400),
        0i64..(60 * 24 * 3),
        arb_note(),
    )
        .prop_map(move |(long, entry, exit, qty, exit_offset_min, hold_min, note)| {
            // A missing exit price is a break-even trade.
            let exit = exit.unwrap_or(entry);
            let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
            let exit_time = base + Duration::minutes(exit_offset_min);
            Trade::open(NewTrade {
                id: format!("t{index}"),
                symbol: Symbol::from("PROP"),
                side: if long { Side::Long } else { Side::Short },
                entry_price: entry,
                exit_price: exit,
                quantity: Decimal::from(qty),
                entry_time: exit_time - Duration::minutes(hold_min),
                exit_time,
                strategy: None,
                notes: None,
                psychology: None,
                what_worked: None,
                what_failed: None,
                rule_violation: note,
                confidence: None,
            })
            .expect("generated trades are valid")
        })
}

fn arb_trades() -> impl Strategy<Value = Vec<Trade>> {
    (0usize..40).prop_flat_map(|n| (0..n).map(arb_trade).collect::<Vec<_>>())
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn outcome_partition_is_exhaustive(trades in arb_trades()) {
        let report = AnalyticsEngine::new().calculate(&trades);
        prop_assert_eq!(
            report.winning_trades + report.losing_trades + report.break_even_trades,
            report.total_trades
        );
        prop_assert_eq!(report.total_trades as usize, trades.len());
        prop_assert!(report.avg_loss >= Decimal::ZERO);
        prop_assert!(report.max_consecutive_wins <= report.winning_trades);
        prop_assert!(report.max_consecutive_losses <= report.losing_trades);
    }

    #[test]
    fn ratio_sentinels_hold(trades in arb_trades()) {
        let report = AnalyticsEngine::new().calculate(&trades);
        let infinite = report.profit_factor == f64::INFINITY;
        prop_assert_eq!(infinite, report.avg_loss.is_zero() && report.avg_win > Decimal::ZERO);
        prop_assert_eq!(report.profit_factor == 0.0, report.avg_win.is_zero());
        prop_assert!(!report.profit_factor.is_nan());
        prop_assert!(!report.required_win_rate.is_nan());
        prop_assert!(report.required_win_rate >= 0.0 && report.required_win_rate < 100.0);
    }

    #[test]
    fn equity_curve_matches_snapshot(trades in arb_trades()) {
        let report = AnalyticsEngine::new().calculate(&trades);
        let curve = build_equity_curve(&trades);
        prop_assert_eq!(curve.points.len(), trades.len());
        prop_assert_eq!(curve.current_balance, report.total_pnl);
        prop_assert!(curve.peak_value >= Decimal::ZERO);
        prop_assert!(curve.max_drawdown >= Decimal::ZERO);
        for pair in curve.points.windows(2) {
            prop_assert!(pair[0].date <= pair[1].date);
        }
        for point in &curve.points {
            prop_assert!(point.drawdown <= curve.max_drawdown);
        }
    }

    #[test]
    fn breakdowns_preserve_counts(trades in arb_trades()) {
        let weekdays = by_weekday(&trades, &Utc);
        prop_assert_eq!(weekdays.len(), 7);
        prop_assert_eq!(weekdays.iter().map(|w| w.stats.count as usize).sum::<usize>(), trades.len());

        let hours = by_hour(&trades, &Utc);
        prop_assert!(hours.windows(2).all(|w| w[0].hour < w[1].hour));
        prop_assert_eq!(hours.iter().map(|h| h.stats.count as usize).sum::<usize>(), trades.len());

        for period in [Period::Day, Period::Week, Period::Month] {
            let periods = by_period(&trades, &Utc, period);
            prop_assert!(periods.windows(2).all(|w| w[0].start > w[1].start));
            prop_assert_eq!(periods.iter().map(|p| p.stats.count as usize).sum::<usize>(), trades.len());
        }
    }

    #[test]
    fn mistake_partition_is_exhaustive(trades in arb_trades()) {
        let report = analyze_mistakes(&trades);
        prop_assert_eq!(
            (report.trades_with_mistakes + report.trades_without_mistakes) as usize,
            trades.len()
        );
        let counted: u32 = report.by_frequency.iter().map(|s| s.count).sum();
        prop_assert_eq!(counted, report.trades_with_mistakes);
        prop_assert!(report.by_frequency.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn heatmap_intensity_is_bounded(trades in arb_trades()) {
        let days = by_period(&trades, &Utc, Period::Day);
        let scale = HeatmapScale::from_pnls(days.iter().map(|d| d.stats.total_pnl));
        for day in &days {
            match scale.intensity(day.stats.total_pnl) {
                Some(intensity) => prop_assert!((0.2 - 1e-12..=1.0 + 1e-12).contains(&intensity)),
                None => prop_assert!(day.stats.total_pnl.is_zero()),
            }
        }
    }
}
