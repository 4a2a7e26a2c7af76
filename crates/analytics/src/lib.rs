// In crates/analytics/src/lib.rs

//! Performance analytics over closed journal trades.
//!
//! Every entry point is a pure function of the trades it is handed: no
//! clock reads, no I/O, no caching between calls.

pub mod breakdown;
pub mod engine;
pub mod equity;
pub mod heatmap;
pub mod mistake_stats;
pub mod mistakes;
pub mod ordering;
pub mod range;
pub mod temporal;
pub mod types;

// Re-export the most important types for easy access.
pub use breakdown::Period;
pub use engine::AnalyticsEngine;
pub use equity::{build_equity_curve, daily_equity_curve};
pub use heatmap::{HeatmapCell, HeatmapPalette, HeatmapScale};
pub use mistake_stats::analyze_mistakes;
pub use mistakes::{MistakeCategory, categorize};
pub use range::DateRange;
pub use types::*;

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use core_types::{Side, Symbol, Trade};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// A trade that closed at `exit_time` after one hour with the given P&L.
    pub fn trade_at(id: &str, side: Side, pnl: Decimal, exit_time: DateTime<Utc>) -> Trade {
        let entry_price = dec!(1000);
        Trade {
            id: id.to_string(),
            symbol: Symbol::from("TEST"),
            side,
            entry_price,
            exit_price: entry_price + pnl * side.sign(),
            quantity: dec!(1),
            entry_time: exit_time - Duration::hours(1),
            exit_time,
            pnl,
            pnl_percent: pnl / entry_price * dec!(100),
            strategy: None,
            notes: None,
            psychology: None,
            what_worked: None,
            what_failed: None,
            rule_violation: None,
            confidence: None,
        }
    }

    /// Long trades "t0", "t1", ... closing one day apart in the given order.
    pub fn sequence(pnls: &[Decimal]) -> Vec<Trade> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap();
        pnls.iter()
            .enumerate()
            .map(|(i, pnl)| trade_at(&format!("t{i}"), Side::Long, *pnl, start + Duration::days(i as i64)))
            .collect()
    }
}
