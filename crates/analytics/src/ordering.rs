// In crates/analytics/src/ordering.rs

//! The two orderings used across the engine. They are kept separate on
//! purpose: chronological walks and "most recent first" listings never share
//! a comparator.

use core_types::Trade;
use std::cmp::Ordering;

use crate::types::PeriodSummary;

/// Oldest exit first. Used with a stable sort, so equal exit times keep
/// their input order.
pub fn by_exit_time_asc(a: &&Trade, b: &&Trade) -> Ordering {
    a.exit_time.cmp(&b.exit_time)
}

/// Most recent period first.
pub fn by_period_start_desc(a: &PeriodSummary, b: &PeriodSummary) -> Ordering {
    b.start.cmp(&a.start)
}

/// Borrows `trades` in chronological exit order without touching the input.
pub fn chronological(trades: &[Trade]) -> Vec<&Trade> {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by(by_exit_time_asc);
    ordered
}
