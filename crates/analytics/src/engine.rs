// In crates/analytics/src/engine.rs

use crate::ordering::chronological;
use crate::types::{AnalyticsSnapshot, SideStats, TradeExtreme};
use core_types::{Side, Trade};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use tracing::debug;

/// Percentage of `wins` over `total`, 0 when there is nothing to count.
pub fn win_rate(wins: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (wins as f64 / total as f64) * 100.0
}

/// `numerator / denominator`, with +∞ for a positive numerator over a zero
/// denominator and 0 when both are zero. Used for profit factor and R:R.
pub fn payoff_ratio(avg_win: Decimal, avg_loss: Decimal) -> f64 {
    if avg_loss > dec!(0) {
        (avg_win / avg_loss).to_f64().unwrap_or(0.0)
    } else if avg_win > dec!(0) {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Break-even win rate for a given R:R. Infinite or zero R:R yields the 0
/// sentinel.
pub fn required_win_rate(realized_rr: f64) -> f64 {
    if realized_rr.is_finite() && realized_rr > 0.0 {
        100.0 / (1.0 + realized_rr)
    } else {
        0.0
    }
}

/// `sum / count`, 0 for an empty group.
pub fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return dec!(0);
    }
    sum / Decimal::from(count)
}

/// The engine responsible for calculating portfolio metrics from trade data.
#[derive(Debug, Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates a full snapshot from an unordered set of closed trades.
    pub fn calculate(&self, trades: &[Trade]) -> AnalyticsSnapshot {
        let mut report = AnalyticsSnapshot::default();
        if trades.is_empty() {
            return report; // All-zero snapshot, no extremes.
        }
        debug!(trades = trades.len(), "Calculating analytics snapshot");

        // --- 1. Outcome partition ---
        let winning: Vec<&Trade> = trades.iter().filter(|t| t.is_win()).collect();
        let losing: Vec<&Trade> = trades.iter().filter(|t| t.is_loss()).collect();

        report.total_trades = trades.len() as u32;
        report.winning_trades = winning.len() as u32;
        report.losing_trades = losing.len() as u32;
        report.break_even_trades = report.total_trades - report.winning_trades - report.losing_trades;

        // --- 2. P&L, averages and ratios ---
        report.total_pnl = trades.iter().map(|t| t.pnl).sum();
        report.gross_profit = winning.iter().map(|t| t.pnl).sum();
        report.gross_loss = losing.iter().map(|t| t.pnl.abs()).sum();
        report.avg_win = mean(report.gross_profit, winning.len());
        report.avg_loss = mean(report.gross_loss, losing.len());
        report.win_rate = win_rate(winning.len(), trades.len());
        report.profit_factor = payoff_ratio(report.avg_win, report.avg_loss);
        report.realized_rr = payoff_ratio(report.avg_win, report.avg_loss);

        // --- 3. Extremes (first occurrence wins ties) ---
        report.best_trade = extreme(trades, |candidate, current| candidate > current);
        report.worst_trade = extreme(trades, |candidate, current| candidate < current);
        report.largest_gain = winning.iter().map(|t| t.pnl).max().unwrap_or(dec!(0));
        report.largest_loss = losing.iter().map(|t| t.pnl.abs()).max().unwrap_or(dec!(0));

        // --- 4. Per-side metrics ---
        report.long = side_stats(trades, Side::Long);
        report.short = side_stats(trades, Side::Short);

        // --- 5. Expectancy ---
        let win_fraction = Decimal::from(report.winning_trades) / Decimal::from(report.total_trades);
        report.expected_value =
            win_fraction * report.avg_win - (dec!(1) - win_fraction) * report.avg_loss;
        report.required_win_rate = required_win_rate(report.realized_rr);

        // --- 6. Holding time ---
        let total_hold_ms: i128 = trades.iter().map(|t| t.hold_time_ms() as i128).sum();
        report.avg_hold_time_ms = total_hold_ms as f64 / trades.len() as f64;

        // --- 7. Streaks ---
        let (max_wins, max_losses) = streaks(trades);
        report.max_consecutive_wins = max_wins;
        report.max_consecutive_losses = max_losses;

        report
    }
}

fn extreme(trades: &[Trade], replaces: impl Fn(Decimal, Decimal) -> bool) -> Option<TradeExtreme> {
    let mut chosen: Option<&Trade> = None;
    for trade in trades {
        match chosen {
            Some(current) if !replaces(trade.pnl, current.pnl) => {}
            _ => chosen = Some(trade),
        }
    }
    chosen.map(|t| TradeExtreme {
        trade_id: t.id.clone(),
        symbol: t.symbol.clone(),
        pnl: t.pnl,
    })
}

fn side_stats(trades: &[Trade], side: Side) -> SideStats {
    let subset: Vec<&Trade> = trades.iter().filter(|t| t.side == side).collect();
    if subset.is_empty() {
        return SideStats::default();
    }

    let wins: Vec<Decimal> = subset.iter().filter(|t| t.is_win()).map(|t| t.pnl).collect();
    let losses: Vec<Decimal> = subset.iter().filter(|t| t.is_loss()).map(|t| t.pnl.abs()).collect();
    let avg_win = mean(wins.iter().copied().sum(), wins.len());
    let avg_loss = mean(losses.iter().copied().sum(), losses.len());

    SideStats {
        trades: subset.len() as u32,
        pnl: subset.iter().map(|t| t.pnl).sum(),
        win_rate: win_rate(wins.len(), subset.len()),
        avg_win,
        avg_loss,
        realized_rr: payoff_ratio(avg_win, avg_loss),
    }
}

/// Longest winning and losing runs in exit-time order. A break-even trade
/// resets both runs.
fn streaks(trades: &[Trade]) -> (u32, u32) {
    let mut current_wins = 0u32;
    let mut current_losses = 0u32;
    let mut max_wins = 0u32;
    let mut max_losses = 0u32;

    for trade in chronological(trades) {
        if trade.is_win() {
            current_wins += 1;
            current_losses = 0;
        } else if trade.is_loss() {
            current_losses += 1;
            current_wins = 0;
        } else {
            current_wins = 0;
            current_losses = 0;
        }
        max_wins = max_wins.max(current_wins);
        max_losses = max_losses.max(current_losses);
    }

    (max_wins, max_losses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sequence, trade_at};
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_input_is_all_zero() {
        let report = AnalyticsEngine::new().calculate(&[]);
        assert_eq!(report, AnalyticsSnapshot::default());
        assert_eq!(report.best_trade, None);
        assert_eq!(report.profit_factor, 0.0);
        assert_eq!(report.required_win_rate, 0.0);
    }

    #[test]
    fn partitions_are_exhaustive() {
        let trades = sequence(&[dec!(10), dec!(0), dec!(-5), dec!(0), dec!(7)]);
        let report = AnalyticsEngine::new().calculate(&trades);
        assert_eq!(report.winning_trades, 2);
        assert_eq!(report.losing_trades, 1);
        assert_eq!(report.break_even_trades, 2);
        assert_eq!(
            report.winning_trades + report.losing_trades + report.break_even_trades,
            report.total_trades
        );
        assert_eq!(report.total_pnl, dec!(12));
        assert_eq!(report.gross_profit, dec!(17));
        assert_eq!(report.gross_loss, dec!(5));
        assert_eq!(report.win_rate, 40.0);
    }

    #[test]
    fn streaks_follow_exit_order() {
        let trades = sequence(&[dec!(100), dec!(50), dec!(-25), dec!(-30), dec!(-10), dec!(200)]);
        let report = AnalyticsEngine::new().calculate(&trades);
        assert_eq!(report.max_consecutive_wins, 2);
        assert_eq!(report.max_consecutive_losses, 3);
    }

    #[test]
    fn streaks_ignore_input_order() {
        let mut trades = sequence(&[dec!(100), dec!(50), dec!(-25), dec!(-30), dec!(-10), dec!(200)]);
        trades.reverse();
        trades.swap(0, 3);
        let report = AnalyticsEngine::new().calculate(&trades);
        assert_eq!(report.max_consecutive_wins, 2);
        assert_eq!(report.max_consecutive_losses, 3);
    }

    #[test]
    fn break_even_resets_both_streaks() {
        let report = AnalyticsEngine::new().calculate(&sequence(&[dec!(100), dec!(0), dec!(50)]));
        assert_eq!(report.max_consecutive_wins, 1);

        let report = AnalyticsEngine::new().calculate(&sequence(&[dec!(-1), dec!(0), dec!(-1)]));
        assert_eq!(report.max_consecutive_losses, 1);
    }

    #[test]
    fn rr_and_required_win_rate() {
        let report = AnalyticsEngine::new().calculate(&sequence(&[dec!(100), dec!(200), dec!(-100)]));
        assert_eq!(report.avg_win, dec!(150));
        assert_eq!(report.avg_loss, dec!(100));
        assert_eq!(report.realized_rr, 1.5);
        assert_eq!(report.profit_factor, 1.5);
        assert!((report.required_win_rate - 40.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_sentinels() {
        let only_wins = AnalyticsEngine::new().calculate(&sequence(&[dec!(10), dec!(20)]));
        assert_eq!(only_wins.profit_factor, f64::INFINITY);
        assert_eq!(only_wins.realized_rr, f64::INFINITY);
        assert_eq!(only_wins.required_win_rate, 0.0);
        assert_eq!(only_wins.avg_loss, dec!(0));

        let only_losses = AnalyticsEngine::new().calculate(&sequence(&[dec!(-10)]));
        assert_eq!(only_losses.profit_factor, 0.0);
        assert_eq!(only_losses.required_win_rate, 0.0);
        assert_eq!(only_losses.avg_loss, dec!(10));

        let flat = AnalyticsEngine::new().calculate(&sequence(&[dec!(0)]));
        assert_eq!(flat.profit_factor, 0.0);
        assert_eq!(flat.break_even_trades, 1);
    }

    #[test]
    fn expected_value_weights_outcomes() {
        // 2 wins of 150 avg, 2 losses of 50 avg: 0.5*150 - 0.5*50 = 50
        let report = AnalyticsEngine::new()
            .calculate(&sequence(&[dec!(100), dec!(-40), dec!(200), dec!(-60)]));
        assert_eq!(report.expected_value, dec!(50));
    }

    #[test]
    fn extremes_break_ties_by_first_occurrence() {
        let trades = sequence(&[dec!(5), dec!(9), dec!(-3), dec!(9), dec!(-3)]);
        let report = AnalyticsEngine::new().calculate(&trades);
        let best = report.best_trade.unwrap();
        let worst = report.worst_trade.unwrap();
        assert_eq!(best.trade_id, "t1");
        assert_eq!(best.pnl, dec!(9));
        assert_eq!(worst.trade_id, "t2");
        assert_eq!(report.largest_gain, dec!(9));
        assert_eq!(report.largest_loss, dec!(3));
    }

    #[test]
    fn side_metrics_are_scoped() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap();
        let trades = vec![
            trade_at("a", Side::Long, dec!(30), t0),
            trade_at("b", Side::Long, dec!(-10), t0),
            trade_at("c", Side::Long, dec!(50), t0),
        ];
        let report = AnalyticsEngine::new().calculate(&trades);
        assert_eq!(report.long.trades, 3);
        assert_eq!(report.long.pnl, dec!(70));
        assert_eq!(report.long.avg_win, dec!(40));
        assert_eq!(report.long.avg_loss, dec!(10));
        assert_eq!(report.long.realized_rr, 4.0);
        assert_eq!(report.short, SideStats::default());
    }

    #[test]
    fn average_hold_time_in_millis() {
        // `sequence` holds every trade for exactly one hour.
        let report = AnalyticsEngine::new().calculate(&sequence(&[dec!(1), dec!(-1)]));
        assert_eq!(report.avg_hold_time_ms, 3_600_000.0);
    }
}
