// In crates/analytics/src/equity.rs

use crate::ordering::chronological;
use crate::temporal::day_key;
use crate::types::{DailyEquityPoint, EquityCurve, EquityPoint};
use chrono::TimeZone;
use core_types::Trade;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use tracing::debug;

/// Builds the cumulative P&L curve and its drawdown statistics.
///
/// Trades are walked oldest exit first; the peak starts at zero, so a book
/// that only ever loses has a peak of 0 and a drawdown percent of 0.
pub fn build_equity_curve(trades: &[Trade]) -> EquityCurve {
    let mut curve = EquityCurve::default();
    if trades.is_empty() {
        return curve;
    }
    debug!(trades = trades.len(), "Building equity curve");

    let mut cumulative = dec!(0);
    let mut peak = dec!(0);
    let mut max_drawdown = dec!(0);

    for trade in chronological(trades) {
        cumulative += trade.pnl;
        peak = peak.max(cumulative);
        let drawdown = peak - cumulative;
        max_drawdown = max_drawdown.max(drawdown);

        curve.points.push(EquityPoint {
            date: trade.exit_time,
            cumulative_pnl: cumulative,
            drawdown,
            trade_id: trade.id.clone(),
        });
    }

    curve.current_balance = cumulative;
    curve.peak_value = peak;
    curve.max_drawdown = max_drawdown;
    if peak > dec!(0) {
        curve.max_drawdown_percent = (max_drawdown / peak * dec!(100)).to_f64().unwrap_or(0.0);
    }

    curve
}

/// The same walk grouped by local calendar day, one point per day that
/// closed at least one trade.
pub fn daily_equity_curve<Tz: TimeZone>(trades: &[Trade], tz: &Tz) -> Vec<DailyEquityPoint> {
    let mut points: Vec<DailyEquityPoint> = Vec::new();
    let mut cumulative = dec!(0);

    for trade in chronological(trades) {
        let date = day_key(&trade.exit_time.with_timezone(tz));
        cumulative += trade.pnl;

        match points.last_mut() {
            Some(point) if point.date == date => {
                point.daily_pnl += trade.pnl;
                point.cumulative_pnl = cumulative;
                point.trade_count += 1;
            }
            _ => points.push(DailyEquityPoint {
                date,
                daily_pnl: trade.pnl,
                cumulative_pnl: cumulative,
                trade_count: 1,
            }),
        }
    }

    points
}
