// In crates/analytics/src/types.rs

use chrono::{DateTime, NaiveDateTime, Utc, Weekday};
use core_types::Symbol;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::mistakes::MistakeCategory;

/// Identifies the single best or worst trade of a set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeExtreme {
    pub trade_id: String,
    pub symbol: Symbol,
    pub pnl: Decimal,
}

/// Metrics restricted to one side (long or short) of the book.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SideStats {
    pub trades: u32,
    pub pnl: Decimal,
    pub win_rate: f64,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    pub realized_rr: f64,
}

/// Portfolio-level performance metrics over a set of closed trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub break_even_trades: u32,

    pub total_pnl: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub avg_win: Decimal,
    /// Mean loss magnitude, never negative.
    pub avg_loss: Decimal,
    pub win_rate: f64,
    /// `f64::INFINITY` when there are wins and no losses.
    pub profit_factor: f64,
    pub realized_rr: f64,
    pub best_trade: Option<TradeExtreme>,
    pub worst_trade: Option<TradeExtreme>,

    pub long: SideStats,
    pub short: SideStats,

    pub expected_value: Decimal,
    /// 0 is a sentinel when R:R is 0 or infinite.
    pub required_win_rate: f64,
    pub avg_hold_time_ms: f64,

    pub max_consecutive_wins: u32,
    pub max_consecutive_losses: u32,
    pub largest_gain: Decimal,
    pub largest_loss: Decimal,
}

/// One step of the equity curve, in exit-time order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: DateTime<Utc>,
    pub cumulative_pnl: Decimal,
    pub drawdown: Decimal,
    pub trade_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EquityCurve {
    pub points: Vec<EquityPoint>,
    pub current_balance: Decimal,
    pub peak_value: Decimal,
    pub max_drawdown: Decimal,
    pub max_drawdown_percent: f64,
}

/// The equity curve collapsed to one point per local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEquityPoint {
    pub date: String,
    pub daily_pnl: Decimal,
    pub cumulative_pnl: Decimal,
    pub trade_count: u32,
}

/// Statistics shared by every kind of bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BucketStats {
    pub count: u32,
    pub total_pnl: Decimal,
    pub win_count: u32,
    pub win_rate: f64,
    pub avg_trade_pnl: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdaySummary {
    pub weekday: Weekday,
    pub label: &'static str,
    #[serde(flatten)]
    pub stats: BucketStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourSummary {
    pub hour: u32,
    #[serde(flatten)]
    pub stats: BucketStats,
}

/// A populated calendar period (day, week or month).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub key: String,
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(flatten)]
    pub stats: BucketStats,
}

/// A bucket keyed by a non-temporal attribute (strategy, symbol, confidence).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub key: String,
    #[serde(flatten)]
    pub stats: BucketStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MistakeSummary {
    pub category: MistakeCategory,
    pub label: &'static str,
    pub count: u32,
    pub total_pnl: Decimal,
    pub avg_pnl: Decimal,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MistakeReport {
    pub trades_with_mistakes: u32,
    pub trades_without_mistakes: u32,
    pub pnl_with_mistakes: Decimal,
    pub pnl_without_mistakes: Decimal,
    pub avg_pnl_with_mistakes: Decimal,
    pub avg_pnl_without_mistakes: Decimal,
    /// Sorted by count descending, ties in first-seen order.
    pub by_frequency: Vec<MistakeSummary>,
    pub top_mistake: Option<MistakeSummary>,
    pub costliest_mistake: Option<MistakeSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn infinite_ratios_serialize_as_null() {
        let snapshot = AnalyticsSnapshot {
            total_trades: 1,
            winning_trades: 1,
            total_pnl: dec!(50),
            avg_win: dec!(50),
            profit_factor: f64::INFINITY,
            realized_rr: f64::INFINITY,
            ..Default::default()
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["profit_factor"].is_null());
        assert!(json["realized_rr"].is_null());
        assert_eq!(json["required_win_rate"], serde_json::json!(0.0));
        assert_eq!(json["total_trades"], serde_json::json!(1));
    }

    #[test]
    fn mistake_categories_serialize_as_snake_case_ids() {
        let summary = MistakeSummary {
            category: MistakeCategory::EarlyExit,
            label: MistakeCategory::EarlyExit.label(),
            count: 2,
            total_pnl: dec!(-10),
            avg_pnl: dec!(-5),
            win_rate: 50.0,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["category"], "early_exit");
        assert_eq!(json["category"], MistakeCategory::EarlyExit.id());
        assert_eq!(
            serde_json::to_value(MistakeCategory::PoorRiskReward).unwrap(),
            "poor_risk_reward"
        );
    }

    #[test]
    fn bucket_stats_flatten_into_summaries() {
        let summary = HourSummary {
            hour: 9,
            stats: BucketStats {
                count: 3,
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["hour"], 9);
        assert_eq!(json["count"], 3);
        assert!(json.get("stats").is_none());
    }
}
