// In crates/analytics/src/breakdown.rs

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{mean, win_rate};
use crate::ordering::by_period_start_desc;
use crate::temporal::{
    WEEKDAY_DISPLAY_ORDER, day_bounds, day_key, day_label, hour_of_day,
    month_bounds, month_key, month_label, week_bounds, week_key, week_label, weekday_index,
    weekday_label,
};
use crate::types::{BucketStats, CategorySummary, HourSummary, PeriodSummary, WeekdaySummary};

impl BucketStats {
    /// Aggregates one bucket. An empty bucket is all zeros.
    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        let mut count = 0usize;
        let mut wins = 0usize;
        let mut total = Decimal::ZERO;
        for trade in trades {
            count += 1;
            total += trade.pnl;
            if trade.is_win() {
                wins += 1;
            }
        }

        Self {
            count: count as u32,
            total_pnl: total,
            win_count: wins as u32,
            win_rate: win_rate(wins, count),
            avg_trade_pnl: mean(total, count),
        }
    }
}

/// Groups items by `key`, keeping groups in first-seen order and items in
/// input order within each group.
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Calendar granularity for period breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    fn key<Tz: TimeZone>(self, d: &DateTime<Tz>) -> String {
        match self {
            Period::Day => day_key(d),
            Period::Week => week_key(d),
            Period::Month => month_key(d),
        }
    }

    fn bounds<Tz: TimeZone>(self, d: &DateTime<Tz>) -> (NaiveDateTime, NaiveDateTime) {
        match self {
            Period::Day => day_bounds(d),
            Period::Week => week_bounds(d),
            Period::Month => month_bounds(d),
        }
    }

    fn label(self, start: NaiveDateTime, end: NaiveDateTime) -> String {
        match self {
            Period::Day => day_label(start),
            Period::Week => week_label(start, end),
            Period::Month => month_label(start),
        }
    }
}

/// Always seven buckets, Monday first, including empty days. Like every
/// temporal breakdown, trades are placed by their local exit time.
pub fn by_weekday<Tz: TimeZone>(trades: &[Trade], tz: &Tz) -> Vec<WeekdaySummary> {
    // Indexed by the natural calendar index (Sunday = 0).
    let mut buckets: [Vec<&Trade>; 7] = Default::default();
    for trade in trades {
        let index = weekday_index(&trade.exit_time.with_timezone(tz));
        buckets[index as usize].push(trade);
    }

    WEEKDAY_DISPLAY_ORDER
        .iter()
        .map(|&weekday| WeekdaySummary {
            weekday,
            label: weekday_label(weekday),
            stats: BucketStats::from_trades(
                buckets[weekday.num_days_from_sunday() as usize].iter().copied(),
            ),
        })
        .collect()
}

/// Only hours that closed at least one trade, ascending.
pub fn by_hour<Tz: TimeZone>(trades: &[Trade], tz: &Tz) -> Vec<HourSummary> {
    let mut summaries: Vec<HourSummary> =
        group_by(trades, |t| hour_of_day(&t.exit_time.with_timezone(tz)))
            .into_iter()
            .map(|(hour, bucket)| HourSummary {
                hour,
                stats: BucketStats::from_trades(bucket),
            })
            .collect();
    summaries.sort_by_key(|s| s.hour);
    summaries
}

/// Populated days, weeks or months (by exit time), most recent first.
pub fn by_period<Tz: TimeZone>(trades: &[Trade], tz: &Tz, period: Period) -> Vec<PeriodSummary> {
    debug!(trades = trades.len(), ?period, "Building period breakdown");

    let mut summaries: Vec<PeriodSummary> =
        group_by(trades, |t| period.key(&t.exit_time.with_timezone(tz)))
            .into_iter()
            .map(|(key, bucket)| {
                let (start, end) = period.bounds(&bucket[0].exit_time.with_timezone(tz));
                PeriodSummary {
                    key,
                    label: period.label(start, end),
                    start,
                    end,
                    stats: BucketStats::from_trades(bucket),
                }
            })
            .collect();
    summaries.sort_by(by_period_start_desc);
    summaries
}

/// Trades grouped by their strategy tag; untagged trades share one bucket.
pub fn by_strategy(trades: &[Trade]) -> Vec<CategorySummary> {
    by_category(trades, |t| {
        t.strategy
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("unspecified")
            .to_string()
    })
}

pub fn by_symbol(trades: &[Trade]) -> Vec<CategorySummary> {
    by_category(trades, |t| t.symbol.0.clone())
}

/// Trades grouped by self-rated confidence, "1".."5" then "unrated".
pub fn by_confidence(trades: &[Trade]) -> Vec<CategorySummary> {
    by_category(trades, |t| match t.confidence {
        Some(level) => level.to_string(),
        None => "unrated".to_string(),
    })
}

fn by_category(trades: &[Trade], key: impl Fn(&Trade) -> String) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = group_by(trades, |t| key(*t))
        .into_iter()
        .map(|(key, bucket)| CategorySummary {
            key,
            stats: BucketStats::from_trades(bucket),
        })
        .collect();
    summaries.sort_by(|a, b| a.key.cmp(&b.key));
    summaries
}
