// In crates/analytics/src/range.rs

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use core_types::Trade;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Dashboard look-back windows. Resolving one always takes an explicit `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Today,
    Week,
    Month,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    Year,
    #[default]
    All,
}

impl DateRange {
    /// The earliest exit time included by this range, or `None` for `All`.
    /// "Today" starts at local midnight in `tz`; the others are rolling
    /// windows of 7, 30, 90, 180 and 365 days.
    pub fn threshold<Tz: TimeZone>(self, now: DateTime<Utc>, tz: &Tz) -> Option<DateTime<Utc>> {
        let days = match self {
            DateRange::All => return None,
            DateRange::Today => {
                let local_midnight = now.with_timezone(tz).date_naive().and_time(NaiveTime::MIN);
                return tz
                    .from_local_datetime(&local_midnight)
                    .earliest()
                    .map(|start| start.with_timezone(&Utc));
            }
            DateRange::Week => 7,
            DateRange::Month => 30,
            DateRange::ThreeMonths => 90,
            DateRange::SixMonths => 180,
            DateRange::Year => 365,
        };
        Some(now - Duration::days(days))
    }

    /// Clones the trades that closed inside this range.
    pub fn filter<Tz: TimeZone>(self, trades: &[Trade], now: DateTime<Utc>, tz: &Tz) -> Vec<Trade> {
        match self.threshold(now, tz) {
            Some(threshold) => filter_by_exit(trades, threshold),
            None => trades.to_vec(),
        }
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "3months" => Ok(DateRange::ThreeMonths),
            "6months" => Ok(DateRange::SixMonths),
            "year" => Ok(DateRange::Year),
            "all" => Ok(DateRange::All),
            other => Err(format!("unknown date range '{other}'")),
        }
    }
}

/// Trades whose exit time is at or after `threshold`, input order preserved.
pub fn filter_by_exit(trades: &[Trade], threshold: DateTime<Utc>) -> Vec<Trade> {
    trades
        .iter()
        .filter(|t| t.exit_time >= threshold)
        .cloned()
        .collect()
}
