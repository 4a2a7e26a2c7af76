// In crates/core-types/src/trade.rs

use crate::pnl::PnlCalculator;
use crate::{Error, Result, Side, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The input a journal entry is created from, before any P&L is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrade {
    pub id: String,
    pub symbol: Symbol,
    pub side: Side,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub quantity: Decimal,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,

    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub psychology: Option<String>,
    #[serde(default)]
    pub what_worked: Option<String>,
    #[serde(default)]
    pub what_failed: Option<String>,
    #[serde(default)]
    pub rule_violation: Option<String>,
    /// Self-rated conviction, 1 (lowest) to 5 (highest).
    #[serde(default)]
    pub confidence: Option<u8>,
}

/// A closed, validated trade carrying its derived P&L.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub symbol: Symbol,
    pub side: Side,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub quantity: Decimal,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub pnl: Decimal,
    pub pnl_percent: Decimal,

    pub strategy: Option<String>,
    pub notes: Option<String>,
    pub psychology: Option<String>,
    pub what_worked: Option<String>,
    pub what_failed: Option<String>,
    pub rule_violation: Option<String>,
    pub confidence: Option<u8>,
}

pub const MIN_CONFIDENCE: u8 = 1;
pub const MAX_CONFIDENCE: u8 = 5;

impl Trade {
    /// Validates a new journal entry and derives its P&L exactly once.
    pub fn open(input: NewTrade) -> Result<Self> {
        let outcome = PnlCalculator::new().calculate(
            input.side,
            input.entry_price,
            input.exit_price,
            input.quantity,
        )?;

        if input.exit_time < input.entry_time {
            return Err(Error::Validation(format!(
                "exit time {} precedes entry time {}",
                input.exit_time, input.entry_time
            )));
        }

        if let Some(confidence) = input.confidence {
            if !(MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&confidence) {
                return Err(Error::Validation(format!(
                    "confidence {confidence} outside {MIN_CONFIDENCE}..={MAX_CONFIDENCE}"
                )));
            }
        }

        Ok(Self {
            id: input.id,
            symbol: input.symbol,
            side: input.side,
            entry_price: input.entry_price,
            exit_price: input.exit_price,
            quantity: input.quantity,
            entry_time: input.entry_time,
            exit_time: input.exit_time,
            pnl: outcome.pnl,
            pnl_percent: outcome.pnl_percent,
            strategy: input.strategy,
            notes: input.notes,
            psychology: input.psychology,
            what_worked: input.what_worked,
            what_failed: input.what_failed,
            rule_violation: input.rule_violation,
            confidence: input.confidence,
        })
    }

    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.pnl < Decimal::ZERO
    }

    /// Milliseconds between entry and exit.
    pub fn hold_time_ms(&self) -> i64 {
        (self.exit_time - self.entry_time).num_milliseconds()
    }
}
