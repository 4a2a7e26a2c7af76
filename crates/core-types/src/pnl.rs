// In crates/core-types/src/pnl.rs

use crate::{Error, Result, Side};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Number of decimal places every derived P&L figure is rounded to.
pub const PNL_SCALE: u32 = 3;

/// The signed price move in the trader's favour.
pub fn signed_diff(side: Side, entry_price: Decimal, exit_price: Decimal) -> Decimal {
    (exit_price - entry_price) * side.sign()
}

/// Rounds a money amount to `PNL_SCALE` places, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PNL_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// The outcome of a single closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TradePnl {
    pub pnl: Decimal,
    pub pnl_percent: Decimal,
}

/// Computes per-trade P&L from entry, exit, quantity and side.
#[derive(Debug, Default, Clone, Copy)]
pub struct PnlCalculator;

impl PnlCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calculates absolute and percentage P&L with exact decimal arithmetic.
    ///
    /// Returns `Error::Validation` when any magnitude is zero or negative, or
    /// when a derived figure does not fit in a `Decimal`.
    pub fn calculate(
        &self,
        side: Side,
        entry_price: Decimal,
        exit_price: Decimal,
        quantity: Decimal,
    ) -> Result<TradePnl> {
        for (name, value) in [
            ("entry_price", entry_price),
            ("exit_price", exit_price),
            ("quantity", quantity),
        ] {
            if value <= Decimal::ZERO {
                return Err(Error::Validation(format!(
                    "non-positive magnitude: {name} = {value}"
                )));
            }
        }

        let diff = signed_diff(side, entry_price, exit_price);
        let out_of_range = |what: &str| {
            Error::Validation(format!(
                "magnitude out of range: {what} for entry {entry_price}, exit {exit_price}, quantity {quantity}"
            ))
        };
        let pnl = diff
            .checked_mul(quantity)
            .ok_or_else(|| out_of_range("pnl"))?;
        let pnl_percent = diff
            .checked_div(entry_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| out_of_range("pnl_percent"))?;

        Ok(TradePnl {
            pnl: round_money(pnl),
            pnl_percent: round_money(pnl_percent),
        })
    }
}
