// In crates/core-types/src/lib.rs

pub mod error;
pub mod pnl;
pub mod trade;
pub mod types;

// Re-export the most important types for easy access from other crates.
pub use error::{Error, Result};
pub use pnl::{PnlCalculator, TradePnl};
pub use trade::{NewTrade, Trade};
pub use types::{Side, Symbol};
