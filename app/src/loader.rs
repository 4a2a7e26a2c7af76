// In app/src/loader.rs

use anyhow::{Context, Result};
use core_types::{NewTrade, Trade};
use std::path::Path;

/// Reads a JSON array of journal entries and validates each one into a
/// `Trade`. The first invalid entry aborts the whole load.
pub fn load_trades(path: &Path) -> Result<Vec<Trade>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trades file {}", path.display()))?;
    let entries: Vec<NewTrade> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse trades file {}", path.display()))?;

    let trades = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let id = entry.id.clone();
            Trade::open(entry).with_context(|| format!("Trade #{i} ('{id}') was rejected"))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(count = trades.len(), path = %path.display(), "Loaded trades.");
    Ok(trades)
}
