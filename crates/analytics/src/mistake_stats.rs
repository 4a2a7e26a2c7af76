// In crates/analytics/src/mistake_stats.rs

use core_types::Trade;
use rust_decimal::Decimal;
use tracing::debug;

use crate::breakdown::group_by;
use crate::engine::{mean, win_rate};
use crate::mistakes::{MistakeCategory, categorize};
use crate::types::{MistakeReport, MistakeSummary};

/// Behavioural statistics over the `rule_violation` notes of a trade set.
pub fn analyze_mistakes(trades: &[Trade]) -> MistakeReport {
    debug!(trades = trades.len(), "Analyzing recorded mistakes");

    // --- 1. Classify once, split into with / without ---
    let mut with: Vec<(MistakeCategory, &Trade)> = Vec::new();
    let mut without: Vec<&Trade> = Vec::new();
    for trade in trades {
        match categorize(trade.rule_violation.as_deref()) {
            Some(category) => with.push((category, trade)),
            None => without.push(trade),
        }
    }

    let pnl_with: Decimal = with.iter().map(|(_, t)| t.pnl).sum();
    let pnl_without: Decimal = without.iter().map(|t| t.pnl).sum();

    // --- 2. Per-category summaries ---
    // Groups come out in first-seen order; the stable sort keeps it for ties.
    let mut by_frequency: Vec<MistakeSummary> = group_by(with.iter().copied(), |(category, _)| *category)
        .into_iter()
        .map(|(category, bucket)| summarize(category, bucket.iter().map(|(_, t)| *t)))
        .collect();
    by_frequency.sort_by(|a, b| b.count.cmp(&a.count));

    let mut report = MistakeReport {
        trades_with_mistakes: with.len() as u32,
        trades_without_mistakes: without.len() as u32,
        pnl_with_mistakes: pnl_with,
        pnl_without_mistakes: pnl_without,
        avg_pnl_with_mistakes: mean(pnl_with, with.len()),
        avg_pnl_without_mistakes: mean(pnl_without, without.len()),
        by_frequency,
        top_mistake: None,
        costliest_mistake: None,
    };
    report.top_mistake = report.by_frequency.first().cloned();
    report.costliest_mistake = report.by_impact().into_iter().next();
    report
}

fn summarize<'a>(category: MistakeCategory, bucket: impl Iterator<Item = &'a Trade>) -> MistakeSummary {
    let mut count = 0usize;
    let mut wins = 0usize;
    let mut total_pnl = Decimal::ZERO;
    for trade in bucket {
        count += 1;
        total_pnl += trade.pnl;
        if trade.is_win() {
            wins += 1;
        }
    }

    MistakeSummary {
        category,
        label: category.label(),
        count: count as u32,
        total_pnl,
        avg_pnl: mean(total_pnl, count),
        win_rate: win_rate(wins, count),
    }
}

impl MistakeReport {
    /// The same summaries re-sorted by total P&L, most negative first.
    pub fn by_impact(&self) -> Vec<MistakeSummary> {
        let mut summaries = self.by_frequency.clone();
        summaries.sort_by(|a, b| a.total_pnl.cmp(&b.total_pnl));
        summaries
    }
}
