// In app/src/report.rs

//! Plain-text renderings of the analytics results.

use analytics::types::{
    AnalyticsSnapshot, BucketStats, CategorySummary, DailyEquityPoint, EquityCurve, HourSummary,
    MistakeReport, MistakeSummary, PeriodSummary, SideStats, WeekdaySummary,
};
use analytics::{HeatmapCell, MistakeCategory};
use core_types::TradePnl;
use serde::Serialize;

/// A calendar period paired with how it should be drawn.
#[derive(Debug, Serialize)]
pub struct HeatmapRow {
    #[serde(flatten)]
    pub period: PeriodSummary,
    pub cell: HeatmapCell,
}

/// The mistake report as printed with `--json`. The impact ordering is an
/// extra field so `by_frequency` keeps its count order.
#[derive(Debug, Serialize)]
pub struct MistakeOutput<'a> {
    #[serde(flatten)]
    pub report: &'a MistakeReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_impact: Option<Vec<MistakeSummary>>,
}

impl<'a> MistakeOutput<'a> {
    pub fn new(report: &'a MistakeReport, by_impact: bool) -> Self {
        Self {
            report,
            by_impact: by_impact.then(|| report.by_impact()),
        }
    }
}

/// Formats a ratio that may be the +∞ sentinel.
fn ratio(value: f64) -> String {
    if value.is_infinite() {
        "∞".to_string()
    } else {
        format!("{value:.2}")
    }
}

fn hold_time(ms: f64) -> String {
    let minutes = (ms / 60_000.0).round() as i64;
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// A section title followed by one line per row.
fn section(title: &str, rows: impl IntoIterator<Item = String>) -> String {
    let mut out = format!("\n--- {title} ---\n");
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn side_line(name: &str, side: &SideStats) -> String {
    format!(
        "  {name:<6} trades: {:>4} | P&L: {:>12.2} | Win rate: {:>6.2}% | Avg win: {:.2} | Avg loss: {:.2} | R:R: {}",
        side.trades,
        side.pnl,
        side.win_rate,
        side.avg_win,
        side.avg_loss,
        ratio(side.realized_rr)
    )
}

pub fn snapshot(report: &AnalyticsSnapshot) -> String {
    let mut lines = vec![
        format!(
            "Trades: {} ({} wins / {} losses / {} break-even)",
            report.total_trades, report.winning_trades, report.losing_trades, report.break_even_trades
        ),
        format!(
            "Total P&L: {:.2} | Gross profit: {:.2} | Gross loss: {:.2}",
            report.total_pnl, report.gross_profit, report.gross_loss
        ),
        format!(
            "Win rate: {:.2}% | Avg win: {:.2} | Avg loss: {:.2}",
            report.win_rate, report.avg_win, report.avg_loss
        ),
        format!(
            "Profit factor: {} | Realized R:R: {} | Required win rate: {:.2}%",
            ratio(report.profit_factor),
            ratio(report.realized_rr),
            report.required_win_rate
        ),
        format!(
            "Expected value per trade: {:.2} | Avg hold time: {}",
            report.expected_value,
            hold_time(report.avg_hold_time_ms)
        ),
        format!(
            "Max consecutive wins: {} | Max consecutive losses: {}",
            report.max_consecutive_wins, report.max_consecutive_losses
        ),
        format!(
            "Largest gain: {:.2} | Largest loss: {:.2}",
            report.largest_gain, report.largest_loss
        ),
    ];
    if let (Some(best), Some(worst)) = (&report.best_trade, &report.worst_trade) {
        lines.push(format!(
            "Best trade: {} {} ({:.2}) | Worst trade: {} {} ({:.2})",
            best.trade_id, best.symbol, best.pnl, worst.trade_id, worst.symbol, worst.pnl
        ));
    }
    lines.push("By side:".to_string());
    lines.push(side_line("Long", &report.long));
    lines.push(side_line("Short", &report.short));
    section("Performance Summary", lines)
}

pub fn equity(curve: &EquityCurve) -> String {
    let points = curve.points.iter().map(|point| {
        format!(
            "{}  {:>12.2}  dd {:>10.2}  {}",
            point.date.format("%Y-%m-%d %H:%M"),
            point.cumulative_pnl,
            point.drawdown,
            point.trade_id
        )
    });
    let totals = format!(
        "Balance: {:.2} | Peak: {:.2} | Max drawdown: {:.2} ({:.2}%)",
        curve.current_balance, curve.peak_value, curve.max_drawdown, curve.max_drawdown_percent
    );
    section("Equity Curve", points.chain(std::iter::once(totals)))
}

pub fn daily_equity(points: &[DailyEquityPoint]) -> String {
    section(
        "Daily Equity",
        points.iter().map(|point| {
            format!(
                "{}  day {:>10.2}  cumulative {:>12.2}  trades {}",
                point.date, point.daily_pnl, point.cumulative_pnl, point.trade_count
            )
        }),
    )
}

fn stats_columns(stats: &BucketStats) -> String {
    format!(
        "trades {:>4} | P&L {:>12.2} | wins {:>4} ({:>6.2}%) | avg {:>10.2}",
        stats.count, stats.total_pnl, stats.win_count, stats.win_rate, stats.avg_trade_pnl
    )
}

pub fn weekdays(summaries: &[WeekdaySummary]) -> String {
    section(
        "By Day of Week",
        summaries
            .iter()
            .map(|s| format!("{:<4} {}", s.label, stats_columns(&s.stats))),
    )
}

pub fn hours(summaries: &[HourSummary]) -> String {
    section(
        "By Hour of Day",
        summaries
            .iter()
            .map(|s| format!("{:02}:00 {}", s.hour, stats_columns(&s.stats))),
    )
}

pub fn periods(title: &str, summaries: &[PeriodSummary]) -> String {
    section(
        title,
        summaries
            .iter()
            .map(|s| format!("{:<24} {}", s.label, stats_columns(&s.stats))),
    )
}

pub fn categories(title: &str, summaries: &[CategorySummary]) -> String {
    section(
        title,
        summaries
            .iter()
            .map(|s| format!("{:<20} {}", s.key, stats_columns(&s.stats))),
    )
}

fn mistake_line(s: &MistakeSummary) -> String {
    format!(
        "  {:<22} x{:<3} | P&L {:>12.2} | avg {:>10.2} | win rate {:>6.2}%",
        s.label, s.count, s.total_pnl, s.avg_pnl, s.win_rate
    )
}

pub fn mistakes(report: &MistakeReport, by_impact: bool) -> String {
    let mut lines = vec![
        format!(
            "With mistakes: {} trades, P&L {:.2} (avg {:.2})",
            report.trades_with_mistakes, report.pnl_with_mistakes, report.avg_pnl_with_mistakes
        ),
        format!(
            "Clean trades:  {} trades, P&L {:.2} (avg {:.2})",
            report.trades_without_mistakes, report.pnl_without_mistakes, report.avg_pnl_without_mistakes
        ),
    ];

    let summaries = if by_impact {
        report.by_impact()
    } else {
        report.by_frequency.clone()
    };
    lines.extend(summaries.iter().map(mistake_line));

    lines.push(match (&report.top_mistake, &report.costliest_mistake) {
        (Some(top), Some(costliest)) => {
            format!("Most frequent: {} | Costliest: {}", top.label, costliest.label)
        }
        _ => "No mistakes recorded.".to_string(),
    });
    section("Mistakes", lines)
}

pub fn categorized(note: Option<&str>, category: Option<MistakeCategory>) -> String {
    match category {
        Some(category) => format!("{} -> {} ({})", note.unwrap_or_default(), category.id(), category.label()),
        None => "No mistake recorded.".to_string(),
    }
}

pub fn heatmap(rows: &[HeatmapRow]) -> String {
    section(
        "P&L Heat Map",
        rows.iter().map(|HeatmapRow { period, cell }| {
            let background = cell
                .background
                .map(|bg| bg.to_string())
                .unwrap_or_else(|| "none".to_string());
            format!(
                "{:<24} {:>12.2}  {:<8} intensity {:<5} bg {} fg {}",
                period.label,
                period.stats.total_pnl,
                format!("{:?}", cell.tone),
                cell.intensity.map(|i| format!("{i:.2}")).unwrap_or_else(|| "-".into()),
                background,
                cell.foreground
            )
        }),
    )
}

pub fn pnl(outcome: &TradePnl) -> String {
    format!("P&L: {} ({}%)", outcome.pnl, outcome.pnl_percent)
}
