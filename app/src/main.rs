// In app/src/main.rs

use analytics::breakdown::{by_confidence, by_hour, by_period, by_strategy, by_symbol, by_weekday};
use analytics::{
    AnalyticsEngine, DateRange, HeatmapScale, Period, analyze_mistakes, build_equity_curve,
    categorize, daily_equity_curve,
};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use core_types::{PnlCalculator, Side, Trade};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

mod loader;
mod report;

use crate::report::{HeatmapRow, MistakeOutput};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Performance analytics over a journal of closed trades.")]
struct Cli {
    /// Print results as pretty JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the trades come from and which of them to analyze.
#[derive(Args, Debug)]
struct TradeArgs {
    /// A JSON array of trade records.
    #[arg(short, long)]
    trades: PathBuf,

    /// Only trades that closed inside this window
    /// (today, week, month, 3months, 6months, year, all).
    #[arg(long, default_value = "all")]
    range: DateRange,

    /// Reference time for `--range`, in RFC 3339. Defaults to the current time.
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Portfolio-level performance summary.
    Summary {
        #[command(flatten)]
        input: TradeArgs,
    },

    /// Cumulative P&L and drawdown after every trade.
    Equity {
        #[command(flatten)]
        input: TradeArgs,

        /// One point per local calendar day instead of per trade.
        #[arg(long)]
        daily: bool,
    },

    /// Per-bucket statistics.
    Breakdown {
        #[command(flatten)]
        input: TradeArgs,

        #[arg(long, value_enum)]
        by: BreakdownKind,
    },

    /// Calendar heat map of P&L per day, week or month.
    Heatmap {
        #[command(flatten)]
        input: TradeArgs,

        #[arg(long, value_enum, default_value_t = PeriodArg::Day)]
        period: PeriodArg,
    },

    /// Behavioural statistics over recorded rule violations.
    Mistakes {
        #[command(flatten)]
        input: TradeArgs,

        /// Order categories by total P&L, most negative first.
        #[arg(long)]
        by_impact: bool,
    },

    /// Classifies a single rule-violation note.
    Classify {
        #[arg(long)]
        note: String,
    },

    /// Computes the P&L of a single round trip.
    Pnl {
        #[arg(long)]
        side: Side,
        #[arg(long)]
        entry: Decimal,
        #[arg(long)]
        exit: Decimal,
        #[arg(long)]
        quantity: Decimal,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum BreakdownKind {
    Weekday,
    Hour,
    Day,
    Week,
    Month,
    Strategy,
    Symbol,
    Confidence,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PeriodArg {
    Day,
    Week,
    Month,
}

impl From<PeriodArg> for Period {
    fn from(value: PeriodArg) -> Self {
        match value {
            PeriodArg::Day => Period::Day,
            PeriodArg::Week => Period::Week,
            PeriodArg::Month => Period::Month,
        }
    }
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("Failed to load settings")?;

    // Logs go to stderr so `--json` output can be piped.
    let level: tracing::Level = settings
        .app
        .log_level
        .parse()
        .with_context(|| format!("Invalid log level '{}'", settings.app.log_level))?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(environment = %settings.app.environment, "Starting tradebook");

    let tz = settings.analytics.timezone()?;
    let json = cli.json;

    match cli.command {
        Commands::Summary { input } => {
            let trades = select_trades(&input, &tz)?;
            let snapshot = AnalyticsEngine::new().calculate(&trades);
            emit(json, &snapshot, report::snapshot)?;
        }
        Commands::Equity { input, daily } => {
            let trades = select_trades(&input, &tz)?;
            if daily {
                let points = daily_equity_curve(&trades, &tz);
                emit(json, &points, |p| report::daily_equity(p))?;
            } else {
                let curve = build_equity_curve(&trades);
                emit(json, &curve, report::equity)?;
            }
        }
        Commands::Breakdown { input, by } => {
            let trades = select_trades(&input, &tz)?;
            handle_breakdown(&trades, &tz, by, json)?;
        }
        Commands::Heatmap { input, period } => {
            let trades = select_trades(&input, &tz)?;
            let periods = by_period(&trades, &tz, period.into());
            let scale = HeatmapScale::from_pnls(periods.iter().map(|p| p.stats.total_pnl));
            let rows: Vec<HeatmapRow> = periods
                .into_iter()
                .map(|period| {
                    let cell = scale.cell(period.stats.total_pnl, &settings.heatmap);
                    HeatmapRow { period, cell }
                })
                .collect();
            emit(json, &rows, |r| report::heatmap(r))?;
        }
        Commands::Mistakes { input, by_impact } => {
            let trades = select_trades(&input, &tz)?;
            let mistakes = analyze_mistakes(&trades);
            let output = MistakeOutput::new(&mistakes, by_impact);
            emit(json, &output, |o| report::mistakes(o.report, by_impact))?;
        }
        Commands::Classify { note } => {
            let category = categorize(Some(note.as_str()));
            emit(json, &category, |c| report::categorized(Some(note.as_str()), *c))?;
        }
        Commands::Pnl {
            side,
            entry,
            exit,
            quantity,
        } => {
            let outcome = PnlCalculator::new().calculate(side, entry, exit, quantity)?;
            emit(json, &outcome, report::pnl)?;
        }
    }

    tracing::info!("tradebook has finished successfully.");
    Ok(())
}

/// Loads the trade file and applies the requested date range.
fn select_trades(input: &TradeArgs, tz: &FixedOffset) -> Result<Vec<Trade>> {
    let trades = loader::load_trades(&input.trades)?;
    let now = input.now.unwrap_or_else(Utc::now);
    let selected = input.range.filter(&trades, now, tz);
    tracing::info!(
        range = ?input.range,
        selected = selected.len(),
        total = trades.len(),
        "Applied date range."
    );
    Ok(selected)
}

fn handle_breakdown(trades: &[Trade], tz: &FixedOffset, by: BreakdownKind, json: bool) -> Result<()> {
    match by {
        BreakdownKind::Weekday => emit(json, &by_weekday(trades, tz), |s| report::weekdays(s)),
        BreakdownKind::Hour => emit(json, &by_hour(trades, tz), |s| report::hours(s)),
        BreakdownKind::Day => emit(json, &by_period(trades, tz, Period::Day), |s| {
            report::periods("By Day", s)
        }),
        BreakdownKind::Week => emit(json, &by_period(trades, tz, Period::Week), |s| {
            report::periods("By Week", s)
        }),
        BreakdownKind::Month => emit(json, &by_period(trades, tz, Period::Month), |s| {
            report::periods("By Month", s)
        }),
        BreakdownKind::Strategy => emit(json, &by_strategy(trades), |s| {
            report::categories("By Strategy", s)
        }),
        BreakdownKind::Symbol => emit(json, &by_symbol(trades), |s| report::categories("By Symbol", s)),
        BreakdownKind::Confidence => emit(json, &by_confidence(trades), |s| {
            report::categories("By Confidence", s)
        }),
    }
}

/// Prints `value` either as pretty JSON or through its text renderer.
fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{rendered}");
    } else {
        println!("{}", text(value));
    }
    Ok(())
}
