// In crates/analytics/src/mistakes.rs

//! The fixed mistake taxonomy and the free-text categorizer.

use serde::Serialize;
use std::fmt;

/// A behavioural mistake category. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeCategory {
    Fomo,
    RevengeTrading,
    Overtrading,
    OversizedPosition,
    NoStopLoss,
    EarlyExit,
    LateExit,
    PoorTiming,
    IgnoredPlan,
    PoorRiskReward,
    Emotional,
    Other,
}

impl MistakeCategory {
    /// Every category in matching priority order. `Other` is last and never
    /// matched by keyword.
    pub const ALL: [MistakeCategory; 12] = [
        MistakeCategory::Fomo,
        MistakeCategory::RevengeTrading,
        MistakeCategory::Overtrading,
        MistakeCategory::OversizedPosition,
        MistakeCategory::NoStopLoss,
        MistakeCategory::EarlyExit,
        MistakeCategory::LateExit,
        MistakeCategory::PoorTiming,
        MistakeCategory::IgnoredPlan,
        MistakeCategory::PoorRiskReward,
        MistakeCategory::Emotional,
        MistakeCategory::Other,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MistakeCategory::Fomo => "fomo",
            MistakeCategory::RevengeTrading => "revenge_trading",
            MistakeCategory::Overtrading => "overtrading",
            MistakeCategory::OversizedPosition => "oversized_position",
            MistakeCategory::NoStopLoss => "no_stop_loss",
            MistakeCategory::EarlyExit => "early_exit",
            MistakeCategory::LateExit => "late_exit",
            MistakeCategory::PoorTiming => "poor_timing",
            MistakeCategory::IgnoredPlan => "ignored_plan",
            MistakeCategory::PoorRiskReward => "poor_risk_reward",
            MistakeCategory::Emotional => "emotional",
            MistakeCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MistakeCategory::Fomo => "FOMO Entry",
            MistakeCategory::RevengeTrading => "Revenge Trading",
            MistakeCategory::Overtrading => "Overtrading",
            MistakeCategory::OversizedPosition => "Oversized Position",
            MistakeCategory::NoStopLoss => "No / Moved Stop Loss",
            MistakeCategory::EarlyExit => "Exited Too Early",
            MistakeCategory::LateExit => "Held Too Long",
            MistakeCategory::PoorTiming => "Poor Entry Timing",
            MistakeCategory::IgnoredPlan => "Ignored Trading Plan",
            MistakeCategory::PoorRiskReward => "Poor Risk:Reward",
            MistakeCategory::Emotional => "Emotional Decision",
            MistakeCategory::Other => "Other",
        }
    }

    /// Lowercase substrings that identify the category. Order within the
    /// list is irrelevant to the result; order across categories is not.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            MistakeCategory::Fomo => &["fomo", "fear of missing", "missing out", "chased", "chasing"],
            MistakeCategory::RevengeTrading => &[
                "revenge",
                "make it back",
                "get it back",
                "win it back",
                "tilt",
            ],
            MistakeCategory::Overtrading => &["overtrad", "over-trad", "too many trades", "bored"],
            MistakeCategory::OversizedPosition => &[
                "oversiz",
                "position too large",
                "position too big",
                "size too big",
                "too much size",
                "overleverag",
                "over-leverag",
                "risked too much",
            ],
            MistakeCategory::NoStopLoss => &[
                "no stop",
                "without a stop",
                "without stop",
                "moved stop",
                "moved my stop",
                "widened stop",
                "widened my stop",
                "ignored stop",
                "ignored my stop",
            ],
            MistakeCategory::EarlyExit => &[
                "exited too early",
                "exit too early",
                "exited early",
                "closed too early",
                "closed early",
                "took profit too early",
                "took profits too early",
                "cut winner",
                "paper hand",
            ],
            MistakeCategory::LateExit => &[
                "exited too late",
                "exit too late",
                "closed too late",
                "held too long",
                "held on too long",
                "gave back",
                "overstayed",
            ],
            MistakeCategory::PoorTiming => &[
                "entered too early",
                "entry too early",
                "entered too late",
                "entry too late",
                "too early",
                "too late",
                "late entry",
                "early entry",
                "timing",
                "jumped in",
            ],
            MistakeCategory::IgnoredPlan => &[
                "ignored plan",
                "ignored my plan",
                "no plan",
                "off plan",
                "not in plan",
                "not in my plan",
                "didn't follow",
                "did not follow",
                "broke my rule",
                "broke rule",
                "deviated",
            ],
            MistakeCategory::PoorRiskReward => &[
                "risk reward",
                "risk/reward",
                "risk:reward",
                "bad r:r",
                "poor r:r",
                "low r:r",
                "target too small",
                "target too close",
            ],
            MistakeCategory::Emotional => &[
                "emotion",
                "fear",
                "greed",
                "panic",
                "impatien",
                "frustrat",
                "angry",
                "anxious",
                "stress",
            ],
            MistakeCategory::Other => &[],
        }
    }

    fn matches(self, normalized: &str) -> bool {
        self.keywords().iter().any(|keyword| normalized.contains(keyword))
    }
}

impl fmt::Display for MistakeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Classifies a free-text rule-violation note.
///
/// Returns `None` only for an absent or blank note ("no mistake recorded").
/// A non-blank note that matches nothing is `Some(Other)`.
pub fn categorize(annotation: Option<&str>) -> Option<MistakeCategory> {
    let normalized = annotation?.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let category = MistakeCategory::ALL
        .iter()
        .copied()
        .find(|category| category.matches(&normalized))
        .unwrap_or(MistakeCategory::Other);

    Some(category)
}
