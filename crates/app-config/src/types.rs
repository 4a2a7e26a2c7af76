// In crates/app-config/src/types.rs

use analytics::HeatmapPalette;
use chrono::FixedOffset;
use serde::Deserialize;

use crate::{Error, Result};

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// How trades are bucketed into local calendar periods.
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    /// Colors for calendar / heat-map output.
    #[serde(default)]
    pub heatmap: HeatmapPalette,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AnalyticsSettings {
    /// Offset of the journal's local time from UTC, in minutes (e.g. -300 for New York winter time).
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl AnalyticsSettings {
    /// The fixed zone every day / week / month / hour key is computed in.
    pub fn timezone(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            Error::Invalid(format!(
                "utc_offset_minutes {} is outside +/-24h",
                self.utc_offset_minutes
            ))
        })
    }
}

// Helper functions for serde defaults
fn default_log_level() -> String {
    "info".to_string()
}
