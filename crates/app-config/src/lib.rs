// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AnalyticsSettings, AppSettings, Settings};

/// Loads the application settings from the `config/` directory.
///
/// The environment name comes from `APP_ENVIRONMENT` and defaults to
/// "development".
pub fn load_settings() -> Result<Settings> {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(Path::new("config"), &environment)
}

/// Layered configuration rooted at `dir`:
/// 1. `base.toml` (required).
/// 2. `{environment}.toml`, if present.
/// 3. Environment variables such as `APP__APP__LOG_LEVEL=debug` or
///    `APP__ANALYTICS__UTC_OFFSET_MINUTES=-300`.
pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        .set_default("app.environment", environment)?
        .add_source(File::from(dir.join("base")))
        .add_source(File::from(dir.join(environment)).required(false))
        .add_source(Environment::with_prefix("APP").prefix_separator("__").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;

    // Fail early on an unusable offset rather than at the first breakdown.
    settings.analytics.timezone()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn layers_environment_file_over_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            r#"
[app]
environment = "development"
log_level = "info"

[analytics]
utc_offset_minutes = 0
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("production.toml"),
            r##"
[app]
environment = "production"
log_level = "warn"

[analytics]
utc_offset_minutes = -300

[heatmap]
profit = "#00ff00"
"##,
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), "production").unwrap();
        assert_eq!(settings.app.environment, "production");
        assert_eq!(settings.app.log_level, "warn");
        assert_eq!(settings.analytics.timezone().unwrap().local_minus_utc(), -300 * 60);
        assert_eq!(settings.heatmap.profit.to_string(), "#00ff00");
        // Unset palette entries keep their defaults.
        assert_eq!(settings.heatmap.loss, analytics::HeatmapPalette::default().loss);
    }

    #[test]
    fn missing_environment_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), "[app]\nenvironment = \"test\"\n").unwrap();

        let settings = load_settings_from(dir.path(), "staging").unwrap();
        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.analytics.utc_offset_minutes, 0);
    }

    #[test]
    fn missing_base_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_settings_from(dir.path(), "development"),
            Err(Error::LoadError(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            "[app]\nenvironment = \"test\"\n[analytics]\nutc_offset_minutes = 5000\n",
        )
        .unwrap();
        assert!(matches!(
            load_settings_from(dir.path(), "test"),
            Err(Error::Invalid(_))
        ));
    }
}
