use std::str::FromStr;

use anyhow::Result;
use chrono_tz::Tz;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub matching: MatchingConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// IANA name of the zone floating DATE/DATE-TIME values are read in.
    pub floating_timezone: String,
}

impl MatchingConfig {
    /// ## Summary
    /// Resolves the configured floating time zone.
    ///
    /// ## Errors
    /// Returns `CoreError::UnknownTimezone` if the name is not an IANA zone.
    pub fn timezone(&self) -> CoreResult<Tz> {
        Tz::from_str(self.floating_timezone.trim())
            .map_err(|_e| CoreError::UnknownTimezone(self.floating_timezone.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// File extension of calendar object resources, without the dot.
    pub extension: String,
}

impl StoreConfig {
    /// ## Summary
    /// Returns whether a file name carries the configured extension.
    #[must_use]
    pub fn accepts(&self, file_name: &str) -> bool {
        file_name.rsplit_once('.').is_some_and(|(stem, ext)| {
            !stem.is_empty() && ext.eq_ignore_ascii_case(&self.extension)
        })
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, `KUNAI_*` environment variables and
    /// an optional `kunai.toml` file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .set_default("matching.floating_timezone", "UTC")?
            .set_default("store.extension", "ics")?
            // Environment variables
            .add_source(
                config::Environment::with_prefix("KUNAI")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("kunai.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    // Unknown zones are rejected at load time.
    settings.matching.timezone()?;

    tracing::debug!(settings = ?settings, "Configuration loaded");
    Ok(settings)
}
