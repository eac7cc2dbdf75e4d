use crate::core::backoff::BackoffPolicy;
use crate::core::engine::{Pacing, RunSettings};
use crate::domain::geo::GeoMapping;
use crate::domain::model::TrendWindow;
use crate::utils::error::{Result, TrendSyncError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

/// Tuning file. Every section and field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSyncConfig {
    pub store: StoreConfig,
    pub provider: ProviderConfig,
    pub backoff: BackoffConfig,
    pub pacing: PacingConfig,
    pub geo: GeoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub keywords_table: String,
    pub trends_table: String,
    /// Rows fetched before sampling; always at least the working set size.
    pub pool_size: usize,
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            keywords_table: "keywords".to_string(),
            trends_table: "keyword_trends".to_string(),
            pool_size: 200,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub hl: String,
    /// Minutes west of UTC, as the provider expects.
    pub tz: i32,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://trends.google.com".to_string(),
            hl: "da-DK".to_string(),
            tz: -60,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub max_attempts: u32,
    pub base_unit_seconds: f64,
    pub jitter_max_seconds: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_unit_seconds: 10.0,
            jitter_max_seconds: 7.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub cooldown_seconds: f64,
    pub cooldown_jitter_seconds: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: 35.0,
            cooldown_jitter_seconds: 15.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub default: Option<String>,
    pub countries: HashMap<String, String>,
}

impl TrendSyncConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TrendSyncError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("store.keywords_table", &self.store.keywords_table)?;
        validate_non_empty_string("store.trends_table", &self.store.trends_table)?;
        validate_positive_number("store.pool_size", self.store.pool_size as u64, 1)?;
        validate_positive_number("store.timeout_seconds", self.store.timeout_seconds, 1)?;

        validate_url("provider.base_url", &self.provider.base_url)?;
        validate_non_empty_string("provider.hl", &self.provider.hl)?;
        validate_range("provider.tz", self.provider.tz, -840, 720)?;
        validate_positive_number("provider.timeout_seconds", self.provider.timeout_seconds, 1)?;

        validate_positive_number("backoff.max_attempts", self.backoff.max_attempts as u64, 1)?;
        validate_range("backoff.base_unit_seconds", self.backoff.base_unit_seconds, 0.0, 3600.0)?;
        validate_range("backoff.jitter_max_seconds", self.backoff.jitter_max_seconds, 0.0, 3600.0)?;
        validate_range("pacing.cooldown_seconds", self.pacing.cooldown_seconds, 0.0, 3600.0)?;
        validate_range(
            "pacing.cooldown_jitter_seconds",
            self.pacing.cooldown_jitter_seconds,
            0.0,
            3600.0,
        )?;

        Ok(())
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            backoff: BackoffPolicy {
                max_attempts: self.backoff.max_attempts,
                base_unit: Duration::from_secs_f64(self.backoff.base_unit_seconds),
                jitter_max: Duration::from_secs_f64(self.backoff.jitter_max_seconds),
            },
            pacing: Pacing {
                cooldown: Duration::from_secs_f64(self.pacing.cooldown_seconds),
                jitter_max: Duration::from_secs_f64(self.pacing.cooldown_jitter_seconds),
            },
            geo: GeoMapping::with_overrides(
                self.geo.default.as_deref(),
                self.geo.countries.clone(),
            ),
            window: TrendWindow::Trailing12Months,
        }
    }
}

impl Validate for TrendSyncConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
