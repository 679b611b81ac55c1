//! # Price Check Configuration
//!
//! Loads the pricing rules the CLI quotes with.
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (`FARMACIA_*`)
//! 2. Config file (`--config <path>` or `pricing.toml` in the config dir)
//! 3. Built-in defaults
//!
//! ## Example Config File
//! ```toml
//! [pricing]
//! wallet_rate = 0.02
//! inapam_factor = 0.95
//! inapam_max_prior_discount_ratio = 0.25
//! wallet_excluded_categories = ["Recargas", "Servicio Médico"]
//! utc_offset_minutes = -360
//!
//! [output]
//! pretty = true
//! ```

use std::path::{Path, PathBuf};

use farmacia_core::PricingRules;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AppResult;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "pricing.toml";

// =============================================================================
// AppConfig
// =============================================================================

/// Everything the price-check CLI reads from its environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Rates, thresholds and exclusions handed to the resolver.
    pub pricing: PricingRules,

    /// How the quote is printed.
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print the JSON report.
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present and silently skipped otherwise.
    pub fn load(path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(path = %path.display(), "Loading config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `FARMACIA_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = parse_override::<_, f64>(&lookup, "FARMACIA_WALLET_RATE") {
            debug!(rate, "Overriding wallet rate from env");
            self.pricing.wallet_rate = rate;
        }

        if let Some(factor) = parse_override::<_, f64>(&lookup, "FARMACIA_INAPAM_FACTOR") {
            debug!(factor, "Overriding INAPAM factor from env");
            self.pricing.inapam_factor = factor;
        }

        if let Some(ratio) = parse_override::<_, f64>(&lookup, "FARMACIA_INAPAM_MAX_PRIOR_DISCOUNT") {
            debug!(ratio, "Overriding INAPAM prior-discount threshold from env");
            self.pricing.inapam_max_prior_discount_ratio = ratio;
        }

        if let Some(minutes) = parse_override::<_, i32>(&lookup, "FARMACIA_UTC_OFFSET_MINUTES") {
            debug!(minutes, "Overriding UTC offset from env");
            self.pricing.utc_offset_minutes = minutes;
        }

        if let Some(list) = lookup("FARMACIA_WALLET_EXCLUDED_CATEGORIES") {
            let categories: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
            debug!(?categories, "Overriding wallet-excluded categories from env");
            self.pricing.wallet_excluded_categories = categories;
        }

        if let Some(pretty) = lookup("FARMACIA_PRETTY") {
            self.output.pretty = matches!(pretty.trim(), "1" | "true" | "yes");
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        self.pricing.validate()?;
        Ok(())
    }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable override");
            None
        }
    }
}

/// `pricing.toml` inside the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("mx", "farmacia", "pos")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
