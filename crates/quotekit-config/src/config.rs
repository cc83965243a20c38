//! Configuration types and loading for quotekit.
//!
//! The main entry point is [`QuotekitConfig`], which represents the contents
//! of `.quotekit/config.yaml`. Configuration is loaded with [`load_config`]
//! and saved with [`save_config`]; a missing or empty file yields defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

fn default_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u8 {
    2
}

/// Currency display settings for CLI output.
///
/// Prices are computed and stored in minor units; these settings only
/// affect how the CLI renders them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol prefixed to formatted prices.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Decimal places when converting minor units for display.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u8,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
        }
    }
}

/// Root configuration for quotekit (`.quotekit/config.yaml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotekitConfig {
    /// Extra directories searched for formula files, before the standard
    /// locations. Relative paths resolve against the working directory.
    #[serde(default)]
    pub formula_dirs: Vec<PathBuf>,

    /// Currency display settings.
    #[serde(default)]
    pub currency: CurrencyConfig,

    /// Default to JSON output without `--json`.
    #[serde(default)]
    pub json: bool,
}

/// Locates the `.quotekit` directory by walking up from `start`.
///
/// Returns `None` if no `.quotekit` directory is found.
pub fn find_quotekit_dir(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(".quotekit");
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Load configuration from `config.yaml` inside the given `.quotekit/`
/// directory.
///
/// If the file does not exist, a default [`QuotekitConfig`] is returned.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file exists but cannot be read, or
/// [`ConfigError::Parse`] if it contains invalid YAML.
pub fn load_config(quotekit_dir: &Path) -> Result<QuotekitConfig> {
    let config_path = quotekit_dir.join("config.yaml");

    if !config_path.exists() {
        return Ok(QuotekitConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)?;

    // An empty file is valid and yields default config.
    if content.trim().is_empty() {
        return Ok(QuotekitConfig::default());
    }

    let config: QuotekitConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to `config.yaml` inside the given `.quotekit/`
/// directory. The directory is created if it does not exist.
pub fn save_config(quotekit_dir: &Path, config: &QuotekitConfig) -> Result<()> {
    std::fs::create_dir_all(quotekit_dir)?;

    let config_path = quotekit_dir.join("config.yaml");
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(config_path, yaml)?;
    Ok(())
}
