//! Configuration management for the quotekit pricing system.

mod config;

pub use config::{
    ConfigError, CurrencyConfig, QuotekitConfig, Result, find_quotekit_dir, load_config,
    save_config,
};
