//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds the state a command handler needs: the
//! resolved configuration, the `.quotekit` directory (when one exists),
//! and global flags.

use std::env;
use std::path::PathBuf;

use quotekit_config::{self as config, QuotekitConfig};

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Loaded configuration (defaults when no config file exists).
    pub config: QuotekitConfig,

    /// Resolved `.quotekit` directory, when one was discovered.
    pub quotekit_dir: Option<PathBuf>,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Builds a context from parsed global arguments.
    ///
    /// The `.quotekit` directory is discovered by walking up from the
    /// current directory. Config read failures fall back to defaults
    /// rather than blocking a price computation.
    pub fn from_global_args(global: &GlobalArgs) -> Self {
        let quotekit_dir = env::current_dir()
            .ok()
            .and_then(|cwd| config::find_quotekit_dir(&cwd));
        let cfg = quotekit_dir
            .as_deref()
            .and_then(|dir| config::load_config(dir).ok())
            .unwrap_or_default();

        let json = global.json || cfg.json;

        Self {
            config: cfg,
            quotekit_dir,
            json,
            verbose: global.verbose,
            quiet: global.quiet,
        }
    }
}
