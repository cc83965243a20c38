//! Clap CLI definitions for the `qk` command.
//!
//! This module defines the complete CLI structure using clap 4 derive
//! macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// qk -- instant-quote price calculator.
///
/// Computes prices from designer-configured quote formulas: typed input
/// variables, conditional visibility, and an arithmetic expression.
#[derive(Parser, Debug)]
#[command(
    name = "qk",
    about = "Instant-quote price calculator",
    long_about = "Computes prices from designer-configured quote formulas: typed input variables, conditional visibility, and an arithmetic expression over their values.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a price from a formula and raw inputs.
    #[command(alias = "quote")]
    Price(PriceArgs),

    /// Validate a formula definition and print the report.
    #[command(alias = "check")]
    Validate(ValidateArgs),

    /// List the insertable formula tokens for a formula.
    Tokens(TokensArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Formula name or path (searched in cwd, configured dirs,
    /// .quotekit/formulas/, ~/.quotekit/formulas/).
    pub formula: String,

    /// Raw input as key=value (repeatable). Values parse as JSON when
    /// possible (numbers, booleans, arrays) and fall back to plain strings.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// JSON file with a {variable_id: value} input snapshot.
    #[arg(long, value_name = "FILE")]
    pub inputs: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Formula name or path.
    pub formula: String,
}

#[derive(Args, Debug)]
pub struct TokensArgs {
    /// Formula name or path.
    pub formula: String,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}
