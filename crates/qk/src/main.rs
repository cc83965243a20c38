//! `qk` -- instant-quote price calculator CLI.
//!
//! This is the entry point for the quotekit command-line tool. It parses
//! CLI arguments with clap, resolves the runtime context (configuration
//! discovery), and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Build runtime context from global args
    let ctx = RuntimeContext::from_global_args(&cli.global);

    // Set up logging based on verbosity
    if ctx.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("qk=debug,quotekit_formula=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    // Dispatch to command handler
    let result = match cli.command {
        Commands::Price(args) => commands::price::run(&ctx, &args),
        Commands::Validate(args) => commands::validate::run(&ctx, &args),
        Commands::Tokens(args) => commands::tokens::run(&ctx, &args),
        Commands::Completions(args) => commands::completions::run(&args),
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
