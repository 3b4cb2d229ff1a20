// textwash/src/cli.rs
//! This file defines the command-line interface (CLI) for the textwash
//! application, including all available commands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "textwash",
    author = "Textwash Team",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sanitize and validate untrusted text",
    long_about = "Textwash is a command-line front end for the textwash sanitization engine. It executes one engine operation (validation, HTML/XML cleanup, security filtering, masking, encoding, policy enforcement, or batching) against content read from an argument, a file, or stdin, and prints the resulting JSON envelope.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG for this run)
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `textwash` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Executes one engine operation and prints the result envelope.
    #[command(about = "Executes one engine operation and prints the JSON result envelope.")]
    Run(RunCommand),

    /// Lists every operation the engine can execute.
    #[command(about = "Lists every operation in the engine catalogue.")]
    Operations,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunCommand {
    /// The operation to execute (see `textwash operations`).
    #[arg(value_name = "OPERATION", help = "The operation to execute (see 'textwash operations').")]
    pub operation: String,

    /// Content to process (reads from stdin if neither this nor --input-file is given).
    #[arg(long, short = 'c', value_name = "TEXT", help = "Content to process; stdin is used when omitted.")]
    pub content: Option<String>,

    /// Path to an input file whose contents become the `content` parameter.
    #[arg(long, short = 'i', value_name = "FILE", conflicts_with = "content", help = "Read content from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Additional operation parameters as a JSON object.
    #[arg(long, short = 'p', value_name = "JSON", help = "Additional operation parameters as a JSON object, e.g. '{\"pattern\": \"x\"}'.")]
    pub params: Option<String>,

    /// Path to a custom engine configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom engine configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON envelope.
    #[arg(long, help = "Pretty-print the JSON envelope.")]
    pub pretty: bool,
}
