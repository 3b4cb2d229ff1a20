// textwash/src/main.rs
//! Textwash entry point.
//!
//! Parses the CLI, wires up logging, and hands off to the command
//! implementations. The process exits non-zero when the engine returns an
//! error envelope, so scripts can gate on sanitization outcomes.

use anyhow::Result;
use clap::Parser;
use log::info;

use textwash::cli::{Cli, Commands};
use textwash::commands::run::{render_envelope, run_operation};
use textwash::logger;
use textwash_core::OperationKind;

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.quiet {
        logger::init_logger(Some(log::LevelFilter::Off));
    } else if args.debug {
        logger::init_logger(Some(log::LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    info!("textwash started. Version: {}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Commands::Run(opts) => {
            let envelope = run_operation(&opts)?;
            println!("{}", render_envelope(&envelope, opts.pretty)?);
            if !envelope.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Operations => {
            for kind in OperationKind::ALL {
                println!("{kind}");
            }
        }
    }

    Ok(())
}
