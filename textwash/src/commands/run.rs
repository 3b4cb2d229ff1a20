//! Run command implementation: executes one engine operation and prints
//! the resulting envelope.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde_json::{Map, Value};
use std::io::Read;
use std::path::PathBuf;

use textwash_core::{merge_config, EngineConfig, Envelope, Processor};

use crate::cli::RunCommand;

/// Executes the `run` subcommand. Returns the envelope so the caller can
/// derive the process exit code from its status.
pub fn run_operation(opts: &RunCommand) -> Result<Envelope> {
    info!("Starting textwash operation '{}'.", opts.operation);

    let processor = build_processor(opts.config.clone())?;
    let parameters = build_parameters(opts)?;
    let envelope = processor.execute(&opts.operation, &parameters);

    debug!(
        "Operation '{}' finished with status {:?} in {:.6}s.",
        envelope.operation, envelope.status, envelope.processing_time_seconds
    );
    Ok(envelope)
}

/// Builds the processor from the default configuration, a user file given
/// on the command line, or the well-known per-user config path.
fn build_processor(config_path: Option<PathBuf>) -> Result<Processor> {
    let default_config = EngineConfig::load_default().context("Failed to load default configuration")?;

    let user_config = match config_path.or_else(default_user_config_path) {
        Some(path) if path.exists() => Some(
            EngineConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        ),
        Some(path) => {
            // An explicit --config pointing nowhere is an error; the
            // discovered default path is allowed to be absent.
            bail!("Configuration file {} does not exist", path.display());
        }
        None => None,
    };

    Ok(Processor::with_config(merge_config(default_config, user_config)))
}

fn default_user_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("textwash").join("config.yaml");
    path.exists().then_some(path)
}

/// Assembles the parameter object: `--params` JSON first, then the content
/// from `--content`, `--input-file`, or stdin.
fn build_parameters(opts: &RunCommand) -> Result<Value> {
    let mut params: Map<String, Value> = match &opts.params {
        Some(raw) => match serde_json::from_str(raw).context("Failed to parse --params as JSON")? {
            Value::Object(map) => map,
            _ => bail!("--params must be a JSON object"),
        },
        None => Map::new(),
    };

    // batch_sanitize carries its input in `items`; everything else takes a
    // single content string.
    if !params.contains_key("content") && !params.contains_key("items") {
        let content = read_content(opts)?;
        params.insert("content".to_string(), Value::String(content));
    }

    Ok(Value::Object(params))
}

fn read_content(opts: &RunCommand) -> Result<String> {
    if let Some(content) = &opts.content {
        return Ok(content.clone());
    }
    if let Some(path) = &opts.input_file {
        info!("Reading input from file: {}", path.display());
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()));
    }

    info!("Reading input from stdin...");
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    // Strip the trailing newline a shell pipe usually appends.
    if buffer.ends_with('\n') {
        buffer.pop();
        if buffer.ends_with('\r') {
            buffer.pop();
        }
    }
    Ok(buffer)
}

/// Serializes an envelope for stdout.
pub fn render_envelope(envelope: &Envelope, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(envelope)
    } else {
        serde_json::to_string(envelope)
    };
    rendered.context("Failed to serialize envelope")
}
