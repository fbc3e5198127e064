//! plist2json
//!
//! Reads an Apple XML property list and prints it as JSON.

mod config;

use std::fs;
use std::io::{self, Read, Write};

use anyhow::Context;
use clap::Parser;
use config::CliConfig;
use darwin_plist::json::to_json_value;
use darwin_plist::xml::value_from_slice_with_options;
use tracing::{debug, info};

/// Installs a stderr subscriber; `RUST_LOG` overrides `level`.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("darwin_plist={},plist2json={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn read_input(config: &CliConfig) -> anyhow::Result<Vec<u8>> {
    match config.input_path() {
        Some(path) => {
            debug!(path = %path.display(), "Reading property list");
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            debug!("Reading property list from stdin");
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let data = read_input(&config)?;
    let source = config
        .input_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    let value = value_from_slice_with_options(&data, &config.decode_options())
        .with_context(|| format!("Failed to decode {}", source))?;
    info!(root = %value.kind(), bytes = data.len(), "Decoded property list");

    let json = to_json_value(&value);
    let mut out = io::stdout().lock();
    if config.compact {
        serde_json::to_writer(&mut out, &json)?;
    } else {
        serde_json::to_writer_pretty(&mut out, &json)?;
    }
    writeln!(out)?;

    Ok(())
}
