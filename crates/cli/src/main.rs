//! CLI tool to convert an alert node configuration into TICKscript.
//!
//! Usage: tickgen [--parent stream] [--emit tick|ast] <alert.json | ->

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tickgen::{convert_alert, serialize, AlertNode, Node};
use tracing_subscriber::EnvFilter;

/// Generate a TICKscript `|alert()` chain from a JSON alert configuration.
#[derive(Debug, Parser)]
#[command(name = "tickgen", version, about)]
struct Cli {
    /// Alert configuration file (JSON). Use `-` to read stdin.
    config: PathBuf,

    /// Identifier the alert is piped from.
    #[arg(long, default_value = "stream")]
    parent: String,

    /// Output form.
    #[arg(long, value_enum, default_value_t = Emit::Tick)]
    emit: Emit,

    /// Log conversion details to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// TICKscript source.
    Tick,
    /// The AST as pretty-printed JSON.
    Ast,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = read_config(&cli.config)?;
    let alert: AlertNode = serde_json::from_str(&source)
        .with_context(|| format!("invalid alert configuration in {}", cli.config.display()))?;
    tracing::debug!(handlers = alert.handlers().count(), "loaded alert configuration");

    let node = convert_alert(Node::identifier(cli.parent), &alert)
        .context("failed to convert alert")?;

    match cli.emit {
        Emit::Tick => print!("{}", serialize(&node)),
        Emit::Ast => {
            let json = serde_json::to_string_pretty(&node).context("failed to encode AST")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_config(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
