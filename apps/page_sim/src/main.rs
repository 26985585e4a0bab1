use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use page_core::{PageController, PageStructure};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod driver;

use config::load_settings;
use driver::{run_script, Pacing, ScriptedEvent};

/// Drive the page controller from a scripted event log and print every
/// render command as a JSON line.
#[derive(Parser, Debug)]
#[command(name = "page_sim")]
struct Args {
    /// Page structure (JSON).
    #[arg(long)]
    page: PathBuf,
    /// Event script (JSON array of `{at_ms, event}`).
    #[arg(long)]
    script: PathBuf,
    /// Sleep until each deadline instead of jumping the virtual clock.
    #[arg(long)]
    realtime: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Run page init twice.
    #[arg(long)]
    reinit: bool,
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid {what} '{}'", path.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let settings = load_settings(args.config.as_deref())?;
    let structure: PageStructure = read_json(&args.page, "page structure")?;
    let script: Vec<ScriptedEvent> = read_json(&args.script, "event script")?;

    let mut controller = PageController::new(structure, settings);
    let mut failures = controller.init();
    if args.reinit {
        failures.extend(controller.init());
    }
    info!(
        behaviors = controller.registered().count(),
        failures = failures.len(),
        "page initialized"
    );

    let pacing = if args.realtime {
        Pacing::Realtime
    } else {
        Pacing::Virtual
    };
    let mut stdout = io::stdout();
    let summary = run_script(&mut controller, script, pacing, |line| {
        let json = serde_json::to_string(&line)?;
        writeln!(stdout, "{json}").context("failed to write transcript")?;
        Ok(())
    })
    .await?;

    info!(
        dispatched = summary.dispatched,
        rejected = summary.rejected,
        commands = summary.commands,
        finished_at = %controller.now(),
        "script finished"
    );
    Ok(())
}
