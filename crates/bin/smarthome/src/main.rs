//! # smarthome: operator console
//!
//! Composition root that wires the home service to a line-oriented console
//! on stdin/stdout.
//!
//! ## Responsibilities
//! - Parse configuration (`--config` flag, env vars, config file)
//! - Initialize logging on stderr
//! - Construct the home service with the system clock and the tariff
//! - Run the console session until `quit` or end of input
//!
//! ## Dependency rule
//! This is the **only** crate that depends on every other crate.
//! It is the wiring layer; no domain logic belongs here.

mod access;
mod command;
mod config;
mod console;
mod render;
mod session;

use std::path::PathBuf;

use smarthome_app::ports::SystemClock;
use smarthome_app::services::home_service::HomeService;
use smarthome_domain::tariff::Tariff;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::access::AccessGate;
use crate::config::Config;
use crate::console::Console;
use crate::session::SessionOptions;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(config_path()?.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        rate = config.tariff.rate_per_kwh,
        realtime = config.simulation.realtime,
        format = ?config.output.format,
        "configuration loaded"
    );

    let tariff = Tariff::new(config.tariff.rate_per_kwh, config.tariff.currency.clone())?;
    let service = HomeService::new(SystemClock, tariff);
    let gate = AccessGate::new(config.access.password.clone(), config.access.max_attempts);
    let mut console = Console::new(service, gate, config.output.format);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(session::run(
        &mut console,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        SessionOptions::from(&config.simulation),
    ));
    // A pending stdin read sits on a blocking thread; don't wait for it.
    runtime.shutdown_background();
    result?;

    Ok(())
}

/// Value of `--config <path>` or `--config=<path>`, if given.
fn config_path() -> Result<Option<PathBuf>, String> {
    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        None => return Ok(None),
        Some(arg) if arg == "--config" => args.next().ok_or("--config requires a path")?,
        Some(arg) => match arg.strip_prefix("--config=") {
            Some(path) => path.to_string(),
            None => return Err(format!("unknown argument {arg:?}")),
        },
    };
    if let Some(extra) = args.next() {
        return Err(format!("unexpected argument {extra:?}"));
    }
    Ok(Some(PathBuf::from(path)))
}
