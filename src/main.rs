mod cli;
mod config;
mod domain;
mod engine;
mod error;
mod logger;
mod time;
mod toggl;

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};

fn run() -> Result<()> {
    let days = cli::parse_day_offset(std::env::args_os())?;
    info!(
        days,
        "Copy all time entries at the day shifted {days} days from today to the next day"
    );

    let cfg = config::Config::from_env().context("loading configuration")?;
    info!(?cfg, "boot");

    let day = time::target_day(Utc::now(), days, &cfg.time_zone)?;
    let client = toggl::TogglClient::new(&cfg.api_base_url, &cfg.api_token)
        .context("building HTTP client")?;

    let summary = engine::Engine::new(client, cfg.dry_run)
        .copy_day(&day)
        .with_context(|| format!("copying {}", day.format(time::DAY_LABEL_FORMAT)))?;

    info!(
        found = summary.found,
        created = summary.created,
        dry_run = cfg.dry_run,
        "Copied all time entries"
    );
    Ok(())
}

fn main() -> ExitCode {
    // Load local .env if present
    let _ = dotenvy::dotenv();

    logger::init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
