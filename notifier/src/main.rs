use anyhow::Context;
use clap::Parser;
use icaocore::timing::Cadence;
use log::info;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::NotifierConfig;
use workflow::runner::Runner;

mod enrich;
mod sink;
mod source;
mod workflow;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Alerts on military, interesting or watched aircraft inside a geofence"
)]
struct Args {
    /// Notifier config in YAML
    #[arg(long)]
    config: PathBuf,
    /// Geofence center latitude, overrides the config
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Geofence center longitude, overrides the config
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Geofence radius in km, overrides the config
    #[arg(long)]
    radius: Option<f64>,
    /// Run a single poll cycle and exit
    #[arg(long, default_value_t = false)]
    once: bool,
    /// Log notifications instead of sending them
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = NotifierConfig::load(&args.config)?;
    config.override_geofence(args.lat, args.lon, args.radius);

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime")?;
    runtime.block_on(poll(config, args.once, args.dry_run))
}

/// Runs cycles on a fixed cadence until Ctrl+C, or once with `--once`.
async fn poll(config: NotifierConfig, once: bool, dry_run: bool) -> anyhow::Result<()> {
    let mut runner = Runner::from_config(&config, dry_run)?;
    let cadence = Cadence::new(config.timing.refresh());
    info!(
        "polling {} every {:?} around ({}, {}) r={}km",
        config.feed.url,
        cadence.period(),
        config.feed.latitude,
        config.feed.longitude,
        config.feed.radius_km
    );

    runner.poll_until(cadence, once, signal::ctrl_c()).await
}
