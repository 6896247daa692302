use std::{io::IsTerminal, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use solar_monitor::app::{self, config::AppConfig};

#[derive(Debug, Parser)]
#[command(name = "solar-monitor")]
#[command(about = "Terminal dashboard for solar inverter telemetry")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, default_value = AppConfig::DEFAULT_PATH)]
    config: PathBuf,
    /// Validate the configuration and exit without drawing the dashboard
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::new(&args.config)
        .with_context(|| format!("invalid configuration in {}", args.config.display()))?;

    let level = if config.debug { LevelFilter::Debug } else { LevelFilter::Warn };
    // The `stderr` feature keeps records off stdout, which the dashboard draws on.
    SimpleLogger::new()
        .with_level(level)
        .with_module_level("hyper", LevelFilter::Warn)
        .with_module_level("rustls", LevelFilter::Warn)
        .init()
        .context("failed to install logger")?;

    let mut app = app::App::new(config);
    if args.check {
        info!("Configuration {} is valid", args.config.display());
        println!("configuration OK");
        return Ok(());
    }

    // stderr shares the screen with the dashboard unless it is redirected.
    if std::io::stderr().is_terminal() {
        log::set_max_level(LevelFilter::Off);
    }
    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();
    log::set_max_level(level);
    Ok(result?)
}
