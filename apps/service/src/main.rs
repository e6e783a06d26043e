#![warn(clippy::all, clippy::pedantic)]

use std::process::ExitCode;

use availability::{HttpProber, Monitor, Settings, load_targets};
use clap::Parser;
use tracing::{error, info};

mod cli;
mod error;

use cli::Cli;
use error::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    if cli.init_settings {
        let path = Settings::init_config(cli.settings.as_ref())?;
        info!("Settings written to {}", path.display());
        return Ok(());
    }

    // Targets first, so a fatal startup never touches the settings path
    let targets = load_targets(&cli.targets)?;
    info!("Loaded {} targets from {}", targets.len(), cli.targets.display());

    let settings = Settings::from_config(cli.settings.as_ref())?;
    info!("{settings}");

    let prober = HttpProber::new(settings.polling.timeout(), &settings.polling.user_agent)
        .map_err(AppError::Client)?;

    let mut monitor = Monitor::new(targets, prober, settings);
    monitor.run(cli.rounds, &mut std::io::stdout()).await;

    Ok(())
}
