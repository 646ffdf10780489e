use croissant::cli::{self, Invocation};
use croissant::error::AppError;
use croissant::logger::initialize as LoggerInitialize;

use croissant_core::{DispatchConfig, Dispatcher, NoBridgeHost};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Usage { message, .. }) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let invocation = cli::parse(std::env::args().skip(1))?;

    let config_dir = DispatchConfig::default_dir()?;
    create_dir_all(&config_dir).map_err(|e| AppError::App {
        message: format!("Failed to create {}: {e}", config_dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Logger first, so config loading is logged.
    LoggerInitialize(&config_dir)?;
    info!("Croissant console starting");

    let mut config = DispatchConfig::load(&config_dir)?;
    config.apply_env_overrides()?;

    let dispatcher = Dispatcher::new(&config, &cli::host_signals(), Arc::new(NoBridgeHost))?;

    if !matches!(invocation, Invocation::Health) {
        let environment = dispatcher.wait_until_settled().await;
        info!("Serving commands as {environment:?}");
    }
    if let Some(advisory) = dispatcher.take_advisory() {
        warn!("{advisory}");
        eprintln!("{advisory}");
    }

    let output = cli::execute(&dispatcher, &invocation).await?;
    let rendered = serde_json::to_string_pretty(&output).map_err(|e| AppError::App {
        message: format!("Failed to render result: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    println!("{rendered}");

    Ok(())
}
