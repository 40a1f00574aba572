//! marsweather - Mars InSight lander weather from the command line
//!
//! Fetches the InSight weather feed once and prints the latest sol (or a
//! chosen one) in the requested units.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use marsweather::cli::{format_sol, Cli, OutputMode, RunConfig};
use marsweather::{InsightClient, WeatherError};

/// Installs a stderr log subscriber filtered by `RUST_LOG` (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    let client = InsightClient::new(config.units);
    let report = client.request().await?;

    match config.output {
        OutputMode::Raw => {
            println!("{}", serde_json::to_string_pretty(&*client.raw_report()?)?);
        }
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&*report)?);
        }
        OutputMode::Summary => {
            let key = match config.sol {
                Some(key) => key,
                None => client.latest_sol_key()?,
            };
            let sol = report
                .sol(&key)
                .ok_or_else(|| WeatherError::UnknownSol(key.clone()))?;
            println!("{}", format_sol(&key, sol, client.units()));
        }
    }

    Ok(())
}
