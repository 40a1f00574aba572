//! Command-line interface parsing for marsweather
//!
//! This module handles parsing of CLI arguments using clap and rendering of
//! sol records for terminal output.

use clap::Parser;
use thiserror::Error;

use crate::data::{Measurement, Sol};
use crate::units::{Unit, UnitConfig, UnitError};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A unit flag named an unsupported unit
    #[error(transparent)]
    InvalidUnit(#[from] UnitError),

    /// The sol argument is not a sol number
    #[error("Invalid sol: '{0}'. Sols are non-negative integers, e.g. 259")]
    InvalidSol(String),
}

/// Mars InSight lander weather in the units you choose
#[derive(Parser, Debug)]
#[command(name = "marsweather")]
#[command(about = "Mars InSight lander weather in the units you choose")]
#[command(version)]
pub struct Cli {
    /// Temperature unit: C, K, F, R
    #[arg(short, long, value_name = "UNIT")]
    pub temperature: Option<String>,

    /// Pressure unit: Pa, kPa, MPa, hPa, bar, torr, psi, ksi
    #[arg(short, long, value_name = "UNIT")]
    pub pressure: Option<String>,

    /// Wind speed unit: m/s, km/h, m/h, knot, ft/s
    #[arg(short, long, value_name = "UNIT")]
    pub wind: Option<String>,

    /// Show this sol instead of the latest one
    #[arg(long, value_name = "SOL", conflicts_with = "raw")]
    pub sol: Option<String>,

    /// Print the whole converted report as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the unconverted report as JSON
    #[arg(long, conflicts_with = "json")]
    pub raw: bool,
}

/// What the binary prints after a successful request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable summary of one sol
    #[default]
    Summary,
    /// Converted report as JSON
    Json,
    /// Raw report as JSON
    Raw,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Units to convert into
    pub units: UnitConfig,
    /// Sol to show; latest when `None`
    pub sol: Option<String>,
    /// Output format
    pub output: OutputMode,
}

/// Parses a sol argument, accepting decimal integers only.
///
/// # Returns
/// * `Ok(String)` with surrounding whitespace removed
/// * `Err(CliError::InvalidSol)` if the argument is not a decimal integer
pub fn parse_sol_arg(s: &str) -> Result<String, CliError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(CliError::InvalidSol(s.to_string()));
    }
    Ok(trimmed.to_string())
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// All validation happens here, before any network access.
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with appropriate settings
    /// * `Err(CliError)` if a unit or sol argument is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let units = UnitConfig::from_names(
            cli.temperature.as_deref(),
            cli.pressure.as_deref(),
            cli.wind.as_deref(),
        )?;

        let sol = cli.sol.as_deref().map(parse_sol_arg).transpose()?;

        let output = if cli.raw {
            OutputMode::Raw
        } else if cli.json {
            OutputMode::Json
        } else {
            OutputMode::Summary
        };

        Ok(RunConfig { units, sol, output })
    }
}

/// Renders one sol as a short multi-line summary
pub fn format_sol(key: &str, sol: &Sol, units: &UnitConfig) -> String {
    let mut lines = Vec::new();

    let mut header = format!("Sol {}", key);
    if let Some(season) = sol.season() {
        header.push_str(&format!(" ({})", season));
    }
    if let (Some(first), Some(last)) = (sol.first_utc(), sol.last_utc()) {
        header.push_str(&format!(
            "  {} .. {}",
            first.format("%Y-%m-%d %H:%M UTC"),
            last.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    lines.push(header);

    lines.push(format_measurement(
        "Air temperature",
        sol.air_temperature(),
        units.temperature.symbol(),
    ));
    lines.push(format_measurement(
        "Pressure",
        sol.pressure(),
        units.pressure.symbol(),
    ));
    lines.push(format_measurement(
        "Wind speed",
        sol.horizontal_wind_speed(),
        units.wind_speed.symbol(),
    ));

    lines.join("\n")
}

fn format_measurement(label: &str, measurement: Option<Measurement>, symbol: &str) -> String {
    let Some(m) = measurement else {
        return format!("  {:<16} no data", label);
    };
    let mut line = format!(
        "  {:<16} avg {} {}  min {} {}  max {} {}",
        label, m.av, symbol, m.mn, symbol, m.mx, symbol
    );
    if let Some(ct) = m.ct {
        line.push_str(&format!("  ({} samples)", ct));
    }
    line
}
