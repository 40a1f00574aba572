//! Integration tests for CLI argument handling
//!
//! Only paths that fail or exit before any network access are exercised here.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_marsweather"))
        .args(args)
        .output()
        .expect("Failed to execute marsweather")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("marsweather"), "Help should mention marsweather");
    assert!(stdout.contains("--temperature"), "Help should mention --temperature");
    assert!(stdout.contains("--pressure"), "Help should mention --pressure");
    assert!(stdout.contains("--wind"), "Help should mention --wind");
}

#[test]
fn test_invalid_temperature_unit_prints_error_and_exits() {
    let output = run_cli(&["--temperature", "t"]);
    assert!(!output.status.success(), "Expected invalid unit to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unsupported Temperature unit t, use one of: C, K, F, R"),
        "Should list accepted temperature units: {}",
        stderr
    );
}

#[test]
fn test_invalid_pressure_unit_prints_error_and_exits() {
    let output = run_cli(&["--pressure", "atm"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Pa, kPa, MPa, hPa, bar, torr, psi, ksi"),
        "Should list accepted pressure units: {}",
        stderr
    );
}

#[test]
fn test_invalid_wind_unit_prints_error_and_exits() {
    let output = run_cli(&["--wind", "mph"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("m/s, km/h, m/h, knot, ft/s"),
        "Should list accepted speed units: {}",
        stderr
    );
}

#[test]
fn test_invalid_sol_prints_error_and_exits() {
    let output = run_cli(&["--sol", "yesterday"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid sol"), "stderr: {}", stderr);
}

#[test]
fn test_raw_and_json_conflict() {
    let output = run_cli(&["--raw", "--json"]);
    assert!(!output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use marsweather::cli::{parse_sol_arg, Cli, OutputMode, RunConfig};
    use marsweather::{PressureUnit, SpeedUnit, TemperatureUnit, UnitConfig};

    #[test]
    fn test_cli_defaults_to_feed_units() {
        let cli = Cli::parse_from(["marsweather"]);
        let config = RunConfig::from_cli(&cli).unwrap();
        assert_eq!(config.units, UnitConfig::default());
        assert_eq!(config.output, OutputMode::Summary);
    }

    #[test]
    fn test_cli_all_units_valid() {
        let cli = Cli::parse_from([
            "marsweather",
            "--temperature",
            "K",
            "--pressure",
            "torr",
            "--wind",
            "knot",
        ]);
        let config = RunConfig::from_cli(&cli).unwrap();
        assert_eq!(config.units.temperature, TemperatureUnit::Kelvin);
        assert_eq!(config.units.pressure, PressureUnit::Torr);
        assert_eq!(config.units.wind_speed, SpeedUnit::Knot);
    }

    #[test]
    fn test_parse_sol_arg_returns_key() {
        assert_eq!(parse_sol_arg("300").unwrap(), "300");
    }

    #[test]
    fn test_parse_sol_arg_invalid_returns_error() {
        assert!(parse_sol_arg("sol-300").is_err());
    }
}
