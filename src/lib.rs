//! Mars InSight weather client
//!
//! Fetches the InSight lander's weather report, converts it into caller-chosen
//! units, and caches it so that the feed is contacted at most once per hour.

pub mod cache;
pub mod cli;
pub mod data;
pub mod units;

pub use data::{ConversionError, InsightClient, Measurement, Report, Sol, WeatherError};
pub use units::{PressureUnit, SpeedUnit, TemperatureUnit, Unit, UnitConfig, UnitError};
