//! Unit selection and conversion for InSight measurements
//!
//! The feed reports air temperature in Celsius, pressure in Pascals and wind
//! speed in meters per second. This module enumerates the units each quantity
//! can be converted into, validates user-supplied unit names, and performs the
//! arithmetic through `uom` quantities.

use std::fmt;

use thiserror::Error;
use uom::si::f64::{Pressure, ThermodynamicTemperature, Velocity};
use uom::si::{pressure, thermodynamic_temperature as temperature, velocity};

/// Errors raised while building a unit configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The unit name is not known for this quantity
    #[error("Unsupported {quantity} unit {value}, use one of: {accepted}")]
    Unsupported {
        /// Quantity label ("Temperature", "Pressure" or "Speed")
        quantity: &'static str,
        /// The rejected unit name
        value: String,
        /// Every accepted unit name, comma separated
        accepted: String,
    },
}

/// A unit of one physical quantity reported by the feed.
pub trait Unit: Copy + PartialEq + fmt::Debug + 'static {
    /// Label used in error messages
    const QUANTITY: &'static str;

    /// The unit the feed reports this quantity in
    const SOURCE: Self;

    /// Every supported unit, in enumeration order
    fn all() -> &'static [Self];

    /// Short unit name as accepted on input (e.g. "kPa")
    fn symbol(&self) -> &'static str;

    /// Converts a value expressed in [`Unit::SOURCE`] into this unit.
    fn convert(&self, value: f64) -> f64;

    /// Parses a unit name. Matching is exact, so "c" is not "C".
    fn parse(name: &str) -> Result<Self, UnitError> {
        Self::all()
            .iter()
            .copied()
            .find(|unit| unit.symbol() == name)
            .ok_or_else(|| UnitError::Unsupported {
                quantity: Self::QUANTITY,
                value: name.to_string(),
                accepted: Self::all()
                    .iter()
                    .map(|unit| unit.symbol())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Whether values in this unit are already in the feed's unit
    fn is_source(&self) -> bool {
        *self == Self::SOURCE
    }
}

/// Temperature units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Celsius,
    Kelvin,
    Fahrenheit,
    Rankine,
}

impl Unit for TemperatureUnit {
    const QUANTITY: &'static str = "Temperature";
    const SOURCE: Self = TemperatureUnit::Celsius;

    fn all() -> &'static [Self] {
        &[
            TemperatureUnit::Celsius,
            TemperatureUnit::Kelvin,
            TemperatureUnit::Fahrenheit,
            TemperatureUnit::Rankine,
        ]
    }

    fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Fahrenheit => "F",
            TemperatureUnit::Rankine => "R",
        }
    }

    fn convert(&self, value: f64) -> f64 {
        let t = ThermodynamicTemperature::new::<temperature::degree_celsius>(value);
        match self {
            TemperatureUnit::Celsius => t.get::<temperature::degree_celsius>(),
            TemperatureUnit::Kelvin => t.get::<temperature::kelvin>(),
            TemperatureUnit::Fahrenheit => t.get::<temperature::degree_fahrenheit>(),
            TemperatureUnit::Rankine => t.get::<temperature::degree_rankine>(),
        }
    }
}

/// Pressure units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressureUnit {
    Pascal,
    Kilopascal,
    Megapascal,
    Hectopascal,
    Bar,
    Torr,
    Psi,
    Ksi,
}

impl Unit for PressureUnit {
    const QUANTITY: &'static str = "Pressure";
    const SOURCE: Self = PressureUnit::Pascal;

    fn all() -> &'static [Self] {
        &[
            PressureUnit::Pascal,
            PressureUnit::Kilopascal,
            PressureUnit::Megapascal,
            PressureUnit::Hectopascal,
            PressureUnit::Bar,
            PressureUnit::Torr,
            PressureUnit::Psi,
            PressureUnit::Ksi,
        ]
    }

    fn symbol(&self) -> &'static str {
        match self {
            PressureUnit::Pascal => "Pa",
            PressureUnit::Kilopascal => "kPa",
            PressureUnit::Megapascal => "MPa",
            PressureUnit::Hectopascal => "hPa",
            PressureUnit::Bar => "bar",
            PressureUnit::Torr => "torr",
            PressureUnit::Psi => "psi",
            PressureUnit::Ksi => "ksi",
        }
    }

    fn convert(&self, value: f64) -> f64 {
        let p = Pressure::new::<pressure::pascal>(value);
        match self {
            PressureUnit::Pascal => p.get::<pressure::pascal>(),
            PressureUnit::Kilopascal => p.get::<pressure::kilopascal>(),
            PressureUnit::Megapascal => p.get::<pressure::megapascal>(),
            PressureUnit::Hectopascal => p.get::<pressure::hectopascal>(),
            PressureUnit::Bar => p.get::<pressure::bar>(),
            PressureUnit::Torr => p.get::<pressure::torr>(),
            PressureUnit::Psi => p.get::<pressure::pound_force_per_square_inch>(),
            PressureUnit::Ksi => p.get::<pressure::kip_per_square_inch>(),
        }
    }
}

/// Wind speed units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedUnit {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Knot,
    FeetPerSecond,
}

impl Unit for SpeedUnit {
    const QUANTITY: &'static str = "Speed";
    const SOURCE: Self = SpeedUnit::MetersPerSecond;

    fn all() -> &'static [Self] {
        &[
            SpeedUnit::MetersPerSecond,
            SpeedUnit::KilometersPerHour,
            SpeedUnit::MilesPerHour,
            SpeedUnit::Knot,
            SpeedUnit::FeetPerSecond,
        ]
    }

    fn symbol(&self) -> &'static str {
        match self {
            SpeedUnit::MetersPerSecond => "m/s",
            SpeedUnit::KilometersPerHour => "km/h",
            SpeedUnit::MilesPerHour => "m/h",
            SpeedUnit::Knot => "knot",
            SpeedUnit::FeetPerSecond => "ft/s",
        }
    }

    fn convert(&self, value: f64) -> f64 {
        let v = Velocity::new::<velocity::meter_per_second>(value);
        match self {
            SpeedUnit::MetersPerSecond => v.get::<velocity::meter_per_second>(),
            SpeedUnit::KilometersPerHour => v.get::<velocity::kilometer_per_hour>(),
            SpeedUnit::MilesPerHour => v.get::<velocity::mile_per_hour>(),
            SpeedUnit::Knot => v.get::<velocity::knot>(),
            SpeedUnit::FeetPerSecond => v.get::<velocity::foot_per_second>(),
        }
    }
}

/// Target units for converted reports
///
/// Fixed once the client is built. The default keeps every quantity in the
/// feed's own units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitConfig {
    /// Unit for `AT` values
    pub temperature: TemperatureUnit,
    /// Unit for `PRE` values
    pub pressure: PressureUnit,
    /// Unit for `HWS` values
    pub wind_speed: SpeedUnit,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            temperature: TemperatureUnit::SOURCE,
            pressure: PressureUnit::SOURCE,
            wind_speed: SpeedUnit::SOURCE,
        }
    }
}

impl UnitConfig {
    /// Creates a configuration from already-typed units
    pub fn new(temperature: TemperatureUnit, pressure: PressureUnit, wind_speed: SpeedUnit) -> Self {
        Self {
            temperature,
            pressure,
            wind_speed,
        }
    }

    /// Builds a configuration from unit names, defaulting omitted ones.
    ///
    /// Names are checked in order temperature, pressure, wind speed, and the
    /// first unsupported one is reported.
    ///
    /// # Arguments
    /// * `temperature` - One of `C, K, F, R` (default `C`)
    /// * `pressure` - One of `Pa, kPa, MPa, hPa, bar, torr, psi, ksi` (default `Pa`)
    /// * `wind_speed` - One of `m/s, km/h, m/h, knot, ft/s` (default `m/s`)
    ///
    /// # Returns
    /// * `Ok(UnitConfig)` if every name is supported
    /// * `Err(UnitError::Unsupported)` naming the offending value and its alternatives
    pub fn from_names(
        temperature: Option<&str>,
        pressure: Option<&str>,
        wind_speed: Option<&str>,
    ) -> Result<Self, UnitError> {
        Ok(Self {
            temperature: parse_or_source(temperature)?,
            pressure: parse_or_source(pressure)?,
            wind_speed: parse_or_source(wind_speed)?,
        })
    }

    /// True when converted reports are identical to raw ones
    pub fn is_identity(&self) -> bool {
        self.temperature.is_source() && self.pressure.is_source() && self.wind_speed.is_source()
    }
}

impl fmt::Display for UnitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.temperature.symbol(),
            self.pressure.symbol(),
            self.wind_speed.symbol()
        )
    }
}

fn parse_or_source<U: Unit>(name: Option<&str>) -> Result<U, UnitError> {
    match name {
        Some(name) => U::parse(name),
        None => Ok(U::SOURCE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_default_config_is_feed_units() {
        let config = UnitConfig::default();
        assert_eq!(config.temperature, TemperatureUnit::Celsius);
        assert_eq!(config.pressure, PressureUnit::Pascal);
        assert_eq!(config.wind_speed, SpeedUnit::MetersPerSecond);
        assert!(config.is_identity());
    }

    #[test]
    fn test_from_names_all_omitted_matches_default() {
        let config = UnitConfig::from_names(None, None, None).unwrap();
        assert_eq!(config, UnitConfig::default());
    }

    #[test]
    fn test_from_names_accepts_every_listed_unit() {
        for t in TemperatureUnit::all() {
            for p in PressureUnit::all() {
                for s in SpeedUnit::all() {
                    let config =
                        UnitConfig::from_names(Some(t.symbol()), Some(p.symbol()), Some(s.symbol()))
                            .unwrap();
                    assert_eq!(config, UnitConfig::new(*t, *p, *s));
                }
            }
        }
    }

    #[test]
    fn test_unsupported_temperature_lists_alternatives() {
        let err = UnitConfig::from_names(Some("t"), None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported Temperature unit t, use one of: C, K, F, R"
        );
    }

    #[test]
    fn test_unsupported_pressure_lists_alternatives() {
        let err = UnitConfig::from_names(Some("C"), Some("t"), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported Pressure unit t, use one of: Pa, kPa, MPa, hPa, bar, torr, psi, ksi"
        );
    }

    #[test]
    fn test_unsupported_speed_lists_alternatives() {
        let err = UnitConfig::from_names(Some("C"), Some("Pa"), Some("t")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported Speed unit t, use one of: m/s, km/h, m/h, knot, ft/s"
        );
    }

    #[test]
    fn test_unit_names_are_case_sensitive() {
        assert!(TemperatureUnit::parse("c").is_err());
        assert!(PressureUnit::parse("PA").is_err());
        assert!(SpeedUnit::parse("KM/H").is_err());
    }

    #[test]
    fn test_temperature_conversions() {
        assert!(approx(TemperatureUnit::Celsius.convert(-63.5), -63.5));
        assert!(approx(TemperatureUnit::Kelvin.convert(0.0), 273.15));
        assert!(approx(TemperatureUnit::Fahrenheit.convert(100.0), 212.0));
        assert!(approx(TemperatureUnit::Fahrenheit.convert(-40.0), -40.0));
        assert!(approx(TemperatureUnit::Rankine.convert(0.0), 491.67));
    }

    #[test]
    fn test_pressure_conversions() {
        assert!(approx(PressureUnit::Pascal.convert(750.0), 750.0));
        assert!(approx(PressureUnit::Kilopascal.convert(750.0), 0.75));
        assert!(approx(PressureUnit::Hectopascal.convert(750.0), 7.5));
        assert!(approx(PressureUnit::Megapascal.convert(1.0e6), 1.0));
        assert!(approx(PressureUnit::Bar.convert(100_000.0), 1.0));
        assert!((PressureUnit::Torr.convert(750.0) - 5.6255).abs() < 1e-3);
        assert!((PressureUnit::Psi.convert(6894.757) - 1.0).abs() < 1e-6);
        assert!((PressureUnit::Ksi.convert(6_894_757.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_speed_conversions() {
        assert!(approx(SpeedUnit::MetersPerSecond.convert(4.5), 4.5));
        assert!(approx(SpeedUnit::KilometersPerHour.convert(10.0), 36.0));
        assert!((SpeedUnit::MilesPerHour.convert(10.0) - 22.369_362_9).abs() < 1e-6);
        assert!((SpeedUnit::Knot.convert(10.0) - 19.438_444_9).abs() < 1e-6);
        assert!((SpeedUnit::FeetPerSecond.convert(10.0) - 32.808_399).abs() < 1e-6);
    }

    #[test]
    fn test_display_lists_symbols() {
        let config = UnitConfig::new(
            TemperatureUnit::Fahrenheit,
            PressureUnit::Bar,
            SpeedUnit::KilometersPerHour,
        );
        assert_eq!(config.to_string(), "F, bar, km/h");
        assert!(!config.is_identity());
    }
}
