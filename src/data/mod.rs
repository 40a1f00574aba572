//! Core data models for the InSight weather feed
//!
//! The feed is a flat JSON object: a `sol_keys` list, one record per listed
//! sol, and assorted metadata such as `validity_checks`. Only `sol_keys` gets a
//! concrete schema here. Sol records are kept as the JSON the feed sent, so
//! that re-serializing a report reproduces the feed.

pub mod convert;
pub mod insight;

pub use convert::{convert_report, round_half_away, ConversionError};
pub use insight::{InsightClient, WeatherError};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key of the air temperature block in a sol record (feed unit: Celsius)
pub const AIR_TEMPERATURE: &str = "AT";
/// Key of the pressure block in a sol record (feed unit: Pascals)
pub const PRESSURE: &str = "PRE";
/// Key of the horizontal wind speed block in a sol record (feed unit: m/s)
pub const HORIZONTAL_WIND_SPEED: &str = "HWS";

/// Summary statistics for one sensor over one sol
///
/// A read-only view of a measurement block. The block itself stays in the
/// sol record as the feed sent it, including any keys not listed here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Average value
    pub av: f64,
    /// Number of samples, when the feed reports it
    pub ct: Option<u64>,
    /// Minimum value
    pub mn: f64,
    /// Maximum value
    pub mx: f64,
}

impl Measurement {
    /// Reads `av`, `mn` and `mx` (and `ct` if present) from a block.
    ///
    /// Returns `None` unless the three statistics are all numbers.
    pub fn from_block(block: &Value) -> Option<Self> {
        Some(Self {
            av: block.get("av")?.as_f64()?,
            ct: block.get("ct").and_then(Value::as_u64),
            mn: block.get("mn")?.as_f64()?,
            mx: block.get("mx")?.as_f64()?,
        })
    }
}

/// Weather record for a single sol
///
/// Kept as the JSON object the feed sent. Sensor blocks are optional because
/// the lander did not report every sensor on every sol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sol {
    fields: Map<String, Value>,
}

impl Sol {
    /// Atmospheric temperature
    pub fn air_temperature(&self) -> Option<Measurement> {
        self.measurement(AIR_TEMPERATURE)
    }

    /// Atmospheric pressure
    pub fn pressure(&self) -> Option<Measurement> {
        self.measurement(PRESSURE)
    }

    /// Horizontal wind speed
    pub fn horizontal_wind_speed(&self) -> Option<Measurement> {
        self.measurement(HORIZONTAL_WIND_SPEED)
    }

    /// Statistics of the block stored under `key`
    pub fn measurement(&self, key: &str) -> Option<Measurement> {
        self.fields.get(key).and_then(Measurement::from_block)
    }

    /// Any field of the record (time range, season, wind direction...)
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Time of the first sample in this sol
    pub fn first_utc(&self) -> Option<DateTime<Utc>> {
        self.utc_field("First_UTC")
    }

    /// Time of the last sample in this sol
    pub fn last_utc(&self) -> Option<DateTime<Utc>> {
        self.utc_field("Last_UTC")
    }

    /// Martian season, e.g. "winter"
    pub fn season(&self) -> Option<&str> {
        self.field("Season").and_then(Value::as_str)
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    fn utc_field(&self, name: &str) -> Option<DateTime<Utc>> {
        let text = self.field(name)?.as_str()?;
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Wire shape used while decoding a report
#[derive(Deserialize)]
struct RawReport {
    sol_keys: Vec<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// A decoded InSight weather report
///
/// Serializes back into the feed's flat layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawReport")]
pub struct Report {
    sol_keys: Vec<String>,
    sols: BTreeMap<String, Sol>,
    extra: Map<String, Value>,
}

impl TryFrom<RawReport> for Report {
    type Error = String;

    fn try_from(raw: RawReport) -> Result<Self, Self::Error> {
        let RawReport { sol_keys, mut rest } = raw;
        let mut sols = BTreeMap::new();

        for key in &sol_keys {
            if sols.contains_key(key) {
                continue;
            }
            let value = rest
                .remove(key)
                .ok_or_else(|| format!("sol {} is listed in sol_keys but has no record", key))?;
            let sol: Sol = serde_json::from_value(value)
                .map_err(|e| format!("invalid record for sol {}: {}", key, e))?;
            sols.insert(key.clone(), sol);
        }

        Ok(Self {
            sol_keys,
            sols,
            extra: rest,
        })
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.sols.len() + self.extra.len()))?;
        map.serialize_entry("sol_keys", &self.sol_keys)?;
        for (key, sol) in &self.sols {
            map.serialize_entry(key, sol)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Report {
    /// Sol keys in the order the feed lists them (oldest first)
    pub fn sol_keys(&self) -> &[String] {
        &self.sol_keys
    }

    /// Number of distinct sols in the report
    pub fn sol_count(&self) -> usize {
        self.sols.len()
    }

    /// Record for one sol, if the report has it
    pub fn sol(&self, key: &str) -> Option<&Sol> {
        self.sols.get(key)
    }

    /// The most recent sol key, i.e. the last entry of [`Report::sol_keys`]
    pub fn latest_sol_key(&self) -> Option<&str> {
        self.sol_keys.last().map(String::as_str)
    }

    /// Record for [`Report::latest_sol_key`]
    pub fn latest_sol(&self) -> Option<&Sol> {
        self.latest_sol_key().and_then(|key| self.sol(key))
    }

    /// Iterates sols in `sol_keys` order
    pub fn sols(&self) -> impl Iterator<Item = (&str, &Sol)> {
        self.sol_keys
            .iter()
            .filter_map(move |key| self.sols.get(key).map(|sol| (key.as_str(), sol)))
    }

    /// A top-level field that is not a sol record, e.g. `validity_checks`
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    pub(crate) fn sol_mut(&mut self, key: &str) -> Option<&mut Sol> {
        self.sols.get_mut(key)
    }
}
