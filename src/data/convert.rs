//! Conversion of reports from feed units into configured units

use serde_json::Value;
use thiserror::Error;

use super::{Report, Sol, AIR_TEMPERATURE, HORIZONTAL_WIND_SPEED, PRESSURE};
use crate::units::{Unit, UnitConfig};

/// Decimal places kept on converted values
const CONVERTED_DECIMALS: i32 = 3;

/// Statistics rewritten in every converted measurement block
const CONVERTED_STATS: [&str; 3] = ["av", "mn", "mx"];

/// A measurement that has to be converted is missing a numeric statistic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sol {sol}: {block}.{stat} is not a number")]
pub struct ConversionError {
    /// Sol key of the offending record
    pub sol: String,
    /// Measurement block ("AT", "PRE" or "HWS")
    pub block: &'static str,
    /// Statistic that could not be read
    pub stat: &'static str,
}

/// Produces a converted copy of `raw`, leaving `raw` untouched.
///
/// For every listed sol, the AT, PRE and HWS `av`/`mn`/`mx` values are
/// converted from C, Pa and m/s into `units` and rounded to three decimals.
/// Quantities whose configured unit is the feed unit are copied as-is,
/// without rounding or validation. Everything else is copied unchanged.
///
/// Fails if a block that has to be converted lacks one of the three
/// statistics or holds a non-number there. A sol without the block at all is
/// left without it.
pub fn convert_report(raw: &Report, units: &UnitConfig) -> Result<Report, ConversionError> {
    let mut converted = raw.clone();
    if units.is_identity() {
        return Ok(converted);
    }

    for key in raw.sol_keys() {
        if let Some(sol) = converted.sol_mut(key) {
            convert_sol(key, sol, units)?;
        }
    }

    Ok(converted)
}

fn convert_sol(key: &str, sol: &mut Sol, units: &UnitConfig) -> Result<(), ConversionError> {
    convert_block(key, sol, AIR_TEMPERATURE, units.temperature)?;
    convert_block(key, sol, PRESSURE, units.pressure)?;
    convert_block(key, sol, HORIZONTAL_WIND_SPEED, units.wind_speed)
}

fn convert_block<U: Unit>(
    key: &str,
    sol: &mut Sol,
    block: &'static str,
    unit: U,
) -> Result<(), ConversionError> {
    if unit.is_source() {
        return Ok(());
    }
    let Some(measurement) = sol.field_mut(block) else {
        return Ok(());
    };

    for stat in CONVERTED_STATS {
        let value = measurement
            .get_mut(stat)
            .filter(|value| value.is_number())
            .ok_or_else(|| ConversionError {
                sol: key.to_string(),
                block,
                stat,
            })?;
        if let Some(source) = value.as_f64() {
            *value = Value::from(round_half_away(unit.convert(source), CONVERTED_DECIMALS));
        }
    }

    Ok(())
}

/// Rounds `value` to `decimals` places, with ties going away from zero.
///
/// The decimal shift is done on the textual exponent rather than by
/// multiplying, so that values such as `1.0005` round to `1.001` instead of
/// falling victim to `1.0005 * 1000.0 == 1000.4999...`.
pub fn round_half_away(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    shift_exponent(shift_exponent(value, decimals).round(), -decimals)
}

/// Computes `value * 10^by` by rewriting the exponent of its shortest decimal form
///
/// `value` must be finite. `{:e}` then always yields `<mantissa>e<exp>`, and
/// shifting that exponent can at worst overflow to infinity or underflow to
/// zero, both of which parse. Anything unparseable returns `value` unchanged.
fn shift_exponent(value: f64, by: i32) -> f64 {
    let repr = format!("{:e}", value);
    repr.split_once('e')
        .and_then(|(mantissa, exp)| {
            let exp: i32 = exp.parse().ok()?;
            format!("{}e{}", mantissa, exp + by).parse().ok()
        })
        .unwrap_or(value)
}
