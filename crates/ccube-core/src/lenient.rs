//! Tolerant deserializers for numeric record fields.
//!
//! Records are written by several tools. Counters may arrive as `null` or as
//! whole-number floats (`2.0`); both read as the integer they denote, with
//! `null` meaning 0.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
}

/// A counter: integer, whole-number float, or `null` (0).
///
/// # Errors
///
/// Fails on non-numeric values and on floats with a fractional part.
pub fn count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawNumber>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawNumber::Int(n)) => Ok(n),
        Some(RawNumber::Float(f)) if f.is_finite() && f.fract() == 0.0 => {
            // `as` saturates at the i64 bounds.
            Ok(f as i64)
        }
        Some(RawNumber::Float(f)) => Err(D::Error::custom(format!(
            "expected a whole number, got {f}"
        ))),
    }
}

/// A score: any number, or `null` (0.0).
///
/// # Errors
///
/// Fails on non-numeric values.
pub fn score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
