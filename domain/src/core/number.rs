//! Integer fields that also accept whole-number floats such as `85.0`

use serde::de::Error;
use serde::{Deserialize, Deserializer};

/// Deserialize an integer, accepting a float only when it has no fractional part
pub(crate) fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(D::Error::custom(format!(
            "expected an integer, found {}",
            number
        ))),
    }
}
