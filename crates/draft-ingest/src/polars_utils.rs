//! Polars AnyValue helpers.
//!
//! Source tables arrive with whatever dtypes Polars inferred, so every read
//! goes through these conversions rather than typed column accessors.

use std::borrow::Cow;

use polars::prelude::AnyValue;

/// A cell reduced to the handful of shapes the readers care about.
enum Scalar<'a> {
    Null,
    Int(i128),
    Float(f64),
    Bool(bool),
    Text(Cow<'a, str>),
    Other(String),
}

fn classify(value: AnyValue<'_>) -> Scalar<'_> {
    match value {
        AnyValue::Null => Scalar::Null,
        AnyValue::Int8(v) => Scalar::Int(v.into()),
        AnyValue::Int16(v) => Scalar::Int(v.into()),
        AnyValue::Int32(v) => Scalar::Int(v.into()),
        AnyValue::Int64(v) => Scalar::Int(v.into()),
        AnyValue::UInt8(v) => Scalar::Int(v.into()),
        AnyValue::UInt16(v) => Scalar::Int(v.into()),
        AnyValue::UInt32(v) => Scalar::Int(v.into()),
        AnyValue::UInt64(v) => Scalar::Int(v.into()),
        AnyValue::Float32(v) => Scalar::Float(v.into()),
        AnyValue::Float64(v) => Scalar::Float(v),
        AnyValue::Boolean(b) => Scalar::Bool(b),
        AnyValue::String(s) => Scalar::Text(Cow::Borrowed(s)),
        AnyValue::StringOwned(s) => Scalar::Text(Cow::Owned(s.to_string())),
        other => Scalar::Other(other.to_string()),
    }
}

/// Cell text; empty for null. Floats print without trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match classify(value) {
        Scalar::Null => String::new(),
        Scalar::Int(v) => v.to_string(),
        Scalar::Float(v) => format_numeric(v),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Text(s) => s.into_owned(),
        Scalar::Other(s) => s,
    }
}

/// Trimmed cell text, or `None` when blank.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let text = any_to_string(value);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `4.50` prints as `4.5`, `100.0` as `100`.
pub fn format_numeric(v: f64) -> String {
    let text = v.to_string();
    match text.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => text,
    }
}

/// Finite numeric value of a cell. Numeric text is parsed.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match classify(value) {
        Scalar::Int(v) => Some(v as f64),
        Scalar::Float(v) => Some(v).filter(|v| v.is_finite()),
        Scalar::Text(s) => parse_f64(&s),
        Scalar::Null | Scalar::Bool(_) | Scalar::Other(_) => None,
    }
}

/// Integer value of a cell. Integral floats such as `12.0` count.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match classify(value) {
        Scalar::Int(v) => i64::try_from(v).ok(),
        Scalar::Float(v) => float_to_i64(v),
        Scalar::Text(s) => parse_i64(&s),
        Scalar::Null | Scalar::Bool(_) | Scalar::Other(_) => None,
    }
}

pub fn parse_f64(value: &str) -> Option<f64> {
    match value.trim() {
        "" => None,
        text => text.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Parses an integer, accepting integral floats like `12.0`.
pub fn parse_i64(value: &str) -> Option<i64> {
    match value.trim() {
        "" => None,
        text => text
            .parse::<i64>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().and_then(float_to_i64)),
    }
}

/// Yes/no style flags. Empty means false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "true" | "t"
    )
}

fn float_to_i64(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e18).then_some(v as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_parsing_handles_blanks_and_floats() {
        assert_eq!(parse_f64(" 4.41 "), Some(4.41));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_i64("12.0"), Some(12));
        assert_eq!(parse_i64("12.5"), None);
    }

    #[test]
    fn format_numeric_trims_zeros_only_after_decimal_point() {
        assert_eq!(format_numeric(4.50), "4.5");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(1e21), "1000000000000000000000");
    }

    #[test]
    fn flags() {
        assert!(parse_flag("Y"));
        assert!(parse_flag("true"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn any_value_conversions() {
        assert_eq!(any_to_f64(AnyValue::Int64(7)), Some(7.0));
        assert_eq!(any_to_f64(AnyValue::String("7.5")), Some(7.5));
        assert_eq!(any_to_f64(AnyValue::Float64(f64::NAN)), None);
        assert_eq!(any_to_i64(AnyValue::Float64(3.0)), Some(3));
        assert_eq!(any_to_i64(AnyValue::UInt64(u64::MAX)), None);
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string_non_empty(AnyValue::String("  ")), None);
    }
}
