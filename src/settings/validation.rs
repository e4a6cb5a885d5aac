//! Validation rules shared by every settings section.
//!
//! Each check takes the dotted field path so the resulting error points at
//! the exact input that was rejected.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::{Result, SimxError};

/// Offset between degrees Celsius and Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").expect("date pattern is a valid regex")
});

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$").expect("time pattern is a valid regex")
});

/// Rejects negative or non-finite values.
pub fn require_non_negative(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimxError::invalid_value(
            field,
            format!("must be a non-negative number, got {value}"),
        ));
    }
    Ok(value)
}

/// Rejects negative counts and converts to the unsigned wire type.
pub fn require_non_negative_int(field: &'static str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        SimxError::invalid_value(
            field,
            format!("must be a non-negative integer, got {value}"),
        )
    })
}

/// Accepts values in `[0, 100]`.
pub fn require_percentage(field: &'static str, value: f64) -> Result<f64> {
    require_in_range(field, value, 0.0, 100.0)
}

/// Accepts values in the closed interval `[min, max]`.
pub fn require_in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if !(min..=max).contains(&value) {
        return Err(SimxError::invalid_value(
            field,
            format!("must be in [{min}, {max}], got {value}"),
        ));
    }
    Ok(value)
}

/// Accepts compass angles in `[0, 360)`.
pub fn require_angle(field: &'static str, value: f64) -> Result<f64> {
    if !(0.0..360.0).contains(&value) {
        return Err(SimxError::invalid_value(
            field,
            format!("must be in [0, 360), got {value}"),
        ));
    }
    Ok(value)
}

/// Accepts `DD.MM.YYYY` text naming a real calendar day.
pub fn require_date(field: &'static str, value: &str) -> Result<String> {
    if !DATE_PATTERN.is_match(value) || NaiveDate::parse_from_str(value, "%d.%m.%Y").is_err() {
        return Err(SimxError::invalid_value(
            field,
            format!("format must be DD.MM.YYYY, got \"{value}\""),
        ));
    }
    Ok(value.to_string())
}

/// Accepts `HH:MM:SS` text naming a valid clock time.
pub fn require_time(field: &'static str, value: &str) -> Result<String> {
    if !TIME_PATTERN.is_match(value) || NaiveTime::parse_from_str(value, "%H:%M:%S").is_err() {
        return Err(SimxError::invalid_value(
            field,
            format!("format must be HH:MM:SS, got \"{value}\""),
        ));
    }
    Ok(value.to_string())
}

/// Converts degrees Celsius to Kelvin.
pub fn to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Converts a finite Celsius reading to Kelvin.
pub fn require_temperature(field: &'static str, celsius: f64) -> Result<f64> {
    if !celsius.is_finite() {
        return Err(SimxError::invalid_value(
            field,
            format!("must be a finite temperature, got {celsius}"),
        ));
    }
    Ok(to_kelvin(celsius))
}
