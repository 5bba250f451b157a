// src/input.rs
use chrono::NaiveDate;
use thiserror::Error;

use crate::sync::SyncError;

/// Rejected form submissions. The slice is left untouched in every case
/// except `Sync`, where the change was applied but could not be written.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Meal name cannot be empty.")]
    EmptyName,
    #[error("Calories cannot be empty.")]
    EmptyCalories,
    #[error("Calories must be a number, got '{0}'.")]
    InvalidCalories(String),
    #[error("Calories must be greater than zero, got {0}.")]
    NonPositiveCalories(f64),
    #[error("Date cannot be empty.")]
    EmptyDate,
    #[error("Date must be YYYY-MM-DD, got '{0}'.")]
    InvalidDate(String),
    #[error("Cannot log progress for a future date ({0}).")]
    FutureDate(NaiveDate),
    #[error("Value must be a number, got '{0}'.")]
    InvalidValue(String),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Parses an ISO `YYYY-MM-DD` date and rejects days after `today`.
/// # Errors
/// Returns `InputError::InvalidDate` or `InputError::FutureDate`.
pub fn parse_entry_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, InputError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| InputError::InvalidDate(raw.to_string()))?;
    if date > today {
        return Err(InputError::FutureDate(date));
    }
    Ok(date)
}

/// Parses a complete number, rejecting NaN and infinities.
pub fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lenient numeric field parse: the longest leading decimal prefix of `raw`
/// (after leading whitespace), or 0 when there is none.
/// `"12.5kg"` -> 12.5, `"abc"` -> 0, `""` -> 0.
pub fn parse_leading_number(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut last_good = 0;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                last_good = end + 1;
            }
            b'.' if !seen_dot => seen_dot = true,
            b'e' | b'E' if seen_digit => {
                // Exponent counts only if at least one digit follows it.
                let mut exp_end = end + 1;
                if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
                    exp_end += 1;
                }
                let digits = bytes[exp_end..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count();
                if digits > 0 {
                    last_good = exp_end + digits;
                }
                break;
            }
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return 0.0;
    }
    s[..last_good]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
