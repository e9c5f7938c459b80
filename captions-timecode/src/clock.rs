//! Millisecond clock strings (`HH:MM:SS.mmm`) used by text caption formats.

use crate::error::{Result, TimecodeError};

/// Format microseconds as `HH:MM:SS.mmm`, with `separator` in place of the
/// decimal point (SRT uses `,`).
///
/// Sub-millisecond precision is truncated. Hours are not wrapped.
#[must_use]
pub fn format_clock(microseconds: u64, separator: char) -> String {
    let millis = microseconds / 1000;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        millis / 3_600_000,
        (millis % 3_600_000) / 60_000,
        (millis % 60_000) / 1000,
        separator,
        millis % 1000
    )
}

/// Parse `[HH:]MM:SS[.mmm]` into microseconds.
///
/// Either `.` or `,` may separate the fraction. A short fraction is read as a
/// decimal (`.5` is 500 ms).
pub fn parse_clock(s: &str) -> Result<u64> {
    let s = s.trim();
    let parts: Vec<&str> = s.split(':').collect();

    let (hours, minutes, rest) = match parts.as_slice() {
        [h, m, rest] => (parse_field(h, "hours", s)?, parse_field(m, "minutes", s)?, *rest),
        [m, rest] => (0, parse_field(m, "minutes", s)?, *rest),
        _ => {
            return Err(TimecodeError::invalid_format(format!(
                "expected HH:MM:SS.mmm, got '{}'",
                s
            )))
        }
    };

    let (seconds, fraction) = match rest.split_once(['.', ',']) {
        Some((seconds, fraction)) => (seconds, fraction),
        None => (rest, ""),
    };
    let seconds = parse_field(seconds, "seconds", s)?;

    if minutes > 59 {
        return Err(TimecodeError::invalid_component("minutes", minutes, 59));
    }
    if seconds > 59 {
        return Err(TimecodeError::invalid_component("seconds", seconds, 59));
    }

    let millis = parse_fraction(fraction, s)?;
    let total_millis =
        hours as u64 * 3_600_000 + minutes as u64 * 60_000 + seconds as u64 * 1000 + millis;
    Ok(total_millis * 1000)
}

fn parse_field(field: &str, name: &str, source: &str) -> Result<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimecodeError::invalid_format(format!(
            "invalid {} in '{}'",
            name, source
        )));
    }
    field
        .parse()
        .map_err(|_| TimecodeError::invalid_format(format!("{} out of range in '{}'", name, source)))
}

fn parse_fraction(fraction: &str, source: &str) -> Result<u64> {
    if fraction.is_empty() {
        return Ok(0);
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimecodeError::invalid_format(format!(
            "invalid milliseconds in '{}'",
            source
        )));
    }
    // Keep three digits of precision, padding short fractions.
    let digits: String = fraction.chars().chain("000".chars()).take(3).collect();
    digits
        .parse()
        .map_err(|_| TimecodeError::invalid_format(format!("invalid milliseconds in '{}'", source)))
}
