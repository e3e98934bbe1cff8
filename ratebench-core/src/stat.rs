//! Stat formatting
//!
//! Raw measurements are paired with the string a reporter prints for them.
//! Everything in here is pure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric value and its human-readable rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// Raw value
    pub raw: f64,
    /// Display form of `raw`
    pub formatted: String,
}

impl Stat {
    /// Pair a value with an explicit rendering
    pub fn new(raw: f64, formatted: impl Into<String>) -> Self {
        Self {
            raw,
            formatted: formatted.into(),
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

/// Operations per second, rounded and grouped by thousands (`1,234,567`).
pub fn format_hz(raw: f64) -> Stat {
    Stat::new(raw, group_thousands(raw))
}

/// Relative margin of error, `+/-` and three significant digits (`+/-1.23%`).
pub fn format_margin(rme: f64) -> Stat {
    Stat::new(rme, format!("+/-{}%", to_precision(rme, 3)))
}

/// Signed percentage by which a measured rate differs from its expectation.
///
/// `ratio` is `measured / expectation`; the raw value of the returned stat is
/// the percentage itself.
pub fn format_expectation_variance(ratio: f64) -> Stat {
    let percent = (ratio - 1.0) * 100.0;
    let sign = if percent < 0.0 { '-' } else { '+' };
    Stat::new(percent, format!("{sign}{:.2}%", percent.abs()))
}

/// Elapsed milliseconds (`12.34ms`)
pub fn format_millis(ms: f64) -> Stat {
    Stat::new(ms, format!("{ms:.2}ms"))
}

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;
const TB: f64 = GB * 1024.0;
const PB: f64 = TB * 1024.0;

/// Byte count in binary units, truncated to three decimals (`15.5GB`).
pub fn format_bytes(bytes: u64) -> String {
    let bytes = bytes as f64;
    let (qty, unit) = if bytes < KB {
        (bytes, "B")
    } else if bytes < MB {
        (bytes / KB, "KB")
    } else if bytes < GB {
        (bytes / MB, "MB")
    } else if bytes < TB {
        (bytes / GB, "GB")
    } else if bytes < PB {
        (bytes / TB, "TB")
    } else {
        (bytes / PB, "PB")
    };

    let truncated = (qty * 1000.0).trunc() / 1000.0;
    format!("{truncated}{unit}")
}

fn group_thousands(raw: f64) -> String {
    if raw.is_nan() {
        return "NaN".to_string();
    }
    if raw.is_infinite() {
        return if raw > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rounded = raw.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Render `value` with `precision` significant digits.
///
/// Switches to exponent notation (`1.23e+4`) when the exponent after
/// rounding is at least `precision` or below -6.
fn to_precision(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let precision = precision.max(1);
    if value == 0.0 {
        return format!("{:.*}", precision - 1, 0.0);
    }

    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = match exponent.parse() {
        Ok(exponent) => exponent,
        Err(_) => return scientific,
    };

    if exponent < -6 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{}", exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        format!("{value:.decimals$}")
    }
}
