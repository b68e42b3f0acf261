// Utility helpers for parsing and number formatting.
//
// This module centralizes all the "dirty" CSV/number/period handling so the
// rest of the code can assume clean, typed values.
use crate::types::PeriodKey;
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

/// Parse a period string into a `PeriodKey`.
///
/// Accepts a bare year (`"2023"`) or a year-month (`"2023-05"`). The month is
/// validated by constructing the first day of that month, so `"2023-13"` and
/// friends come back as `None`.
pub fn parse_period(s: Option<&str>) -> Option<PeriodKey> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    match s.split_once('-') {
        Some((y, m)) => {
            let year: i32 = y.trim().parse().ok()?;
            let month: u32 = m.trim().parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)?;
            Some(PeriodKey::year_month(year, month))
        }
        None => {
            let year: i32 = s.parse().ok()?;
            Some(PeriodKey::year(year))
        }
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}
