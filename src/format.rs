use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use wasm_bindgen::prelude::wasm_bindgen;

pub const DEFAULT_DATE_PATTERN: &str = "YYYY-MM-DD HH:mm:ss";
const PLACEHOLDER: &str = "-";
const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human readable size using 1024-based units, e.g. `1.5 KB`.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    if bytes <= 0.0 || bytes.is_nan() {
        return "0 Bytes".to_owned();
    }

    let mut unit_index = 0;
    let mut value = bytes;
    while value >= 1024.0 && unit_index < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit_index])
}

#[wasm_bindgen]
pub fn format_number(number: f64, decimals: Option<usize>) -> String {
    if number.is_nan() {
        return PLACEHOLDER.to_owned();
    }
    format!("{:.*}", decimals.unwrap_or(2), number)
}

#[wasm_bindgen]
pub fn format_percentage(number: f64, decimals: Option<usize>) -> String {
    if number.is_nan() {
        return PLACEHOLDER.to_owned();
    }
    format!("{:.*}%", decimals.unwrap_or(1), number)
}

/// Format a date using the `YYYY`, `MM`, `DD`, `HH`, `mm` and `ss` tokens.
/// Unparsable or empty input renders as `-`.
#[wasm_bindgen]
pub fn format_date(date: &str, pattern: Option<String>) -> String {
    let Some(date) = parse_date(date) else {
        return PLACEHOLDER.to_owned();
    };
    let pattern = pattern.as_deref().unwrap_or(DEFAULT_DATE_PATTERN);

    pattern
        .replacen("YYYY", &date.year().to_string(), 1)
        .replacen("MM", &format!("{:02}", date.month()), 1)
        .replacen("DD", &format!("{:02}", date.day()), 1)
        .replacen("HH", &format!("{:02}", date.hour()), 1)
        .replacen("mm", &format!("{:02}", date.minute()), 1)
        .replacen("ss", &format!("{:02}", date.second()), 1)
}

/// Dates carrying an offset are shown in local time; naive ones are taken as is.
fn parse_date(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(date) {
        return Some(date.with_timezone(&Local).naive_local());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(date, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
