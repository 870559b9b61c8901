//! Field normalization.
//!
//! Turns loosely typed [`TaskRecord`] fields into bounded values. Every
//! fallback is an explicit branch: a value is either [`Coerced::Parsed`]
//! or [`Coerced::Defaulted`], and nothing here can fail.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::subscore::importance_score;
use crate::task::{DueDate, NormalizedTask, Scalar, TaskKey, TaskRecord};

/// Importance assumed when missing or not numeric.
pub const DEFAULT_IMPORTANCE: f64 = 5.0;
/// Estimated hours assumed when missing or not numeric.
pub const DEFAULT_ESTIMATED_HOURS: f64 = 4.0;

/// `%Y` accepts one to four digits, so anything below this is a short
/// year that matched the wrong format.
const MIN_FULL_YEAR: i32 = 1000;

/// Date-only formats tried after ISO parsing fails, in order.
const DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%Y.%m.%d",
    "%Y%m%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m-%d-%y",
    "%y-%m-%d",
    "%d.%m.%y",
    "%B %d, %y",
    "%b %d, %y",
];

/// Date-time formats tried after the date-only ones.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Month and day without a year; the year of `today` is filled in.
const YEARLESS_FORMATS: &[&str] = &["%B %d", "%b %d", "%d %B", "%d %b", "%m/%d"];

/// A value that was either read from input or substituted by a default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced<T> {
    Parsed(T),
    Defaulted(T),
}

impl<T: Copy> Coerced<T> {
    pub fn value(&self) -> T {
        match *self {
            Coerced::Parsed(v) | Coerced::Defaulted(v) => v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Coerced::Defaulted(_))
    }
}

/// Coerce a loose numeric field, substituting `default` when absent or
/// not a number. NaN counts as not a number; infinities are kept and left
/// to the callers' clamping.
pub fn coerce_number(value: Option<&Scalar>, default: f64) -> Coerced<f64> {
    let parsed = match value {
        None => None,
        Some(Scalar::Number(n)) => Some(*n),
        Some(Scalar::Text(text)) => text.trim().parse::<f64>().ok(),
    };

    match parsed {
        Some(n) if !n.is_nan() => Coerced::Parsed(n),
        _ => Coerced::Defaulted(default),
    }
}

/// Importance mapped into [0, 1]; defaults to 5 on the 1..=10 scale.
pub fn normalize_importance(value: Option<&Scalar>) -> Coerced<f64> {
    match coerce_number(value, DEFAULT_IMPORTANCE) {
        Coerced::Parsed(n) => Coerced::Parsed(importance_score(n)),
        Coerced::Defaulted(n) => Coerced::Defaulted(importance_score(n)),
    }
}

/// Estimated hours; defaults to 4.
pub fn normalize_hours(value: Option<&Scalar>) -> Coerced<f64> {
    coerce_number(value, DEFAULT_ESTIMATED_HOURS)
}

/// Resolve a due date. Empty or unparseable input means "no due date".
pub fn parse_due_date(value: Option<&DueDate>, today: NaiveDate) -> Option<NaiveDate> {
    match value? {
        DueDate::Date(date) => Some(*date),
        DueDate::Text(text) => parse_date_text(text, today),
    }
}

/// Parse free-form date text.
///
/// ISO-8601 forms are tried first (plain date, RFC 3339, naive
/// date-time), then a list of common human formats. Ambiguous numeric
/// forms read month-first, two-digit years land in 1970..=2069, ordinal
/// suffixes (`15th`) are ignored and a missing year is taken from `today`.
pub fn parse_date_text(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = parse_iso(text) {
        return Some(date);
    }

    let text = strip_ordinals(text);
    let found = DateTime::parse_from_rfc2822(&text)
        .ok()
        .and_then(|dt| full_year(dt.date_naive()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok().and_then(full_year))
        })
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|fmt| {
                NaiveDateTime::parse_from_str(&text, fmt)
                    .ok()
                    .and_then(|dt| full_year(dt.date()))
            })
        })
        .or_else(|| {
            let dated = format!("{text} {}", today.year());
            YEARLESS_FORMATS.iter().find_map(|fmt| {
                NaiveDate::parse_from_str(&dated, &format!("{fmt} %Y")).ok()
            })
        });

    if found.is_none() {
        debug!(input = text.as_str(), "unparseable due date, treating as none");
    }
    found
}

/// Strict `YYYY-MM-DD` with a four-digit year.
pub(crate) fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(full_year)
}

fn parse_iso(text: &str) -> Option<NaiveDate> {
    if let Some(date) = parse_calendar_date(text) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .and_then(|dt| full_year(dt.date()))
}

fn full_year(date: NaiveDate) -> Option<NaiveDate> {
    (date.year() >= MIN_FULL_YEAR).then_some(date)
}

/// `"January 15th, 2025"` -> `"January 15, 2025"`.
fn strip_ordinals(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let (body, comma) = match word.strip_suffix(',') {
                Some(body) => (body, ","),
                None => (word, ""),
            };
            let digits = ["st", "nd", "rd", "th"].iter().find_map(|suffix| {
                body.to_ascii_lowercase()
                    .strip_suffix(*suffix)
                    .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
                    .map(str::to_string)
            });
            match digits {
                Some(n) => format!("{n}{comma}"),
                None => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize one record. `today` fills in the year of year-less dates.
pub fn normalize(record: &TaskRecord, today: NaiveDate) -> NormalizedTask<'_> {
    let key = TaskKey::of(record);
    let title = record
        .title
        .clone()
        .unwrap_or_else(|| format!("untitled-{key}"));

    let importance = normalize_importance(record.importance.as_ref());
    if importance.is_defaulted() && record.importance.is_some() {
        debug!(task = %key, "non-numeric importance, using default");
    }
    let hours = normalize_hours(record.estimated_hours.as_ref());
    if hours.is_defaulted() && record.estimated_hours.is_some() {
        debug!(task = %key, "non-numeric estimated hours, using default");
    }

    NormalizedTask {
        raw: record,
        due_date: parse_due_date(record.due_date.as_ref(), today),
        importance: importance.value(),
        estimated_hours: hours.value(),
        dependencies: &record.dependencies,
        title,
        key,
    }
}

/// Normalize a batch, preserving input order.
pub fn normalize_all(records: &[TaskRecord], today: NaiveDate) -> Vec<NormalizedTask<'_>> {
    records.iter().map(|record| normalize(record, today)).collect()
}
