// src/export/range.rs

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

/// Parse a `--range` expression into inclusive day bounds.
///
/// Supported:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
///
/// `all` (any case) means no bounds.
pub fn parse_range(r: &str) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    let r = r.trim();
    if r.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let (start, end) = match r.split_once(':') {
        Some((s, e)) => {
            let (s, e) = (s.trim(), e.trim());
            if s.len() != e.len() {
                return Err(AppError::InvalidRange(format!(
                    "{r}: start and end must have the same format"
                )));
            }
            (first_day(s, r)?, last_day(e, r)?)
        }
        None => (first_day(r, r)?, last_day(r, r)?),
    };

    Ok(Some((start, end)))
}

fn year(s: &str, whole: &str) -> AppResult<i32> {
    s.get(0..4)
        .and_then(|y| y.parse().ok())
        .ok_or_else(|| AppError::InvalidRange(format!("{whole}: invalid year")))
}

fn month(s: &str, whole: &str) -> AppResult<u32> {
    s.get(5..7)
        .and_then(|m| m.parse().ok())
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| AppError::InvalidRange(format!("{whole}: invalid month")))
}

fn first_day(s: &str, whole: &str) -> AppResult<NaiveDate> {
    let d = match s.len() {
        4 => NaiveDate::from_ymd_opt(year(s, whole)?, 1, 1),
        7 => NaiveDate::from_ymd_opt(year(s, whole)?, month(s, whole)?, 1),
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        _ => None,
    };
    d.ok_or_else(|| AppError::InvalidRange(format!("{whole}: unsupported range format")))
}

fn last_day(s: &str, whole: &str) -> AppResult<NaiveDate> {
    let d = match s.len() {
        4 => NaiveDate::from_ymd_opt(year(s, whole)?, 12, 31),
        7 => {
            let (y, m) = (year(s, whole)?, month(s, whole)?);
            month_last_day(y, m)
        }
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        _ => None,
    };
    d.ok_or_else(|| AppError::InvalidRange(format!("{whole}: unsupported range format")))
}

fn month_last_day(y: i32, m: u32) -> Option<NaiveDate> {
    let (ny, nm) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)?
        .pred_opt()
        .filter(|d| d.month() == m)
}
