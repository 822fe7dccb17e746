//! Date helpers shared by filters, grouping and the report.
//! All functions work on the single normalized representation
//! (`DateTime<FixedOffset>` / `NaiveDate`), never on locale strings.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

const MONTHS_SHORT: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Spanish three-letter month abbreviation (1-based month).
pub fn month_short(month: u32) -> &'static str {
    MONTHS_SHORT
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???")
}

/// "05 Ene"
pub fn day_label(d: NaiveDate) -> String {
    format!("{:02} {}", d.day(), month_short(d.month()))
}

/// "05 Ene 2025"
pub fn day_label_with_year(d: NaiveDate) -> String {
    format!("{} {}", day_label(d), d.year())
}

/// "Ene 2025"
pub fn month_label(year: i32, month: u32) -> String {
    format!("{} {}", month_short(month), year)
}

/// es-AR style "DD/MM/YYYY, HH:MM:SS".
pub fn display_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%d/%m/%Y, %H:%M:%S").to_string()
}

pub fn now_in(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

pub fn today_in(offset: FixedOffset) -> NaiveDate {
    now_in(offset).date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
