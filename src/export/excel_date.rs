// src/export/excel_date.rs

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Number format of date cells.
pub(crate) const DATETIME_FORMAT: &str = "dd/mm/yyyy hh:mm:ss";

/// Excel serial of a wall-clock timestamp (days since 1899-12-30).
pub(crate) fn excel_serial(dt: &DateTime<FixedOffset>) -> Option<f64> {
    naive_serial(&dt.naive_local())
}

fn naive_serial(dt: &NaiveDateTime) -> Option<f64> {
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;

    let duration = *dt - excel_epoch;

    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86400) as f64;

    Some(days + secs / 86400.0)
}
