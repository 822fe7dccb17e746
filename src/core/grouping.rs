//! Bucketing of events by value, by day and by month.
//!
//! Day and month buckets are keyed by real dates in a `BTreeMap`, so
//! iteration order is chronological whatever the display labels look like.

use crate::models::EventRecord;
use crate::utils::date::{day_label, day_label_with_year, month_label};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Count occurrences, most frequent first, ties by name.
pub fn count_by<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }

    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, n)| (k.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

pub fn top_n<'a, I>(values: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut all = count_by(values);
    all.truncate(n);
    all
}

/// Dated events by calendar day. Undated events are left out.
pub fn group_by_day<'a, I>(events: I) -> BTreeMap<NaiveDate, Vec<&'a EventRecord>>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    let mut out: BTreeMap<NaiveDate, Vec<&EventRecord>> = BTreeMap::new();
    for e in events {
        if let Some(d) = e.filter_date() {
            out.entry(d.date_naive()).or_default().push(e);
        }
    }
    out
}

/// Event count per (year, month).
pub fn group_by_month<'a, I>(events: I) -> BTreeMap<(i32, u32), usize>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    let mut out = BTreeMap::new();
    for e in events {
        if let Some(d) = e.filter_date() {
            *out.entry((d.year(), d.month())).or_default() += 1;
        }
    }
    out
}

/// "DD Mmm" labels; the year is appended when the days span more than one year.
pub fn day_labels<'a, I>(days: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a NaiveDate>,
    I::IntoIter: Clone,
{
    let iter = days.into_iter();
    let mut years = iter.clone().map(|d| d.year());
    let multi_year = match years.next() {
        Some(first) => years.any(|y| y != first),
        None => false,
    };

    iter.map(|d| {
        if multi_year {
            day_label_with_year(*d)
        } else {
            day_label(*d)
        }
    })
    .collect()
}

pub fn month_labels<'a, I>(months: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a (i32, u32)>,
{
    months.into_iter().map(|(y, m)| month_label(*y, *m)).collect()
}
