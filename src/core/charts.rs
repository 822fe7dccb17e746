//! Chart datasets built from the filtered events.
//!
//! A `Chart` is renderer-agnostic: the terminal renderer in `ui::render`
//! and the PDF report both draw from the same labels and series.

use crate::core::grouping::{count_by, day_labels, group_by_day, top_n};
use crate::core::kpi::Shift;
use crate::errors::{AppError, AppResult};
use crate::models::EventRecord;
use crate::utils::text::normalize;
use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum ChartKind {
    /// Events per type.
    Bar,
    /// Top-5 locations.
    Horizontal,
    /// Daily trend over the last days.
    Line,
    /// Events per client.
    Pie,
    /// Day vs night shift.
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    /// Number of events the chart was built from.
    pub total: usize,
}

impl Chart {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.values.iter().all(|v| *v == 0))
    }

    /// Single-series charts: (label, value) pairs.
    pub fn points(&self) -> Vec<(&str, usize)> {
        match self.series.first() {
            Some(s) => self
                .labels
                .iter()
                .map(String::as_str)
                .zip(s.values.iter().copied())
                .collect(),
            None => Vec::new(),
        }
    }
}

fn single(kind: ChartKind, title: &str, counts: Vec<(String, usize)>, total: usize) -> Chart {
    let (labels, values): (Vec<String>, Vec<usize>) = counts.into_iter().unzip();
    Chart {
        kind,
        title: title.to_string(),
        labels,
        series: vec![Series {
            label: "Eventos".to_string(),
            values,
        }],
        total,
    }
}

pub fn events_by_type(events: &[&EventRecord]) -> Chart {
    let counts = count_by(events.iter().map(|e| e.evento.as_str()));
    single(ChartKind::Bar, "Eventos por tipo", counts, events.len())
}

pub fn top_locations(events: &[&EventRecord], n: usize) -> Chart {
    let counts = top_n(events.iter().map(|e| e.ubicacion.as_str()), n);
    single(
        ChartKind::Horizontal,
        &format!("Top {n} ubicaciones"),
        counts,
        events.len(),
    )
}

pub fn events_by_client(events: &[&EventRecord]) -> Chart {
    let counts = count_by(events.iter().map(|e| e.cliente.as_str()));
    single(ChartKind::Pie, "Eventos por cliente", counts, events.len())
}

pub fn day_night(events: &[&EventRecord], shift: Shift) -> Chart {
    let (mut day, mut night) = (0, 0);
    for h in events.iter().filter_map(|e| e.hour()) {
        if shift.is_day(h) {
            day += 1;
        } else {
            night += 1;
        }
    }
    single(
        ChartKind::Doughnut,
        "Turno día / noche",
        vec![("Día".to_string(), day), ("Noche".to_string(), night)],
        day + night,
    )
}

/// Counters of the daily trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendCategory {
    Ingreso,
    Salida,
    Energia,
    Restauracion,
    Pma,
    Forzada,
    Alarmas,
    Confirmados,
    Falsos,
    CctvOffline,
    CctvOnline,
}

impl TrendCategory {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Ingreso => "ingreso",
            Self::Salida => "salida",
            Self::Energia => "energia",
            Self::Restauracion => "restauracion",
            Self::Pma => "pma",
            Self::Forzada => "forzada",
            Self::Alarmas => "alarmas",
            Self::Confirmados => "confirmados",
            Self::Falsos => "falsos",
            Self::CctvOffline => "cctvOffline",
            Self::CctvOnline => "cctvOnline",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ingreso => "Ingreso",
            Self::Salida => "Salida",
            Self::Energia => "Energía",
            Self::Restauracion => "Restauración",
            Self::Pma => "PMA",
            Self::Forzada => "Forzada",
            Self::Alarmas => "Alarmas",
            Self::Confirmados => "Confirmados",
            Self::Falsos => "Falsos",
            Self::CctvOffline => "CCTV Offline",
            Self::CctvOnline => "CCTV Online",
        }
    }

    /// Whether an event type counts toward this category.
    /// An event can count toward several categories.
    pub fn matches(&self, evento: &str) -> bool {
        let ev = normalize(evento);
        match self {
            Self::Ingreso => ev.contains("ingreso"),
            Self::Salida => ev.contains("salida"),
            Self::Energia => ev.contains("corte de energia"),
            Self::Restauracion => ev.contains("restauracion"),
            Self::Pma => ev.contains("puerta mantenida"),
            Self::Forzada => ev.contains("puerta forzada"),
            Self::Alarmas => ["alarma", "coaccion", "panico"]
                .iter()
                .any(|w| ev.contains(w)),
            Self::Confirmados => ev.contains("confirmado"),
            Self::Falsos => ev.contains("falso"),
            Self::CctvOffline => ev.contains("cctv fuera de linea"),
            Self::CctvOnline => ev.contains("cctv en linea"),
        }
    }

    /// Categories plotted for a client selection.
    pub fn for_client(client: Option<&str>) -> &'static [TrendCategory] {
        use TrendCategory::*;
        match client {
            Some("TGS") => &[Ingreso, Energia, Confirmados, Falsos],
            Some("Edificios") => &[Pma, Forzada, Alarmas, Confirmados, Falsos],
            Some("Barrios") => &[Energia, CctvOffline, CctvOnline, Confirmados, Falsos],
            _ => &[
                Ingreso,
                Salida,
                Pma,
                Forzada,
                Energia,
                Confirmados,
                Falsos,
                CctvOffline,
            ],
        }
    }
}

pub const TREND_DAYS: i64 = 30;

/// Daily counters over `[end - days, end]`, one point per day that has
/// events. Series that stay at zero are dropped. `days` must be at least 1
/// and keep the window inside the calendar.
pub fn daily_trend(
    events: &[&EventRecord],
    client: Option<&str>,
    end: NaiveDate,
    days: i64,
) -> AppResult<Chart> {
    if days < 1 {
        return Err(AppError::InvalidRange(format!("{days} days: must be at least 1")));
    }
    let start = Duration::try_days(days)
        .and_then(|d| end.checked_sub_signed(d))
        .ok_or_else(|| AppError::InvalidRange(format!("{days} days: window out of range")))?;

    let window = events.iter().copied().filter(|e| {
        client.is_none_or(|c| e.cliente == c)
            && e
                .filter_date()
                .map(|d| d.date_naive())
                .is_some_and(|d| d >= start && d <= end)
    });
    let by_day = group_by_day(window);

    let series = TrendCategory::for_client(client)
        .iter()
        .map(|cat| Series {
            label: cat.label().to_string(),
            values: by_day
                .values()
                .map(|bucket| bucket.iter().filter(|e| cat.matches(&e.evento)).count())
                .collect(),
        })
        .filter(|s| s.values.iter().any(|v| *v > 0))
        .collect();

    Ok(Chart {
        kind: ChartKind::Line,
        title: format!(
            "Analítica {} (últimos {days} días)",
            client.unwrap_or("General")
        ),
        labels: day_labels(by_day.keys()),
        series,
        total: by_day.values().map(Vec::len).sum(),
    })
}
