//! KPI cards: global figures plus the TGS and Edificios blocks.
//!
//! Every builder returns `KpiView::Loading` for an empty input so the cards
//! can render a placeholder instead of zeros.

use crate::core::grouping::{count_by, top_n};
use crate::models::EventRecord;
use crate::utils::text::{normalize, squash_spaces};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum KpiView<T> {
    Loading,
    Ready(T),
}

impl<T> KpiView<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, KpiView::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            KpiView::Ready(v) => Some(v),
            KpiView::Loading => None,
        }
    }
}

/// Hour window of the day shift: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub start: u32,
    pub end: u32,
}

impl Shift {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn is_day(&self, hour: u32) -> bool {
        if self.start <= self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

impl Default for Shift {
    fn default() -> Self {
        Self::new(6, 18)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalKpis {
    pub total: usize,
    pub top_event: Option<(String, usize)>,
    pub top_location: Option<(String, usize)>,
    pub distinct_locations: usize,
    pub day: usize,
    pub night: usize,
    pub day_pct: u32,
    pub night_pct: u32,
    pub top_events: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TgsKpis {
    pub total: usize,
    pub ingresos: usize,
    pub salidas: usize,
    pub cortes: usize,
    pub restauraciones: usize,
    pub proveedores: usize,
    pub top_events: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdificiosKpis {
    pub total: usize,
    pub pma: usize,
    pub forzada: usize,
    pub encargado: usize,
    pub cctv_offline: usize,
    pub otros: usize,
}

fn pct(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 * 100.0) / whole as f64).round() as u32
    }
}

pub fn global(events: &[&EventRecord], shift: Shift) -> KpiView<GlobalKpis> {
    if events.is_empty() {
        return KpiView::Loading;
    }

    let by_event = count_by(events.iter().map(|e| e.evento.as_str()));
    let by_location = count_by(events.iter().map(|e| e.ubicacion.as_str()));

    let (mut day, mut night) = (0, 0);
    for hour in events.iter().filter_map(|e| e.hour()) {
        if shift.is_day(hour) {
            day += 1;
        } else {
            night += 1;
        }
    }

    KpiView::Ready(GlobalKpis {
        total: events.len(),
        top_event: by_event.first().cloned(),
        top_location: by_location.first().cloned(),
        distinct_locations: by_location.len(),
        day,
        night,
        day_pct: pct(day, day + night),
        night_pct: pct(night, day + night),
        top_events: by_event.into_iter().take(5).collect(),
    })
}

pub fn tgs(events: &[&EventRecord]) -> KpiView<TgsKpis> {
    let rows: Vec<&EventRecord> = events.iter().copied().filter(|e| e.is_tgs()).collect();
    if rows.is_empty() {
        return KpiView::Loading;
    }

    let with = |needle: &str| rows.iter().filter(|e| e.evento.contains(needle)).count();

    let proveedores: HashSet<String> = rows
        .iter()
        .map(|e| squash_spaces(&e.proveedor))
        .filter(|p| !p.is_empty())
        .collect();

    KpiView::Ready(TgsKpis {
        total: rows.len(),
        ingresos: with("Ingreso de Personal"),
        salidas: with("Salida de Personal"),
        cortes: with("Corte de energía eléctrica"),
        restauraciones: with("Restauración de energía eléctrica"),
        proveedores: proveedores.len(),
        top_events: top_n(rows.iter().map(|e| e.evento.as_str()), 5),
    })
}

/// Edificios event categories, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingCategory {
    Pma,
    Forzada,
    Encargado,
    CctvOffline,
}

const CCTV_OFFLINE_PHRASES: [&str; 9] = [
    "dispositivo cctv fuera de linea",
    "cctv fuera de linea",
    "dispositivo fuera de linea",
    "equipo offline",
    "equipo fuera de linea",
    "camara fuera de linea",
    "camaras fuera de linea",
    "dvr offline",
    "nvr offline",
];

fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric()).any(|w| w == word)
}

/// First matching category of an event type, if any.
pub fn building_category(evento: &str) -> Option<BuildingCategory> {
    let t = normalize(evento);
    if t.is_empty() {
        return None;
    }

    if t.contains("puerta mantenida abierta") || has_word(&t, "pma") {
        return Some(BuildingCategory::Pma);
    }
    if t.contains("puerta forzada") || has_word(&t, "forzada") || has_word(&t, "forzad") {
        return Some(BuildingCategory::Forzada);
    }

    let dashless = squash_spaces(&t.replace(['-', '–'], " "));
    if dashless.contains("evento encargado") {
        return Some(BuildingCategory::Encargado);
    }
    if CCTV_OFFLINE_PHRASES.iter().any(|p| t.contains(p)) {
        return Some(BuildingCategory::CctvOffline);
    }
    None
}

pub fn edificios(events: &[&EventRecord]) -> KpiView<EdificiosKpis> {
    let rows: Vec<&EventRecord> = events
        .iter()
        .copied()
        .filter(|e| e.is_buildings())
        .collect();
    if rows.is_empty() {
        return KpiView::Loading;
    }

    let mut k = EdificiosKpis {
        total: rows.len(),
        pma: 0,
        forzada: 0,
        encargado: 0,
        cctv_offline: 0,
        otros: 0,
    };

    for e in &rows {
        match building_category(&e.evento) {
            Some(BuildingCategory::Pma) => k.pma += 1,
            Some(BuildingCategory::Forzada) => k.forzada += 1,
            Some(BuildingCategory::Encargado) => k.encargado += 1,
            Some(BuildingCategory::CctvOffline) => k.cctv_offline += 1,
            None => {}
        }
    }
    k.otros = k.total - (k.pma + k.forzada + k.encargado + k.cctv_offline);

    KpiView::Ready(k)
}
