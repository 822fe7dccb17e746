use super::client::ClientProfile;
use super::timestamp;
use crate::store::Document;
use crate::utils::date::display_datetime;
use chrono::{DateTime, FixedOffset, Timelike};
use serde::Serialize;
use serde_json::{Map, Value};

pub const NO_EVENT: &str = "Sin Evento";
pub const NO_LOCATION: &str = "Sin Ubicación";
pub const NO_NOTE: &str = "Sin Observación";
pub const NO_DATE: &str = "Sin Fecha";
pub const DEFAULT_GROUP: &str = "General";

const SENT_KEYS: [&str; 3] = ["fechaHoraEnvio", "fecha", "fechaObj"];
const EVENT_TIME_KEYS: [&str; 3] = [
    "fechaHoraEvento",
    "fechaHoraEventoISO",
    "fechaHoraEventoLocal",
];
const REASON_KEYS: [&str; 4] = ["razones-pma", "razones_pma", "razonesPma", "razones"];
const RESOLUTION_KEYS: [&str; 5] = [
    "resolusion-evento",
    "resolucion-evento",
    "resolucion",
    "resolucionEvento",
    "resolusionEvento",
];
const RESPONSE_KEYS: [&str; 2] = ["respuesta-residente", "respuesta"];
const PROVIDER_KEYS: [&str; 5] = [
    "proveedor-personal",
    "proveedor_personal",
    "proveedorPersonal",
    "proveedor",
    "personal",
];

/// One logged incident/status entry from a monitored site, normalized.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub id: String,
    /// Full document path in the store.
    pub path: String,
    pub cliente: String,
    pub cliente_key: String,
    pub evento: String,
    pub ubicacion: String,
    pub grupo: String,
    /// Send time (`fechaHoraEnvio` / `fecha` / `fechaObj`).
    pub fecha: Option<DateTime<FixedOffset>>,
    /// Building events also record when the incident happened.
    pub fecha_evento: Option<DateTime<FixedOffset>>,
    pub observacion: String,
    pub razones: String,
    pub resolucion: String,
    pub respuesta: String,
    pub proveedor: String,
    pub edificio: String,
    pub unidad: String,
    pub link_drive: Option<String>,
}

impl EventRecord {
    /// Build a record from a store document.
    /// Returns `None` when the document is not under `novedades/{client}/eventos`.
    pub fn from_document(doc: &Document, offset: FixedOffset) -> Option<Self> {
        let profile = ClientProfile::for_path(&doc.path)?;
        Some(Self::from_data(&doc.id, &doc.path, &profile, &doc.data, offset))
    }

    pub fn from_data(
        id: &str,
        path: &str,
        profile: &ClientProfile,
        d: &Map<String, Value>,
        offset: FixedOffset,
    ) -> Self {
        let edificio = text_of(d, "edificio");
        let unidad = text_of(d, "unidad");

        let location_raw = profile
            .location_key
            .as_deref()
            .map(|k| text_of(d, k))
            .unwrap_or_default();

        let ubicacion = if profile.is_buildings() {
            match (edificio.is_empty(), unidad.is_empty()) {
                (true, _) => NO_LOCATION.to_string(),
                (false, true) => edificio.clone(),
                (false, false) => format!("{edificio} - {unidad}"),
            }
        } else {
            non_empty(location_raw.clone())
                .or_else(|| non_empty(text_of(d, "ubicacion")))
                .unwrap_or_else(|| NO_LOCATION.to_string())
        };

        let grupo = if profile.is_buildings() {
            non_empty(edificio.clone()).unwrap_or_else(|| DEFAULT_GROUP.to_string())
        } else {
            location_raw
                .split_whitespace()
                .next()
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_GROUP.to_string())
        };

        let evento = non_empty(text_of(d, &profile.event_key))
            .or_else(|| non_empty(text_of(d, "evento")))
            .unwrap_or_else(|| NO_EVENT.to_string());

        let own_note_key = format!("observaciones-{}", profile.key);
        let observacion = first_text(
            d,
            &[own_note_key.as_str(), "observaciones-edificios", "observacion"],
        )
        .unwrap_or_else(|| NO_NOTE.to_string());

        let fecha_evento = if profile.is_buildings() {
            timestamp::first_of(d, &EVENT_TIME_KEYS, offset)
        } else {
            None
        };

        let link_drive = non_empty(text_of(d, "linkDrive"));

        Self {
            id: id.to_string(),
            path: path.to_string(),
            cliente: profile.name.clone(),
            cliente_key: profile.key.clone(),
            evento,
            ubicacion,
            grupo,
            fecha: timestamp::first_of(d, &SENT_KEYS, offset),
            fecha_evento,
            observacion,
            razones: first_text(d, &REASON_KEYS).unwrap_or_default(),
            resolucion: first_text(d, &RESOLUTION_KEYS).unwrap_or_default(),
            respuesta: first_text(d, &RESPONSE_KEYS).unwrap_or_default(),
            proveedor: first_text(d, &PROVIDER_KEYS).unwrap_or_default(),
            edificio,
            unidad,
            link_drive,
        }
    }

    /// Date used by range filters: buildings prefer the incident time.
    pub fn filter_date(&self) -> Option<DateTime<FixedOffset>> {
        if self.is_buildings() {
            self.fecha_evento.or(self.fecha)
        } else {
            self.fecha
        }
    }

    /// Date shown in tables and the report.
    pub fn display_date(&self) -> Option<DateTime<FixedOffset>> {
        self.fecha.or(self.fecha_evento)
    }

    pub fn fecha_text(&self) -> String {
        self.display_date()
            .map(|d| display_datetime(&d))
            .unwrap_or_else(|| NO_DATE.to_string())
    }

    pub fn hour(&self) -> Option<u32> {
        self.display_date().map(|d| d.hour())
    }

    pub fn is_buildings(&self) -> bool {
        self.cliente_key == "edificios"
    }

    pub fn is_tgs(&self) -> bool {
        self.cliente.to_uppercase().contains("TGS")
    }

    /// Fields joined for free-text search.
    pub fn search_text(&self) -> String {
        [
            self.cliente.as_str(),
            self.evento.as_str(),
            self.ubicacion.as_str(),
            self.grupo.as_str(),
            self.observacion.as_str(),
            self.resolucion.as_str(),
            self.razones.as_str(),
            self.respuesta.as_str(),
            self.edificio.as_str(),
            self.unidad.as_str(),
            self.proveedor.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" · ")
    }
}

/// Scalar field as text; numbers and booleans are stringified.
fn text_of(d: &Map<String, Value>, key: &str) -> String {
    match d.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// First present key wins, even when its value is an empty string.
fn first_text(d: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find(|k| matches!(d.get(**k), Some(v) if !v.is_null()))
        .map(|k| text_of(d, k))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
