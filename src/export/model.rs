// src/export/model.rs

use crate::core::table::{COLUMNS, row_cells};
use crate::models::EventRecord;
use serde::Serialize;

/// Flat export row of an event.
#[derive(Serialize, Clone, Debug)]
pub struct EventExport {
    pub cliente: String,
    pub evento: String,
    pub ubicacion: String,
    /// "DD/MM/YYYY, HH:MM:SS" or "Sin Fecha".
    pub fecha: String,
    /// RFC 3339, empty when undated.
    pub fecha_iso: String,
    pub observacion: String,
    pub razones: String,
    pub resolucion: String,
    pub respuesta: String,
    pub proveedor: String,
    pub grupo: String,
    pub path: String,
}

impl From<&EventRecord> for EventExport {
    fn from(e: &EventRecord) -> Self {
        Self {
            cliente: e.cliente.clone(),
            evento: e.evento.clone(),
            ubicacion: e.ubicacion.clone(),
            fecha: e.fecha_text(),
            fecha_iso: e.display_date().map(|d| d.to_rfc3339()).unwrap_or_default(),
            observacion: e.observacion.clone(),
            razones: e.razones.clone(),
            resolucion: e.resolucion.clone(),
            respuesta: e.respuesta.clone(),
            proveedor: e.proveedor.clone(),
            grupo: e.grupo.clone(),
            path: e.path.clone(),
        }
    }
}

pub fn to_exports(events: &[EventRecord]) -> Vec<EventExport> {
    events.iter().map(EventExport::from).collect()
}

/// Column headers of the report table (PDF / XLSX).
pub(crate) fn get_headers() -> Vec<&'static str> {
    COLUMNS.to_vec()
}

/// Report table as strings, one row per event.
pub(crate) fn events_to_table(events: &[EventRecord]) -> Vec<Vec<String>> {
    events.iter().map(row_cells).collect()
}
