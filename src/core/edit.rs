//! Record edits and deletions issued from the event table.

use crate::errors::{AppError, AppResult};
use crate::models::client::EVENTS_GROUP;
use crate::models::{ClientProfile, timestamp};
use crate::store::{DocPath, DocumentStore, Query};
use crate::ui::messages::info;
use chrono::FixedOffset;
use serde_json::{Map, Value};

/// Fields an operator can change on an existing event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventEdit {
    pub observacion: Option<String>,
    pub resolucion: Option<String>,
    pub respuesta: Option<String>,
    /// Any accepted timestamp text, interpreted in the operations offset.
    pub fecha: Option<String>,
}

impl EventEdit {
    pub fn is_empty(&self) -> bool {
        self.observacion.is_none()
            && self.resolucion.is_none()
            && self.respuesta.is_none()
            && self.fecha.is_none()
    }

    /// Store fields to merge, named the way the client's documents name them.
    pub fn to_fields(&self, profile: &ClientProfile, offset: FixedOffset) -> AppResult<Map<String, Value>> {
        let mut f = Map::new();

        if let Some(obs) = &self.observacion {
            f.insert(format!("observaciones-{}", profile.key), Value::from(obs.trim()));
        }
        if let Some(res) = &self.resolucion {
            f.insert("resolusion-evento".into(), Value::from(res.trim()));
            f.insert("resolucion".into(), Value::from(res.trim()));
        }
        if let Some(resp) = &self.respuesta {
            f.insert("respuesta-residente".into(), Value::from(resp.trim()));
            f.insert("respuesta".into(), Value::from(resp.trim()));
        }
        if let Some(raw) = &self.fecha {
            let dt = timestamp::parse_str(raw, offset)
                .ok_or_else(|| AppError::InvalidTimestamp(raw.clone()))?;
            let text = dt.to_rfc3339();
            f.insert("fechaHoraEnvio".into(), Value::from(text.clone()));
            if profile.is_buildings() {
                f.insert("fechaHoraEvento".into(), Value::from(text));
            }
        }

        Ok(f)
    }
}

/// Resolve a full document path, or a bare document id searched across
/// every client's event collection.
pub fn resolve_path(store: &dyn DocumentStore, key: &str) -> AppResult<String> {
    if key.contains('/') {
        return Ok(DocPath::parse(key)?.full());
    }

    let hits: Vec<String> = store
        .query(&Query::collection_group(EVENTS_GROUP))?
        .into_iter()
        .filter(|d| d.id == key)
        .map(|d| d.path)
        .collect();

    match hits.as_slice() {
        [] => Err(AppError::DocumentNotFound(key.to_string())),
        [one] => Ok(one.clone()),
        many => Err(AppError::InvalidPath(format!(
            "id '{key}' is ambiguous: {}",
            many.join(", ")
        ))),
    }
}

pub struct EditLogic;

impl EditLogic {
    /// Apply an edit; returns the resolved path.
    pub fn apply(
        store: &dyn DocumentStore,
        key: &str,
        edit: &EventEdit,
        offset: FixedOffset,
    ) -> AppResult<String> {
        if edit.is_empty() {
            return Err(AppError::Other("nothing to edit".into()));
        }

        let path = resolve_path(store, key)?;
        let profile = ClientProfile::for_path(&path)
            .ok_or_else(|| AppError::InvalidPath(format!("{path} is not an event document")))?;

        let fields = edit.to_fields(&profile, offset)?;
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        info(format!("Updating {}: {}", path, names.join(", ")));

        store.update_fields(&path, fields)?;
        Ok(path)
    }

    /// Delete an event; returns the resolved path.
    pub fn delete(store: &dyn DocumentStore, key: &str) -> AppResult<String> {
        let path = resolve_path(store, key)?;
        if !store.delete(&path)? {
            return Err(AppError::DocumentNotFound(path));
        }
        Ok(path)
    }
}
