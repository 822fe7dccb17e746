//! Bulk load of documents from a JSON file.
//!
//! Two layouts are accepted:
//!
//! ```json
//! [ { "path": "novedades/tgs/eventos/a1", "data": { ... } } ]
//! { "novedades/tgs/eventos/a1": { ... } }
//! ```

use super::{DocPath, DocumentStore};
use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub fn import_file(store: &dyn DocumentStore, file: &Path) -> AppResult<usize> {
    let raw = fs::read_to_string(file)?;
    let value: Value = serde_json::from_str(&raw)?;
    let docs = parse_documents(value)?;

    tracing::info!(file = %file.display(), documents = docs.len(), "importing documents");
    store.set_many(docs)
}

pub fn parse_documents(value: Value) -> AppResult<Vec<(String, Map<String, Value>)>> {
    let mut out = Vec::new();

    match value {
        Value::Array(items) => {
            for (i, item) in items.into_iter().enumerate() {
                let Value::Object(mut entry) = item else {
                    return Err(AppError::InvalidDocument(format!("entry #{i} is not an object")));
                };
                let path = match entry.remove("path") {
                    Some(Value::String(p)) => p,
                    _ => {
                        return Err(AppError::InvalidDocument(format!(
                            "entry #{i} has no \"path\""
                        )));
                    }
                };
                let data = match entry.remove("data") {
                    Some(Value::Object(d)) => d,
                    _ => {
                        return Err(AppError::InvalidDocument(format!(
                            "{path}: \"data\" must be an object"
                        )));
                    }
                };
                DocPath::parse(&path)?;
                out.push((path, data));
            }
        }
        Value::Object(map) => {
            for (path, data) in map {
                let Value::Object(d) = data else {
                    return Err(AppError::InvalidDocument(format!(
                        "{path}: document must be an object"
                    )));
                };
                DocPath::parse(&path)?;
                out.push((path, d));
            }
        }
        _ => {
            return Err(AppError::InvalidDocument(
                "expected an array or an object at top level".into(),
            ));
        }
    }

    Ok(out)
}
