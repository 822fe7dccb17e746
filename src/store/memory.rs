use super::{DocPath, Document, DocumentStore, Query};
use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Volatile store with the same semantics as `SqliteStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RefCell<BTreeMap<String, Map<String, Value>>>,
    revision: Cell<i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.borrow().is_empty()
    }

    fn bump(&self) {
        self.revision.set(self.revision.get() + 1);
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &str) -> AppResult<Option<Document>> {
        let p = DocPath::parse(path)?;
        Ok(self.docs.borrow().get(&p.full()).map(|data| Document {
            path: p.full(),
            id: p.id().to_string(),
            data: data.clone(),
        }))
    }

    fn set(&self, path: &str, data: Map<String, Value>) -> AppResult<()> {
        let p = DocPath::parse(path)?;
        self.docs.borrow_mut().insert(p.full(), data);
        self.bump();
        Ok(())
    }

    fn update_fields(&self, path: &str, fields: Map<String, Value>) -> AppResult<()> {
        let p = DocPath::parse(path)?;
        let mut docs = self.docs.borrow_mut();
        let data = docs
            .get_mut(&p.full())
            .ok_or_else(|| AppError::DocumentNotFound(p.full()))?;
        data.extend(fields);
        drop(docs);
        self.bump();
        Ok(())
    }

    fn delete(&self, path: &str) -> AppResult<bool> {
        let p = DocPath::parse(path)?;
        let removed = self.docs.borrow_mut().remove(&p.full()).is_some();
        if removed {
            self.bump();
        }
        Ok(removed)
    }

    fn query(&self, q: &Query) -> AppResult<Vec<Document>> {
        let mut out = Vec::new();
        for (path, data) in self.docs.borrow().iter() {
            let p = DocPath::parse(path)?;
            if q.matches(&p) {
                out.push(Document {
                    path: path.clone(),
                    id: p.id().to_string(),
                    data: data.clone(),
                });
            }
        }
        Ok(q.apply_order_and_limit(out))
    }

    fn revision(&self) -> AppResult<i64> {
        Ok(self.revision.get())
    }
}
