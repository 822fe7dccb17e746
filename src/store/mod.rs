//! Document store: the persistence and real-time delivery layer the
//! dashboard reads from.
//!
//! Documents live at slash paths (`novedades/tgs/eventos/{id}`) and carry a
//! JSON object. Queries target one collection or a collection group and can
//! be ordered by a timestamp field and limited. Every write bumps a store
//! revision, which `listener::SnapshotHub` uses to re-deliver snapshots.

pub mod import;
pub mod listener;
pub mod memory;
pub mod path;
pub mod sqlite;

pub use listener::{ListenerHandle, Snapshot, SnapshotHub};
pub use memory::MemoryStore;
pub use path::DocPath;
pub use sqlite::SqliteStore;

use crate::errors::AppResult;
use crate::models::timestamp;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub path: String,
    pub id: String,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Exact collection path, e.g. `novedades/tgs/eventos`.
    Collection(String),
    /// Every collection with this name, at any depth.
    CollectionGroup(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub target: Target,
    /// Timestamp fields tried in order; the first parseable one is the sort key.
    pub order_fields: Vec<String>,
    pub direction: Direction,
    pub limit: Option<usize>,
    /// Offset given to timestamps that carry none.
    pub offset: FixedOffset,
}

impl Query {
    pub fn collection(path: &str) -> Self {
        Self {
            target: Target::Collection(path.trim_matches('/').to_string()),
            order_fields: Vec::new(),
            direction: Direction::Asc,
            limit: None,
            offset: Utc.fix(),
        }
    }

    pub fn collection_group(name: &str) -> Self {
        Self {
            target: Target::CollectionGroup(name.to_string()),
            order_fields: Vec::new(),
            direction: Direction::Asc,
            limit: None,
            offset: Utc.fix(),
        }
    }

    pub fn order_by(mut self, fields: &[&str], direction: Direction) -> Self {
        self.order_fields = fields.iter().map(|f| f.to_string()).collect();
        self.direction = direction;
        self
    }

    pub fn limit(mut self, n: Option<usize>) -> Self {
        self.limit = n;
        self
    }

    /// Read naive timestamps in `offset` when ordering.
    pub fn in_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Whether a document path belongs to this query's target.
    pub fn matches(&self, path: &DocPath) -> bool {
        match &self.target {
            Target::Collection(c) => path.collection() == *c,
            Target::CollectionGroup(g) => path.collection_group() == g,
        }
    }

    fn sort_key(&self, doc: &Document) -> Option<DateTime<FixedOffset>> {
        let keys: Vec<&str> = self.order_fields.iter().map(String::as_str).collect();
        timestamp::first_of(&doc.data, &keys, self.offset)
    }

    /// Sort (undated documents last, ties by path) and truncate to the limit.
    pub fn apply_order_and_limit(&self, mut docs: Vec<Document>) -> Vec<Document> {
        if !self.order_fields.is_empty() {
            let mut keyed: Vec<(Option<DateTime<FixedOffset>>, Document)> =
                docs.into_iter().map(|d| (self.sort_key(&d), d)).collect();

            keyed.sort_by(|(ka, a), (kb, b)| {
                let by_key = match (ka, kb) {
                    (Some(x), Some(y)) => match self.direction {
                        Direction::Asc => x.cmp(y),
                        Direction::Desc => y.cmp(x),
                    },
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                by_key.then_with(|| a.path.cmp(&b.path))
            });

            docs = keyed.into_iter().map(|(_, d)| d).collect();
        } else {
            docs.sort_by(|a, b| a.path.cmp(&b.path));
        }

        if let Some(n) = self.limit {
            docs.truncate(n);
        }
        docs
    }
}

/// The operations the dashboard and the CLI need from a document store.
pub trait DocumentStore {
    fn get(&self, path: &str) -> AppResult<Option<Document>>;

    /// Create or replace a document.
    fn set(&self, path: &str, data: Map<String, Value>) -> AppResult<()>;

    /// Write many documents; implementations may batch them atomically.
    fn set_many(&self, docs: Vec<(String, Map<String, Value>)>) -> AppResult<usize> {
        let n = docs.len();
        for (path, data) in docs {
            self.set(&path, data)?;
        }
        Ok(n)
    }

    /// Merge top-level fields into an existing document.
    fn update_fields(&self, path: &str, fields: Map<String, Value>) -> AppResult<()>;

    /// Returns false when the document did not exist.
    fn delete(&self, path: &str) -> AppResult<bool>;

    fn query(&self, q: &Query) -> AppResult<Vec<Document>>;

    /// Monotonic counter, changes on every write.
    fn revision(&self) -> AppResult<i64>;
}
