use super::{DocPath, Document, DocumentStore, Query, Target};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value};

/// Document store persisted in a local SQLite file.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    /// Open (creating if needed) and run pending migrations.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let pool = DbPool::open_in_memory()?;
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, path: &str) -> AppResult<Option<Document>> {
        let p = DocPath::parse(path)?;
        queries::load_document(&self.pool.conn, &p.full())
    }

    fn set(&self, path: &str, data: Map<String, Value>) -> AppResult<()> {
        let p = DocPath::parse(path)?;
        queries::upsert_document(&self.pool.conn, &p, &data)
    }

    fn set_many(&self, docs: Vec<(String, Map<String, Value>)>) -> AppResult<usize> {
        let parsed = docs
            .into_iter()
            .map(|(path, data)| DocPath::parse(&path).map(|p| (p, data)))
            .collect::<AppResult<Vec<_>>>()?;

        let tx = self.pool.conn.unchecked_transaction()?;
        for (p, data) in &parsed {
            queries::upsert_document(&tx, p, data)?;
        }
        tx.commit()?;

        Ok(parsed.len())
    }

    fn update_fields(&self, path: &str, fields: Map<String, Value>) -> AppResult<()> {
        let p = DocPath::parse(path)?;
        let tx = self.pool.conn.unchecked_transaction()?;

        let mut doc = queries::load_document(&tx, &p.full())?
            .ok_or_else(|| AppError::DocumentNotFound(p.full()))?;
        doc.data.extend(fields);
        queries::upsert_document(&tx, &p, &doc.data)?;

        tx.commit()?;
        Ok(())
    }

    fn delete(&self, path: &str) -> AppResult<bool> {
        let p = DocPath::parse(path)?;
        queries::delete_document(&self.pool.conn, &p.full())
    }

    fn query(&self, q: &Query) -> AppResult<Vec<Document>> {
        let docs = match &q.target {
            Target::Collection(c) => queries::load_collection(&self.pool.conn, c)?,
            Target::CollectionGroup(g) => queries::load_collection_group(&self.pool.conn, g)?,
        };
        Ok(q.apply_order_and_limit(docs))
    }

    fn revision(&self) -> AppResult<i64> {
        queries::current_revision(&self.pool.conn)
    }
}
