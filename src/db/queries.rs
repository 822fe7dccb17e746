use crate::errors::{AppError, AppResult};
use crate::store::Document;
use crate::store::path::DocPath;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::{Map, Value};

/// Mapping DB → Document (shared by every query).
pub fn map_row(row: &Row) -> rusqlite::Result<Document> {
    let path: String = row.get("path")?;
    let doc_id: String = row.get("doc_id")?;
    let raw: String = row.get("data")?;

    let data = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => map,
        _ => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidDocument(path)),
            ));
        }
    };

    Ok(Document {
        path,
        id: doc_id,
        data,
    })
}

pub fn upsert_document(conn: &Connection, path: &DocPath, data: &Map<String, Value>) -> AppResult<()> {
    let json = serde_json::to_string(data)?;

    conn.execute(
        "INSERT INTO documents (path, collection, collection_group, doc_id, data, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(path) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
        params![
            path.full(),
            path.collection(),
            path.collection_group(),
            path.id(),
            json,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn load_document(conn: &Connection, path: &str) -> AppResult<Option<Document>> {
    let doc = conn
        .query_row(
            "SELECT path, doc_id, data FROM documents WHERE path = ?1",
            [path],
            map_row,
        )
        .optional()?;
    Ok(doc)
}

pub fn delete_document(conn: &Connection, path: &str) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM documents WHERE path = ?1", [path])?;
    Ok(n > 0)
}

pub fn load_collection(conn: &Connection, collection: &str) -> AppResult<Vec<Document>> {
    let mut stmt = conn.prepare_cached(
        "SELECT path, doc_id, data FROM documents
         WHERE collection = ?1
         ORDER BY path ASC",
    )?;

    let rows = stmt.query_map([collection], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_collection_group(conn: &Connection, group: &str) -> AppResult<Vec<Document>> {
    let mut stmt = conn.prepare_cached(
        "SELECT path, doc_id, data FROM documents
         WHERE collection_group = ?1
         ORDER BY path ASC",
    )?;

    let rows = stmt.query_map([group], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn current_revision(conn: &Connection) -> AppResult<i64> {
    let rev: Option<i64> = conn
        .query_row("SELECT value FROM revision WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(rev.unwrap_or(0))
}

/// (collection, documents) pairs, used by `db --info`.
pub fn count_by_collection(conn: &Connection) -> AppResult<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT collection, COUNT(*) FROM documents
         GROUP BY collection
         ORDER BY collection ASC",
    )?;

    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Rows of the internal log table, oldest first.
pub fn load_log(conn: &Connection) -> AppResult<Vec<(i64, String, String, String, String)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            row.get(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
