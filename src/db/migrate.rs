use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Applied migrations are recorded there.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Documents table: one row per document, data stored as JSON text.
fn create_documents_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            path             TEXT PRIMARY KEY,
            collection       TEXT NOT NULL,
            collection_group TEXT NOT NULL,
            doc_id           TEXT NOT NULL,
            data             TEXT NOT NULL,
            updated_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
        CREATE INDEX IF NOT EXISTS idx_documents_group ON documents(collection_group);
        "#,
    )?;
    Ok(())
}

/// Single-row change counter bumped by triggers on every document write.
/// Snapshot listeners compare it to decide whether to re-query.
fn create_revision_counter(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS revision (
            id    INTEGER PRIMARY KEY CHECK (id = 1),
            value INTEGER NOT NULL
        );

        INSERT OR IGNORE INTO revision (id, value) VALUES (1, 0);

        CREATE TRIGGER IF NOT EXISTS trg_documents_insert AFTER INSERT ON documents
        BEGIN
            UPDATE revision SET value = value + 1 WHERE id = 1;
        END;

        CREATE TRIGGER IF NOT EXISTS trg_documents_update AFTER UPDATE ON documents
        BEGIN
            UPDATE revision SET value = value + 1 WHERE id = 1;
        END;

        CREATE TRIGGER IF NOT EXISTS trg_documents_delete AFTER DELETE ON documents
        BEGIN
            UPDATE revision SET value = value + 1 WHERE id = 1;
        END;
        "#,
    )?;
    Ok(())
}

type Migration = (&'static str, &'static str, fn(&Connection) -> Result<()>);

const MIGRATIONS: [Migration; 2] = [
    (
        "20250801_0001_create_documents",
        "Created documents table",
        create_documents_table,
    ),
    (
        "20250805_0002_revision_counter",
        "Added revision counter and change triggers",
        create_revision_counter,
    ),
];

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, message, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        apply(&tx)?;
        mark_applied(&tx, version, message)?;
        tx.commit()?;

        tracing::info!(version, "migration applied");
    }

    Ok(())
}
