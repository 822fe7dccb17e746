#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::FixedOffset;
use opsboard::models::EventRecord;
use opsboard::store::{Document, DocumentStore, Query};
use serde_json::{Value, json};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn ops() -> Command {
    cargo_bin_cmd!("opsboard")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_opsboard.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn offset() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).expect("valid offset")
}

/// Six events over three clients, in the shapes real documents use.
pub fn sample_documents() -> Value {
    json!({
        "novedades/tgs/eventos/t1": {
            "evento-tgs": "Ingreso de Personal",
            "locaciones-tgs": "Planta Norte",
            "proveedor-personal": "Acme",
            "fechaHoraEnvio": "2025-08-01T10:00:00-03:00"
        },
        "novedades/tgs/eventos/t2": {
            "evento-tgs": "Salida de Personal",
            "locaciones-tgs": "Planta Norte",
            "proveedor-personal": "Acme",
            "fechaHoraEnvio": "2025-08-01T19:30:00-03:00"
        },
        "novedades/tgs/eventos/t3": {
            "evento-tgs": "Corte de energía eléctrica",
            "locaciones-tgs": "Planta Sur",
            "fecha": { "seconds": 1754103600, "nanoseconds": 0 }
        },
        "novedades/edificios/eventos/e1": {
            "evento-edificio": "Puerta Mantenida Abierta (PMA)",
            "edificio": "Torre A",
            "unidad": "5B",
            "observaciones-edificios": "Se cerró la puerta",
            "fechaHoraEnvio": "2025-08-03 08:00:00",
            "fechaHoraEvento": "2025-08-02 23:50:00"
        },
        "novedades/edificios/eventos/e2": {
            "evento-edificio": "Puerta forzada",
            "edificio": "Torre B",
            "fechaHoraEnvio": 1754226000000i64
        },
        "novedades/vtv/eventos/v1": {
            "evento-vtv": "Alarma",
            "planta-vtv": "La Plata"
        }
    })
}

/// Write the sample dataset as an import file and return its path.
pub fn write_fixture(name: &str) -> String {
    let path = temp_out(name, "json");
    let body = serde_json::to_string_pretty(&sample_documents()).expect("serialize fixture");
    fs::write(&path, body).expect("write fixture");
    path
}

/// Initialize DB and import the sample dataset through the CLI
pub fn init_db_with_data(db_path: &str, name: &str) {
    ops()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    let fixture = write_fixture(name);
    ops()
        .args(["--db", db_path, "import", &fixture])
        .assert()
        .success();
}

/// Load the sample dataset into any store.
pub fn seed(store: &dyn DocumentStore) {
    let docs = opsboard::store::import::parse_documents(sample_documents()).expect("parse fixture");
    store.set_many(docs).expect("seed store");
}

/// Every event of a store, normalized.
pub fn all_events(store: &dyn DocumentStore) -> Vec<EventRecord> {
    let docs: Vec<Document> = store
        .query(&Query::collection_group("eventos"))
        .expect("query events");
    docs.iter()
        .filter_map(|d| EventRecord::from_document(d, offset()))
        .collect()
}

pub fn find<'a>(events: &'a [EventRecord], id: &str) -> &'a EventRecord {
    events.iter().find(|e| e.id == id).expect("event present")
}
