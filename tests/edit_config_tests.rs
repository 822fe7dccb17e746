use opsboard::config::Config;
use opsboard::config::migrate::missing_keys;
use opsboard::core::config::ConfigLogic;
use opsboard::core::edit::{EditLogic, EventEdit, resolve_path};
use opsboard::errors::AppError;
use opsboard::store::{DocumentStore, MemoryStore};
use serde_json::{Map, json};
use std::fs;

mod common;
use common::{offset, seed};

#[test]
fn test_resolve_bare_id_and_full_path() {
    let store = MemoryStore::new();
    seed(&store);

    assert_eq!(resolve_path(&store, "e1").unwrap(), "novedades/edificios/eventos/e1");
    assert_eq!(
        resolve_path(&store, "/novedades/tgs/eventos/t1/").unwrap(),
        "novedades/tgs/eventos/t1"
    );
    assert!(matches!(resolve_path(&store, "zz"), Err(AppError::DocumentNotFound(_))));

    store.set("novedades/vtv/eventos/t1", Map::new()).unwrap();
    assert!(matches!(resolve_path(&store, "t1"), Err(AppError::InvalidPath(_))));
}

#[test]
fn test_edit_writes_client_field_names() {
    let store = MemoryStore::new();
    seed(&store);

    let edit = EventEdit {
        observacion: Some("  revisado  ".into()),
        respuesta: Some("ok".into()),
        fecha: Some("2025-08-05 09:15".into()),
        ..EventEdit::default()
    };
    let path = EditLogic::apply(&store, "e2", &edit, offset()).unwrap();

    let doc = store.get(&path).unwrap().unwrap();
    assert_eq!(doc.data["observaciones-edificios"], "revisado");
    assert_eq!(doc.data["respuesta-residente"], "ok");
    assert_eq!(doc.data["respuesta"], "ok");
    assert_eq!(doc.data["fechaHoraEnvio"], "2025-08-05T09:15:00-03:00");
    assert_eq!(doc.data["fechaHoraEvento"], "2025-08-05T09:15:00-03:00");
    assert_eq!(doc.data["evento-edificio"], "Puerta forzada");

    let tgs = EventEdit {
        fecha: Some("2025-08-05 09:15".into()),
        ..EventEdit::default()
    };
    EditLogic::apply(&store, "t1", &tgs, offset()).unwrap();
    let doc = store.get("novedades/tgs/eventos/t1").unwrap().unwrap();
    assert!(doc.data.get("fechaHoraEvento").is_none());

    assert!(EditLogic::apply(&store, "t1", &EventEdit::default(), offset()).is_err());
}

#[test]
fn test_delete_event() {
    let store = MemoryStore::new();
    seed(&store);

    assert_eq!(EditLogic::delete(&store, "v1").unwrap(), "novedades/vtv/eventos/v1");
    assert_eq!(store.len(), 5);
    assert!(EditLogic::delete(&store, "novedades/vtv/eventos/v1").is_err());
}

#[test]
fn test_config_migrate_fills_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("opsboard.conf");
    fs::write(&path, "utc_offset: \"+01:00\"\npage_size: 20\n").unwrap();

    let missing = missing_keys(&path).unwrap();
    assert!(missing.contains(&"initial_limit".to_string()));
    assert!(!missing.contains(&"page_size".to_string()));

    let added = ConfigLogic::migrate(&path).unwrap();
    assert_eq!(added.len(), missing.len());
    assert_eq!(ConfigLogic::check(&path).unwrap(), 0);

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.page_size, 20, "user values are kept");
    assert_eq!(cfg.utc_offset, "+01:00");
    assert_eq!(cfg.initial_limit, 100);
}

#[test]
fn test_config_migrate_creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("opsboard.conf");

    assert!(ConfigLogic::migrate(&path).unwrap().is_empty());
    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.report_title, "Reporte de Monitoreo");
}

#[test]
fn test_offsets() {
    let cfg = Config {
        utc_offset: "-03:00".into(),
        ..Config::default()
    };
    assert_eq!(cfg.offset().unwrap(), offset());

    for bad in ["03:00", "+25:00", "-03", "abc"] {
        let cfg = Config {
            utc_offset: bad.into(),
            ..Config::default()
        };
        assert!(matches!(cfg.offset(), Err(AppError::InvalidOffset(_))), "{bad}");
    }
}

#[test]
fn test_document_payload_round_trip() {
    let store = MemoryStore::new();
    let data = json!({"a": [1, 2], "b": {"c": null}});
    let Some(map) = data.as_object().cloned() else {
        panic!("object expected");
    };
    store.set("x/y", map.clone()).unwrap();
    assert_eq!(store.get("x/y").unwrap().unwrap().data, map);
}
