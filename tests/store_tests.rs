use opsboard::errors::AppError;
use opsboard::store::import::parse_documents;
use opsboard::store::{DocPath, Direction, DocumentStore, MemoryStore, Query, SqliteStore};
use serde_json::{Map, Value, json};

mod common;
use common::{offset, seed};

fn data(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => panic!("not an object"),
    }
}

fn both_stores() -> Vec<(&'static str, Box<dyn DocumentStore>)> {
    vec![
        ("sqlite", Box::new(SqliteStore::open_in_memory().expect("open sqlite"))),
        ("memory", Box::new(MemoryStore::new())),
    ]
}

#[test]
fn test_doc_path_validation() {
    let p = DocPath::parse("novedades/tgs/eventos/a1").unwrap();
    assert_eq!(p.collection(), "novedades/tgs/eventos");
    assert_eq!(p.collection_group(), "eventos");
    assert_eq!(p.id(), "a1");

    assert!(matches!(DocPath::parse("novedades/tgs/eventos"), Err(AppError::InvalidPath(_))));
    assert!(matches!(DocPath::parse("novedades//eventos/a1"), Err(AppError::InvalidPath(_))));
    assert!(matches!(DocPath::parse(""), Err(AppError::InvalidPath(_))));
}

#[test]
fn test_set_get_update_delete() {
    for (name, store) in both_stores() {
        let path = "novedades/tgs/eventos/x1";
        let r0 = store.revision().unwrap();

        store.set(path, data(json!({"evento-tgs": "Alarma"}))).unwrap();
        let r1 = store.revision().unwrap();
        assert!(r1 > r0, "{name}: revision must grow on write");

        store
            .update_fields(path, data(json!({"resolucion": "ok"})))
            .unwrap();
        let doc = store.get(path).unwrap().expect("document exists");
        assert_eq!(doc.id, "x1");
        assert_eq!(doc.data["evento-tgs"], "Alarma", "{name}: merge keeps other fields");
        assert_eq!(doc.data["resolucion"], "ok");

        assert!(store.delete(path).unwrap());
        assert!(!store.delete(path).unwrap(), "{name}: second delete finds nothing");
        assert!(store.get(path).unwrap().is_none());
    }
}

#[test]
fn test_update_missing_document_fails() {
    for (name, store) in both_stores() {
        let err = store
            .update_fields("novedades/tgs/eventos/none", data(json!({"a": 1})))
            .unwrap_err();
        assert!(matches!(err, AppError::DocumentNotFound(_)), "{name}: {err}");
    }
}

#[test]
fn test_collection_query_is_scoped() {
    for (name, store) in both_stores() {
        seed(store.as_ref());

        let tgs = store.query(&Query::collection("novedades/tgs/eventos")).unwrap();
        assert_eq!(tgs.len(), 3, "{name}");
        assert!(tgs.iter().all(|d| d.path.starts_with("novedades/tgs/eventos/")));

        let all = store.query(&Query::collection_group("eventos")).unwrap();
        assert_eq!(all.len(), 6, "{name}");
    }
}

#[test]
fn test_ordered_query_puts_undated_last_and_limits() {
    for (name, store) in both_stores() {
        seed(store.as_ref());
        store
            .set("novedades/vtv/eventos/v2", data(json!({"evento-vtv": "Falla", "fechaHoraEnvio": "2025-09-01T00:00:00Z"})))
            .unwrap();

        let q = Query::collection("novedades/vtv/eventos")
            .order_by(&["fechaHoraEnvio", "fecha"], Direction::Desc);
        let docs = store.query(&q).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["v2", "v1"], "{name}");

        let q = Query::collection("novedades/tgs/eventos")
            .order_by(&["fechaHoraEnvio", "fecha"], Direction::Desc)
            .limit(Some(2));
        let docs = store.query(&q).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        // t3 is 2025-08-02 00:00 local, newer than both t1 and t2
        assert_eq!(ids, vec!["t3", "t2"], "{name}");
    }
}

#[test]
fn test_ordering_reads_naive_timestamps_in_query_offset() {
    for (name, store) in both_stores() {
        // 22:00 at -03:00 is 01:00Z, half an hour after the explicit one
        store
            .set("novedades/tgs/eventos/naive", data(json!({"fecha": "2025-08-01 22:00:00"})))
            .unwrap();
        store
            .set("novedades/tgs/eventos/zoned", data(json!({"fecha": "2025-08-02T00:30:00Z"})))
            .unwrap();

        let q = Query::collection("novedades/tgs/eventos")
            .order_by(&["fecha"], Direction::Desc)
            .limit(Some(1));

        let docs = store.query(&q.clone().in_offset(offset())).unwrap();
        assert_eq!(docs[0].id, "naive", "{name}");

        let docs = store.query(&q).unwrap();
        assert_eq!(docs[0].id, "zoned", "{name}: plain queries read naive times as UTC");
    }
}

#[test]
fn test_parse_documents_both_layouts() {
    let as_array = json!([
        {"path": "novedades/tgs/eventos/a", "data": {"evento-tgs": "X"}},
        {"path": "novedades/vtv/eventos/b", "data": {}}
    ]);
    assert_eq!(parse_documents(as_array).unwrap().len(), 2);

    let as_map = json!({"novedades/tgs/eventos/a": {"evento-tgs": "X"}});
    let docs = parse_documents(as_map).unwrap();
    assert_eq!(docs[0].0, "novedades/tgs/eventos/a");

    let bad = json!([{"data": {}}]);
    assert!(matches!(parse_documents(bad), Err(AppError::InvalidDocument(_))));

    let odd_path = json!({"novedades/tgs": {}});
    assert!(matches!(parse_documents(odd_path), Err(AppError::InvalidPath(_))));

    assert!(parse_documents(json!(42)).is_err());
}

#[test]
fn test_sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("store.sqlite");
    let file = file.to_string_lossy().to_string();

    {
        let store = SqliteStore::open(&file).unwrap();
        seed(&store);
    }

    let store = SqliteStore::open(&file).unwrap();
    let docs = store.query(&Query::collection_group("eventos")).unwrap();
    assert_eq!(docs.len(), 6);
    assert!(store.revision().unwrap() > 0);
}
