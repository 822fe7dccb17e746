use opsboard::core::dashboard::DashboardSession;
use opsboard::core::filter::Filters;
use opsboard::core::kpi::Shift;
use opsboard::errors::{AppError, AppResult};
use opsboard::store::{Document, DocumentStore, MemoryStore, Query, SnapshotHub, SqliteStore};
use serde_json::{Map, Value, json};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

mod common;
use common::{offset, seed};

fn data(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => panic!("not an object"),
    }
}

#[test]
fn test_subscribe_delivers_initial_snapshot() {
    let store = MemoryStore::new();
    seed(&store);

    let hub = SnapshotHub::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let _handle = hub
        .subscribe(&store, Query::collection("novedades/tgs/eventos"), move |snap| {
            sink.borrow_mut().push(snap.docs.len());
        })
        .unwrap();

    assert_eq!(*seen.borrow(), vec![3]);
    assert_eq!(hub.listener_count(), 1);
}

#[test]
fn test_poll_delivers_only_relevant_changes() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed(&store);

    let hub = SnapshotHub::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _handle = hub
        .subscribe(&store, Query::collection("novedades/tgs/eventos"), move |snap| {
            sink.borrow_mut().push(snap.docs.len());
        })
        .unwrap();

    // nothing changed
    assert_eq!(hub.poll(&store).unwrap(), 0);

    // a write to another collection bumps the revision but not this result
    store
        .set("novedades/vtv/eventos/v9", data(json!({"evento-vtv": "X"})))
        .unwrap();
    assert_eq!(hub.poll(&store).unwrap(), 0);

    store
        .set("novedades/tgs/eventos/t9", data(json!({"evento-tgs": "Y"})))
        .unwrap();
    assert_eq!(hub.poll(&store).unwrap(), 1);
    assert_eq!(*seen.borrow(), vec![3, 4]);
}

/// Store whose queries fail while `failing` is set.
struct FlakyStore {
    inner: MemoryStore,
    failing: Cell<bool>,
}

impl DocumentStore for FlakyStore {
    fn get(&self, path: &str) -> AppResult<Option<Document>> {
        self.inner.get(path)
    }

    fn set(&self, path: &str, data: Map<String, Value>) -> AppResult<()> {
        self.inner.set(path, data)
    }

    fn update_fields(&self, path: &str, fields: Map<String, Value>) -> AppResult<()> {
        self.inner.update_fields(path, fields)
    }

    fn delete(&self, path: &str) -> AppResult<bool> {
        self.inner.delete(path)
    }

    fn query(&self, q: &Query) -> AppResult<Vec<Document>> {
        if self.failing.get() {
            return Err(AppError::Other("store unavailable".into()));
        }
        self.inner.query(q)
    }

    fn revision(&self) -> AppResult<i64> {
        self.inner.revision()
    }
}

#[test]
fn test_failed_poll_is_retried_after_recovery() {
    let store = FlakyStore {
        inner: MemoryStore::new(),
        failing: Cell::new(false),
    };

    let hub = SnapshotHub::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _handle = hub
        .subscribe(&store, Query::collection("novedades/tgs/eventos"), move |snap| {
            sink.borrow_mut().push(snap.docs.len());
        })
        .unwrap();
    assert_eq!(*seen.borrow(), vec![0]);

    store
        .set("novedades/tgs/eventos/t9", data(json!({"evento-tgs": "Ingreso"})))
        .unwrap();

    store.failing.set(true);
    assert!(hub.poll(&store).is_err());
    assert_eq!(*seen.borrow(), vec![0]);

    // no further writes: the pending change must still arrive
    store.failing.set(false);
    assert_eq!(hub.poll(&store).unwrap(), 1);
    assert_eq!(*seen.borrow(), vec![0, 1]);
    assert_eq!(hub.poll(&store).unwrap(), 0);
}

#[test]
fn test_dropping_handle_unsubscribes() {
    let store = MemoryStore::new();
    let hub = SnapshotHub::new();
    let count = Rc::new(RefCell::new(0));
    let c = Rc::clone(&count);

    let handle = hub
        .subscribe(&store, Query::collection_group("eventos"), move |_| {
            *c.borrow_mut() += 1;
        })
        .unwrap();
    assert_eq!(hub.listener_count(), 1);

    drop(handle);
    assert_eq!(hub.listener_count(), 0);

    store
        .set("novedades/tgs/eventos/a", data(json!({})))
        .unwrap();
    assert_eq!(hub.poll(&store).unwrap(), 0);
    assert_eq!(*count.borrow(), 1, "only the initial snapshot was delivered");
}

#[test]
fn test_explicit_unsubscribe_and_hub_outliving() {
    let store = MemoryStore::new();
    let handle = {
        let hub = SnapshotHub::new();
        let h = hub
            .subscribe(&store, Query::collection_group("eventos"), |_| {})
            .unwrap();
        assert_eq!(hub.listener_count(), 1);
        h
    };
    // the hub is gone; releasing the handle must be harmless
    handle.unsubscribe();
}

#[test]
fn test_session_starts_limited_and_expands_once() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed(&store);

    let mut session = DashboardSession::open_with(&store, offset(), Some(1), Shift::default()).unwrap();
    assert!(session.is_limited());
    assert_eq!(session.listener_count(), 5);
    // one document per non-empty client: tgs, edificios, vtv
    assert_eq!(session.events().len(), 3);

    // a short query does not count as a narrowing filter
    session
        .set_filters(Filters {
            q: Some("a".into()),
            ..Filters::default()
        })
        .unwrap();
    assert!(session.is_limited());

    session
        .set_filters(Filters {
            cliente: Some("TGS".into()),
            ..Filters::default()
        })
        .unwrap();
    assert!(!session.is_limited());
    assert_eq!(session.events().len(), 6);
    assert_eq!(session.filtered().len(), 3);
    assert_eq!(session.listener_count(), 5, "old listeners were released");
}

#[test]
fn test_session_poll_replaces_client_slice() {
    let store = MemoryStore::new();
    seed(&store);

    let session = DashboardSession::open_with(&store, offset(), None, Shift::default()).unwrap();
    let before = session.deliveries();
    assert_eq!(session.events().len(), 6);

    store.delete("novedades/vtv/eventos/v1").unwrap();
    assert_eq!(session.poll().unwrap(), 1);
    assert_eq!(session.deliveries(), before + 1);

    let events = session.events();
    assert_eq!(events.len(), 5);
    assert!(events.iter().all(|e| e.cliente != "VTV"));
}

#[test]
fn test_session_selector_options() {
    let store = MemoryStore::new();
    seed(&store);

    let mut session = DashboardSession::open_with(&store, offset(), None, Shift::default()).unwrap();
    let opts = session.options();
    assert!(opts.clientes.contains(&"TGS".to_string()));
    assert!(opts.clientes.contains(&"Edificios".to_string()));

    session
        .set_filters(Filters {
            cliente: Some("Edificios".into()),
            ..Filters::default()
        })
        .unwrap();
    let mut grupos = session.options().grupos;
    grupos.sort();
    assert_eq!(grupos, vec!["Torre A".to_string(), "Torre B".to_string()]);
    let opts = session.options();
    assert!(!opts.eventos.contains(&"Alarma".to_string()));
}
