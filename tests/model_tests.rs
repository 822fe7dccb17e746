use chrono::{Datelike, Timelike};
use opsboard::models::timestamp::{parse_str, parse_value};
use opsboard::models::{ClientProfile, EventRecord};
use opsboard::store::MemoryStore;
use serde_json::{Map, Value, json};

mod common;
use common::{all_events, find, offset, seed};

fn obj(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => panic!("not an object"),
    }
}

#[test]
fn test_timestamp_shapes() {
    let off = offset();

    let rfc = parse_value(&json!("2025-08-01T13:00:00Z"), off).unwrap();
    assert_eq!(rfc.hour(), 10, "converted into the operations offset");

    let naive = parse_value(&json!("2025-08-01 10:00:00"), off).unwrap();
    assert_eq!(naive, rfc);

    let display = parse_value(&json!("01/08/2025, 10:00:00"), off).unwrap();
    assert_eq!(display, rfc);

    let wrapped = parse_value(&json!({"seconds": 1754053200, "nanoseconds": 0}), off).unwrap();
    assert_eq!(wrapped, rfc);

    let underscored = parse_value(&json!({"_seconds": 1754053200}), off).unwrap();
    assert_eq!(underscored, rfc);
}

#[test]
fn test_epoch_seconds_and_millis() {
    let off = offset();
    let secs = parse_value(&json!(1754053200), off).unwrap();
    let millis = parse_value(&json!(1754053200000i64), off).unwrap();
    assert_eq!(secs, millis);
    assert_eq!((secs.day(), secs.hour()), (1, 10));
}

#[test]
fn test_unparseable_timestamps_are_none() {
    let off = offset();
    assert!(parse_value(&Value::Null, off).is_none());
    assert!(parse_value(&json!(""), off).is_none());
    assert!(parse_value(&json!("ayer"), off).is_none());
    assert!(parse_value(&json!({"foo": 1}), off).is_none());
    assert!(parse_str("2025-13-40", off).is_none());
}

#[test]
fn test_client_profiles() {
    let p = ClientProfile::for_path("novedades/edificios/eventos/x").unwrap();
    assert!(p.is_buildings());
    assert_eq!(p.name, "Edificios");
    assert_eq!(p.collection_path(), "novedades/edificios/eventos");

    let unknown = ClientProfile::for_key("puertos");
    assert_eq!(unknown.name, "Puertos");
    assert_eq!(unknown.event_key, "evento-puertos");

    assert!(ClientProfile::for_path("otra/cosa").is_none());
    assert_eq!(ClientProfile::all().len(), 5);
}

#[test]
fn test_event_normalization() {
    let store = MemoryStore::new();
    seed(&store);
    let events = all_events(&store);

    let e1 = find(&events, "e1");
    assert_eq!(e1.cliente, "Edificios");
    assert_eq!(e1.ubicacion, "Torre A - 5B");
    assert_eq!(e1.grupo, "Torre A");
    assert_eq!(e1.observacion, "Se cerró la puerta");
    // filters use the incident time, tables the send time
    assert_eq!(e1.filter_date().unwrap().day(), 2);
    assert_eq!(e1.display_date().unwrap().day(), 3);

    let t1 = find(&events, "t1");
    assert_eq!(t1.grupo, "Planta");
    assert_eq!(t1.proveedor, "Acme");
    assert_eq!(t1.fecha_text(), "01/08/2025, 10:00:00");

    let v1 = find(&events, "v1");
    assert!(v1.fecha.is_none());
    assert_eq!(v1.fecha_text(), "Sin Fecha");
    assert_eq!(v1.observacion, "Sin Observación");
}

#[test]
fn test_event_defaults_for_missing_fields() {
    let profile = ClientProfile::for_key("barrios");
    let e = EventRecord::from_data(
        "b1",
        "novedades/barrios/eventos/b1",
        &profile,
        &obj(json!({"evento": "Ronda", "resolucion": ""})),
        offset(),
    );
    assert_eq!(e.evento, "Ronda");
    assert_eq!(e.ubicacion, "Sin Ubicación");
    assert_eq!(e.grupo, "General");
    assert_eq!(e.resolucion, "");

    let empty = EventRecord::from_data("b2", "novedades/barrios/eventos/b2", &profile, &Map::new(), offset());
    assert_eq!(empty.evento, "Sin Evento");
}
