use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;

mod common;
use common::{init_db_with_data, ops, setup_test_db};

fn list_json(db_path: &str, extra: &[&str]) -> Vec<Value> {
    let mut args = vec!["--db", db_path, "list", "--json", "--page-size", "150"];
    args.extend_from_slice(extra);

    let out = ops().args(&args).output().expect("run list");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let v: Value = serde_json::from_slice(&out.stdout).expect("valid json");
    v.as_array().cloned().expect("json array")
}

#[test]
fn test_init_and_import() {
    let db_path = setup_test_db("cli_init_import");

    ops()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    let fixture = common::write_fixture("cli_init_import");
    ops()
        .args(["--db", &db_path, "import", &fixture])
        .assert()
        .success()
        .stdout(contains("6 document(s) imported."));

    ops()
        .args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Total documents").and(contains("novedades/tgs/eventos: 3")));
}

#[test]
fn test_import_rejects_bad_file() {
    let db_path = setup_test_db("cli_bad_import");
    let bad = common::temp_out("cli_bad_import", "json");
    std::fs::write(&bad, r#"[{"path": "novedades/tgs", "data": {}}]"#).unwrap();

    ops()
        .args(["--db", &db_path, "import", &bad])
        .assert()
        .failure()
        .stderr(contains("Invalid document path"));
}

#[test]
fn test_list_table_and_footer() {
    let db_path = setup_test_db("cli_list_table");
    init_db_with_data(&db_path, "cli_list_table");

    ops()
        .args(["--db", &db_path, "list", "--page-size", "10"])
        .assert()
        .success()
        .stdout(contains("Planta Norte").and(contains("1–6 de 6")));
}

#[test]
fn test_list_filters_and_json() {
    let db_path = setup_test_db("cli_list_json");
    init_db_with_data(&db_path, "cli_list_json");

    assert_eq!(list_json(&db_path, &[]).len(), 6);
    assert_eq!(list_json(&db_path, &["--cliente", "TGS"]).len(), 3);
    assert_eq!(list_json(&db_path, &["--cliente", "Todos"]).len(), 6);
    assert_eq!(list_json(&db_path, &["--range", "2025-08-02"]).len(), 2);
    assert_eq!(list_json(&db_path, &["-q", "forzada"]).len(), 1);

    let rows = list_json(&db_path, &["--sort", "fecha", "--desc"]);
    assert_eq!(rows[0]["path"], "novedades/edificios/eventos/e2");
    assert_eq!(rows[5]["fecha"], "Sin Fecha");
}

#[test]
fn test_json_on_fresh_database_is_clean() {
    // first open runs the migrations
    let db_path = setup_test_db("cli_fresh_json");
    assert_eq!(list_json(&db_path, &[]).len(), 0);
}

#[test]
fn test_list_rejects_bad_paging_and_sorting() {
    let db_path = setup_test_db("cli_list_errors");
    init_db_with_data(&db_path, "cli_list_errors");

    ops()
        .args(["--db", &db_path, "list", "--page-size", "7"])
        .assert()
        .failure()
        .stderr(contains("Invalid page size 7"));

    ops()
        .args(["--db", &db_path, "list", "--page-size", "10", "--page", "3"])
        .assert()
        .failure()
        .stderr(contains("out of range"));

    ops()
        .args(["--db", &db_path, "list", "--sort", "observacion"])
        .assert()
        .failure()
        .stderr(contains("not sortable"));

    ops()
        .args(["--db", &db_path, "list", "--from", "01/08/2025"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_stats_cards() {
    let db_path = setup_test_db("cli_stats");
    init_db_with_data(&db_path, "cli_stats");

    ops()
        .args(["--db", &db_path, "stats"])
        .assert()
        .success()
        .stdout(
            contains("Total de eventos")
                .and(contains("Planta Norte (2)"))
                .and(contains("Ago 2025: 5"))
                .and(contains("Ingresos"))
                .and(contains("Puerta forzada")),
        );

    ops()
        .args(["--db", &db_path, "stats", "--cliente", "VTV"])
        .assert()
        .success()
        .stdout(contains("Total de eventos").and(contains("TGS").not()));
}

#[test]
fn test_stats_on_empty_store_show_loading() {
    let db_path = setup_test_db("cli_stats_empty");
    ops()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    ops()
        .args(["--db", &db_path, "stats"])
        .assert()
        .success()
        .stdout(contains("Cargando…"));
}

#[test]
fn test_charts() {
    let db_path = setup_test_db("cli_charts");
    init_db_with_data(&db_path, "cli_charts");

    ops()
        .args(["--db", &db_path, "chart", "bar"])
        .assert()
        .success()
        .stdout(contains("Eventos por tipo").and(contains("Alarma")));

    ops()
        .args(["--db", &db_path, "chart", "pie"])
        .assert()
        .success()
        .stdout(contains("TGS").and(contains("50.0%")));

    ops()
        .args(["--db", &db_path, "chart", "doughnut"])
        .assert()
        .success()
        .stdout(contains("Noche"));

    // the sample data is far older than the trend window
    ops()
        .args(["--db", &db_path, "chart", "line", "--days", "7"])
        .assert()
        .success()
        .stdout(contains("No hay datos para mostrar"));
}

#[test]
fn test_line_chart_rejects_out_of_range_days() {
    let db_path = setup_test_db("cli_chart_days");
    init_db_with_data(&db_path, "cli_chart_days");

    for days in ["1000000000000", "0"] {
        ops()
            .args(["--db", &db_path, "chart", "line", "--days", days])
            .assert()
            .failure()
            .stderr(contains("Invalid date range"));
    }
}

#[test]
fn test_edit_event() {
    let db_path = setup_test_db("cli_edit");
    init_db_with_data(&db_path, "cli_edit");

    ops()
        .args(["--db", &db_path, "edit", "t1", "--resolucion", "Resuelto en sitio"])
        .assert()
        .success()
        .stdout(contains("novedades/tgs/eventos/t1 updated"));

    let rows = list_json(&db_path, &["-q", "resuelto"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["resolucion"], "Resuelto en sitio");

    ops()
        .args([
            "--db",
            &db_path,
            "edit",
            "novedades/edificios/eventos/e2",
            "--fecha",
            "2025-09-01 12:00",
        ])
        .assert()
        .success();

    let rows = list_json(&db_path, &["--range", "2025-09"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["fecha"], "01/09/2025, 12:00:00");

    ops()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("edit").and(contains("import")));
}

#[test]
fn test_edit_errors() {
    let db_path = setup_test_db("cli_edit_errors");
    init_db_with_data(&db_path, "cli_edit_errors");

    ops()
        .args(["--db", &db_path, "edit", "nope", "--observacion", "x"])
        .assert()
        .failure()
        .stderr(contains("Document not found"));

    ops()
        .args(["--db", &db_path, "edit", "t1", "--fecha", "mañana"])
        .assert()
        .failure()
        .stderr(contains("Invalid timestamp"));

    ops()
        .args(["--db", &db_path, "edit", "t1"])
        .assert()
        .success()
        .stdout(contains("Nothing to edit"));
}

#[test]
fn test_delete_event() {
    let db_path = setup_test_db("cli_del");
    init_db_with_data(&db_path, "cli_del");

    ops()
        .args(["--db", &db_path, "del", "v1", "--yes"])
        .assert()
        .success()
        .stdout(contains("has been deleted"));

    assert_eq!(list_json(&db_path, &[]).len(), 5);

    ops()
        .args(["--db", &db_path, "del", "v1", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Document not found"));
}

#[test]
fn test_delete_cancelled_without_confirmation() {
    let db_path = setup_test_db("cli_del_cancel");
    init_db_with_data(&db_path, "cli_del_cancel");

    ops()
        .args(["--db", &db_path, "del", "t1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    assert_eq!(list_json(&db_path, &[]).len(), 6);
}

#[test]
fn test_watch_runs_bounded() {
    let db_path = setup_test_db("cli_watch");
    init_db_with_data(&db_path, "cli_watch");

    ops()
        .args(["--db", &db_path, "watch", "--interval", "1", "--count", "1"])
        .assert()
        .success()
        .stdout(contains("Watching 5 listener(s)").and(contains("Total de eventos")));
}

#[test]
fn test_db_check_and_vacuum() {
    let db_path = setup_test_db("cli_db_check");
    init_db_with_data(&db_path, "cli_db_check");

    ops()
        .args(["--db", &db_path, "db", "--check", "--vacuum", "--migrate"])
        .assert()
        .success()
        .stdout(
            contains("Integrity check passed")
                .and(contains("Vacuum completed"))
                .and(contains("Migration completed")),
        );
}
