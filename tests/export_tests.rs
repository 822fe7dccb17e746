use chrono::NaiveDate;
use opsboard::core::kpi::Shift;
use opsboard::export::pdf_report::{ROWS_PER_PAGE, build_pdf};
use opsboard::export::{ExportFormat, ExportLogic, ExportOutcome, ReportOptions};
use opsboard::models::EventRecord;
use opsboard::store::MemoryStore;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::Path;

mod common;
use common::{all_events, init_db_with_data, ops, seed, setup_test_db, temp_out};

fn options() -> ReportOptions {
    ReportOptions {
        title: "Reporte de Monitoreo".into(),
        generated: "10/08/2025, 09:00:00".into(),
        subtitle: Some("Cliente: TGS".into()),
        shift: Shift::default(),
        today: NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
        client: None,
    }
}

#[test]
fn test_empty_export_warns_and_writes_nothing() {
    let db_path = setup_test_db("export_empty");
    init_db_with_data(&db_path, "export_empty");

    for (format, ext) in [("pdf", "pdf"), ("xlsx", "xlsx"), ("csv", "csv"), ("json", "json")] {
        let out = temp_out(&format!("export_empty_{ext}"), ext);

        ops()
            .args([
                "--db",
                &db_path,
                "export",
                "--format",
                format,
                "--file",
                &out,
                "--cliente",
                "Nadie",
            ])
            .assert()
            .success()
            .stdout(contains("No events match the selected filters"));

        assert!(!Path::new(&out).exists(), "{format}: no file expected");
    }
}

#[test]
fn test_empty_export_leaves_existing_file_alone() {
    let db_path = setup_test_db("export_empty_existing");
    init_db_with_data(&db_path, "export_empty_existing");

    let out = temp_out("export_empty_existing", "csv");
    fs::write(&out, "previous").unwrap();

    // no overwrite prompt: the empty check comes first
    ops()
        .args([
            "--db", &db_path, "export", "--format", "csv", "--file", &out, "--range", "1999",
        ])
        .assert()
        .success()
        .stdout(contains("No events match").and(contains("Overwrite").not()));

    assert_eq!(fs::read_to_string(&out).unwrap(), "previous");
}

#[test]
fn test_export_csv() {
    let db_path = setup_test_db("export_csv");
    init_db_with_data(&db_path, "export_csv");
    let out = temp_out("export_csv", "csv");

    ops()
        .args(["--db", &db_path, "export", "--format", "csv", "--file", &out, "--cliente", "TGS"])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("cliente,evento,ubicacion,fecha"));
    assert_eq!(lines.count(), 3);
    assert!(content.contains("Planta Norte"));
}

#[test]
fn test_export_json() {
    let db_path = setup_test_db("export_json");
    init_db_with_data(&db_path, "export_json");
    let out = temp_out("export_json", "json");

    ops()
        .args(["--db", &db_path, "export", "--format", "json", "--file", &out])
        .assert()
        .success();

    let v: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let rows = v.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().any(|r| r["fecha_iso"] == "2025-08-01T10:00:00-03:00"));
}

#[test]
fn test_export_pdf_and_xlsx() {
    let db_path = setup_test_db("export_binary");
    init_db_with_data(&db_path, "export_binary");

    let pdf = temp_out("export_binary", "pdf");
    ops()
        .args(["--db", &db_path, "export", "--file", &pdf, "--title", "Informe"])
        .assert()
        .success()
        .stdout(contains("PDF export completed"));
    assert!(fs::read(&pdf).unwrap().starts_with(b"%PDF"));

    let xlsx = temp_out("export_binary", "xlsx");
    ops()
        .args(["--db", &db_path, "export", "--format", "xlsx", "--file", &xlsx])
        .assert()
        .success();
    // xlsx is a zip container
    assert!(fs::read(&xlsx).unwrap().starts_with(b"PK"));

    ops()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("export"));
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = setup_test_db("export_relative");
    init_db_with_data(&db_path, "export_relative");

    ops()
        .args(["--db", &db_path, "export", "--format", "csv", "--file", "out.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_empty_export_with_relative_path_only_warns() {
    let db_path = setup_test_db("export_empty_relative");
    init_db_with_data(&db_path, "export_empty_relative");

    ops()
        .args([
            "--db", &db_path, "export", "--format", "pdf", "--file", "report.pdf", "--cliente", "Nadie",
        ])
        .assert()
        .success()
        .stdout(contains("No events match the selected filters"))
        .stderr(contains("must be absolute").not());

    assert!(!Path::new("report.pdf").exists());

    let outcome = ExportLogic::export(&[], ExportFormat::Pdf, "report.pdf", false, &options()).unwrap();
    assert_eq!(outcome, ExportOutcome::NothingToExport);
}

#[test]
fn test_existing_file_needs_confirmation_or_force() {
    let db_path = setup_test_db("export_overwrite");
    init_db_with_data(&db_path, "export_overwrite");
    let out = temp_out("export_overwrite", "json");
    fs::write(&out, "[]").unwrap();

    ops()
        .args(["--db", &db_path, "export", "--format", "json", "--file", &out])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("not overwritten"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "[]");

    ops()
        .args(["--db", &db_path, "export", "--format", "json", "--file", &out, "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&out).unwrap().len() > 2);
}

#[test]
fn test_export_logic_without_events() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("r.pdf");

    let outcome = ExportLogic::export(&[], ExportFormat::Pdf, &file.to_string_lossy(), false, &options()).unwrap();
    assert_eq!(outcome, ExportOutcome::NothingToExport);
    assert!(!file.exists());
}

#[test]
fn test_pdf_report_spans_several_pages() {
    let store = MemoryStore::new();
    seed(&store);
    let base = all_events(&store);

    let events: Vec<EventRecord> = base.iter().cycle().take(ROWS_PER_PAGE * 3).cloned().collect();
    let small = build_pdf(&base, &options()).unwrap();
    let large = build_pdf(&events, &options()).unwrap();

    assert!(small.starts_with(b"%PDF"));
    assert!(large.starts_with(b"%PDF"));
    assert!(large.len() > small.len());
}
