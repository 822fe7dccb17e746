// src/export/logic.rs

use crate::core::filter::Filters;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::to_exports;
use crate::export::pdf_report::{ReportOptions, export_pdf};
use crate::export::xlsx::export_xlsx;
use crate::models::EventRecord;
use crate::ui::messages::warning;
use std::path::{Path, PathBuf};

pub const NOTHING_TO_EXPORT: &str = "No events match the selected filters";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(PathBuf),
    /// The filtered set was empty; no file was created.
    NothingToExport,
}

/// High level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the (already filtered) events.
    ///
    /// - `format`: csv | json | xlsx | pdf
    /// - `file`: absolute path of the output file
    /// - `force`: overwrite without asking
    ///
    /// An empty event set only produces a warning.
    pub fn export(
        events: &[EventRecord],
        format: ExportFormat,
        file: &str,
        force: bool,
        opts: &ReportOptions,
    ) -> AppResult<ExportOutcome> {
        // nothing to write: no path or overwrite checks apply
        if events.is_empty() {
            warning(NOTHING_TO_EXPORT);
            return Ok(ExportOutcome::NothingToExport);
        }

        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&to_exports(events), path)?,
            ExportFormat::Json => export_json(&to_exports(events), path)?,
            ExportFormat::Xlsx => export_xlsx(events, path, &opts.title, &opts.generated)?,
            ExportFormat::Pdf => export_pdf(events, path, opts)?,
        }

        tracing::info!(format = format.as_str(), rows = events.len(), file, "export written");
        Ok(ExportOutcome::Written(path.to_path_buf()))
    }
}

/// One-line summary of the active filters for report subtitles.
pub fn describe_filters(f: &Filters) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(c) = f.client() {
        parts.push(format!("Cliente: {c}"));
    }
    if !f.eventos.is_empty() {
        parts.push(format!("Eventos: {}", f.eventos.join(", ")));
    }
    if let Some(u) = f.ubicacion.as_deref().filter(|s| !s.trim().is_empty()) {
        parts.push(format!("Ubicación: {u}"));
    }
    if let Some(g) = f.grupo.as_deref().filter(|s| !s.trim().is_empty()) {
        parts.push(format!("Grupo: {g}"));
    }

    let (from, to) = f.date_bounds();
    match (from, to) {
        (Some(a), Some(b)) => parts.push(format!(
            "Desde {} hasta {}",
            a.format("%d/%m/%Y"),
            b.format("%d/%m/%Y")
        )),
        (Some(a), None) => parts.push(format!("Desde {}", a.format("%d/%m/%Y"))),
        (None, Some(b)) => parts.push(format!("Hasta {}", b.format("%d/%m/%Y"))),
        (None, None) => {}
    }

    if let Some(q) = f.query() {
        parts.push(format!("Búsqueda: \"{q}\""));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}
