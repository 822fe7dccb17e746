// src/export/mod.rs

mod excel_date;
mod fs_utils;
mod json_csv;
pub mod logic;
mod model;
pub mod pdf;
pub mod pdf_report;
pub mod range;
mod xlsx;

pub use logic::{ExportLogic, ExportOutcome, describe_filters};
pub use model::{EventExport, to_exports};
pub use pdf_report::ReportOptions;

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message of every exporter.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}
