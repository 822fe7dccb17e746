// src/export/pdf_report.rs

use crate::core::charts::{TREND_DAYS, daily_trend, events_by_client, events_by_type, top_locations};
use crate::core::kpi::{KpiView, Shift, global};
use crate::errors::{AppError, AppResult};
use crate::export::model::{events_to_table, get_headers};
use crate::export::notify_export_success;
use crate::export::pdf::PdfManager;
use crate::models::EventRecord;
use crate::ui::messages::info;
use chrono::NaiveDate;
use std::path::Path;

pub const ROWS_PER_PAGE: usize = 30;

/// Everything the report needs besides the events themselves.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// Already formatted "DD/MM/YYYY, HH:MM:SS".
    pub generated: String,
    /// One line describing the active filters.
    pub subtitle: Option<String>,
    pub shift: Shift,
    /// Last day of the daily trend chart.
    pub today: NaiveDate,
    /// Selected client, drives the trend categories.
    pub client: Option<String>,
}

/// KPI block of the cover page.
fn kpi_pairs(events: &[&EventRecord], shift: Shift) -> Vec<(String, String)> {
    match global(events, shift) {
        KpiView::Loading => vec![("Total de eventos".into(), "0".into())],
        KpiView::Ready(k) => {
            let (top, count) = k
                .top_event
                .map(|(name, n)| (name, n.to_string()))
                .unwrap_or_else(|| ("-".into(), "0".into()));
            vec![
                ("Total de eventos".into(), k.total.to_string()),
                ("Evento más frecuente".into(), top),
                ("Cantidad".into(), count),
            ]
        }
    }
}

/// Build the report in memory.
pub fn build_pdf(events: &[EventRecord], opts: &ReportOptions) -> AppResult<Vec<u8>> {
    let refs: Vec<&EventRecord> = events.iter().collect();

    let charts = vec![
        events_by_type(&refs),
        top_locations(&refs, 5),
        daily_trend(&refs, opts.client.as_deref(), opts.today, TREND_DAYS)?,
        events_by_client(&refs),
    ];

    let mut pdf = PdfManager::new();
    let y = pdf.write_heading(&opts.title, &opts.generated, opts.subtitle.as_deref());
    let y = pdf.write_kpis(y, &kpi_pairs(&refs, opts.shift));
    pdf.write_charts(y, &charts);

    pdf.write_table(&get_headers(), &events_to_table(events), ROWS_PER_PAGE);

    tracing::debug!(pages = pdf.page_count(), rows = events.len(), "pdf report laid out");

    pdf.finish()
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))
}

pub(crate) fn export_pdf(events: &[EventRecord], path: &Path, opts: &ReportOptions) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let bytes = build_pdf(events, opts)?;
    std::fs::write(path, bytes)?;

    notify_export_success("PDF", path);
    Ok(())
}
