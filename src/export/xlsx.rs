// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::excel_date::{DATETIME_FORMAT, excel_serial};
use crate::export::model::{events_to_table, get_headers};
use crate::export::notify_export_success;
use crate::models::EventRecord;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Index of the "Fecha" column.
const DATE_COL: usize = 3;
/// Title, generated-at, blank line; the header goes on the next row.
const HEADER_ROW: u32 = 3;
const MAX_COL_WIDTH: usize = 60;

/// Export XLSX: title block, styled header, banded rows, fitted widths.
pub(crate) fn export_xlsx(
    events: &[EventRecord],
    path: &Path,
    title: &str,
    generated: &str,
) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Eventos").map_err(to_app_error)?;

    // ---------------------------
    // Title block
    // ---------------------------
    let title_format = Format::new().set_bold().set_font_size(14);
    worksheet
        .write_with_format(0, 0, title, &title_format)
        .map_err(to_app_error)?;
    worksheet
        .write(1, 0, format!("Generado el: {generated}"))
        .map_err(to_app_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let headers = get_headers();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(HEADER_ROW, col as u16, *header, &header_format)
            .map_err(to_app_error)?;
    }

    worksheet.set_freeze_panes(HEADER_ROW + 1, 0).ok();

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Rows
    // ---------------------------
    let table = events_to_table(events);
    for (i, (ev, values)) in events.iter().zip(&table).enumerate() {
        let row = HEADER_ROW + 1 + i as u32;
        let band = if i % 2 == 0 { band1 } else { band2 };

        for (col, value) in values.iter().enumerate() {
            let date = if col == DATE_COL {
                ev.display_date().as_ref().and_then(excel_serial)
            } else {
                None
            };
            write_cell(worksheet, row, col as u16, value, date, band)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, (*w).min(MAX_COL_WIDTH) as f64 + 2.0)
            .map_err(to_app_error)?;
    }

    workbook.save(path).map_err(to_app_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

/// Write one cell: real Excel date when `serial` is given, text otherwise.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
    serial: Option<f64>,
    bg: Color,
) -> AppResult<()> {
    let base = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    match serial {
        Some(s) => {
            let fmt = base.set_num_format(DATETIME_FORMAT);
            worksheet
                .write_with_format(row, col, s, &fmt)
                .map_err(to_app_error)?;
        }
        None => {
            worksheet
                .write_with_format(row, col, text, &base)
                .map_err(to_app_error)?;
        }
    }

    Ok(())
}

fn to_app_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
