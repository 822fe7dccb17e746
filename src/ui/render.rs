//! Terminal rendering of cards, charts and the event table.
//! Everything returns a `String`; callers decide where it goes.

use crate::core::charts::{Chart, ChartKind};
use crate::core::search::highlight;
use crate::core::grouping::month_labels;
use crate::core::kpi::{EdificiosKpis, GlobalKpis, KpiView, TgsKpis};
use crate::core::table::{COLUMNS, Page, row_cells};
use crate::utils::colors::{BOLD, CYAN, GREY, RESET, color_for_client, colorize_optional, palette};
use crate::utils::table::{Column, Table};
use crate::utils::text::truncate;
use std::collections::BTreeMap;
use unicode_width::UnicodeWidthStr;

pub const LOADING: &str = "Cargando…";

const BAR_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 28;

fn card(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {GREY}{label:<24}{RESET} {BOLD}{value}{RESET}\n")
}

fn loading(title: &str) -> String {
    format!("{CYAN}{BOLD}{title}{RESET}\n  {GREY}{LOADING}{RESET}\n")
}

fn ranking(out: &mut String, rows: &[(String, usize)]) {
    for (i, (name, n)) in rows.iter().enumerate() {
        out.push_str(&format!("    {}. {} ({n})\n", i + 1, truncate(name, 48)));
    }
}

pub fn global_cards(view: &KpiView<GlobalKpis>) -> String {
    let title = "Resumen";
    let KpiView::Ready(k) = view else {
        return loading(title);
    };

    let mut out = format!("{CYAN}{BOLD}{title}{RESET}\n");
    out.push_str(&card("Total de eventos", k.total));
    if let Some((name, n)) = &k.top_event {
        out.push_str(&card("Evento más frecuente", format!("{name} ({n})")));
    }
    if let Some((name, n)) = &k.top_location {
        out.push_str(&card("Ubicación más activa", format!("{name} ({n})")));
    }
    out.push_str(&card("Ubicaciones distintas", k.distinct_locations));
    out.push_str(&card(
        "Día / Noche",
        format!("{} ({}%) / {} ({}%)", k.day, k.day_pct, k.night, k.night_pct),
    ));
    out.push_str("  Top 5 eventos:\n");
    ranking(&mut out, &k.top_events);
    out
}

pub fn tgs_cards(view: &KpiView<TgsKpis>) -> String {
    let title = "TGS";
    let KpiView::Ready(k) = view else {
        return loading(title);
    };

    let mut out = format!("{CYAN}{BOLD}{title}{RESET}\n");
    out.push_str(&card("Eventos", k.total));
    out.push_str(&card("Ingresos", k.ingresos));
    out.push_str(&card("Salidas", k.salidas));
    out.push_str(&card("Cortes Energía", k.cortes));
    out.push_str(&card("Restauraciones", k.restauraciones));
    out.push_str(&card("Proveedores", k.proveedores));
    out.push_str("  Top 5 eventos TGS:\n");
    ranking(&mut out, &k.top_events);
    out
}

pub fn edificios_cards(view: &KpiView<EdificiosKpis>) -> String {
    let title = "Edificios";
    let KpiView::Ready(k) = view else {
        return loading(title);
    };

    let mut out = format!("{CYAN}{BOLD}{title}{RESET}\n");
    out.push_str(&card("Eventos", k.total));
    out.push_str(&card("Puerta mantenida abierta", k.pma));
    out.push_str(&card("Puerta forzada", k.forzada));
    out.push_str(&card("Evento encargado", k.encargado));
    out.push_str(&card("CCTV fuera de línea", k.cctv_offline));
    out.push_str(&card("Otros", k.otros));
    out
}

/// One line per month, oldest first. Empty when nothing is dated.
pub fn monthly_counts(months: &BTreeMap<(i32, u32), usize>) -> String {
    if months.is_empty() {
        return String::new();
    }

    let mut out = String::from("  Eventos por mes:\n");
    for (label, n) in month_labels(months.keys()).iter().zip(months.values()) {
        out.push_str(&format!("    {label}: {n}\n"));
    }
    out
}

fn pad_label(label: &str) -> String {
    let t = truncate(label, LABEL_WIDTH);
    let pad = LABEL_WIDTH.saturating_sub(UnicodeWidthStr::width(t.as_str()));
    format!("{t}{}", " ".repeat(pad))
}

fn bar(value: usize, max: usize, color: &str) -> String {
    let len = if max == 0 {
        0
    } else {
        ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
    };
    format!("{color}{}{RESET}", "█".repeat(len.max(usize::from(value > 0))))
}

pub fn chart(chart: &Chart) -> String {
    let mut out = format!("{CYAN}{BOLD}{}{RESET}\n", chart.title);

    if chart.is_empty() {
        out.push_str(&format!("  {GREY}No hay datos para mostrar{RESET}\n"));
        return out;
    }

    match chart.kind {
        ChartKind::Bar | ChartKind::Horizontal | ChartKind::Pie | ChartKind::Doughnut => {
            let points = chart.points();
            let max = points.iter().map(|p| p.1).max().unwrap_or(0);
            let sum: usize = points.iter().map(|p| p.1).sum();
            let whole = match chart.kind {
                ChartKind::Horizontal => chart.total,
                _ => sum,
            };

            for (i, (label, value)) in points.iter().enumerate() {
                let color = match chart.kind {
                    ChartKind::Pie => color_for_client(label),
                    _ => palette(i),
                };
                let pct = if whole == 0 { 0.0 } else { *value as f64 * 100.0 / whole as f64 };
                out.push_str(&format!(
                    "  {} {} {value} ({pct:.1}%)\n",
                    pad_label(label),
                    bar(*value, max, color)
                ));
            }

            if chart.kind == ChartKind::Horizontal {
                out.push_str(&format!("  {GREY}Total: {}{RESET}\n", chart.total));
            }
        }
        ChartKind::Line => {
            let mut columns = vec![Column::new("Día", 12)];
            columns.extend(chart.series.iter().map(|s| Column::new(&s.label, 14)));
            let mut table = Table::new(columns);

            for (i, label) in chart.labels.iter().enumerate() {
                let mut row = vec![label.clone()];
                row.extend(
                    chart
                        .series
                        .iter()
                        .map(|s| s.values.get(i).copied().unwrap_or(0).to_string()),
                );
                table.add_row(row);
            }
            out.push_str(&table.render());
        }
    }

    out
}

/// Table page with the "a–b de n" footer. Search terms are highlighted
/// when `query` is set.
pub fn event_table(page: &Page<'_>, query: Option<&str>) -> String {
    let widths = [10, 28, 26, 21, 36, 16, 20, 16, 18];
    let columns = COLUMNS
        .iter()
        .zip(widths)
        .map(|(h, w)| Column::new(h, w))
        .collect();
    let mut table = Table::new(columns);

    for e in &page.rows {
        table.add_row(row_cells(e));
    }

    let mut out = String::new();
    if page.rows.is_empty() {
        out.push_str(&format!("{GREY}No hay eventos para los filtros seleccionados{RESET}\n"));
    } else {
        // colour is applied after wrapping so widths stay correct
        for line in table.render().lines() {
            out.push_str(&colorize_line(line, query));
            out.push('\n');
        }
    }

    out.push_str(&format!(
        "{GREY}{}–{} de {} · página {}/{}{RESET}\n",
        page.first_row(),
        page.last_row(),
        page.total,
        page.page,
        page.pages
    ));
    out
}

fn colorize_line(line: &str, query: Option<&str>) -> String {
    let mut cells: Vec<String> = line.split(" | ").map(str::to_string).collect();
    if let Some(first) = cells.first_mut() {
        let name = first.trim_end().to_string();
        if !name.is_empty() && !name.starts_with('-') {
            *first = first.replacen(&name, &format!("{}{name}{RESET}", color_for_client(&name)), 1);
        }
    }
    cells
        .iter()
        .map(|c| {
            let t = c.trim_end();
            if t == "-" || t == "Sin Fecha" || t == "Sin Observación" {
                colorize_optional(c)
            } else if let Some(q) = query.filter(|_| !c.contains('\x1b')) {
                highlight(c, q)
            } else {
                c.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
