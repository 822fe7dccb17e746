//! Sortable, paginated view of the filtered events.

use crate::errors::{AppError, AppResult};
use crate::models::EventRecord;
use crate::utils::text::normalize;
use std::cmp::Ordering;
use std::str::FromStr;

pub const COLUMNS: [&str; 9] = [
    "Cliente",
    "Evento",
    "Ubicación",
    "Fecha",
    "Observación",
    "Razones",
    "Resolución",
    "Respuesta",
    "Proveedor",
];

pub const PAGE_SIZES: [usize; 5] = [10, 20, 50, 100, 150];
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Cliente,
    Evento,
    Ubicacion,
    Fecha,
}

impl FromStr for SortColumn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "cliente" => Ok(Self::Cliente),
            "evento" => Ok(Self::Evento),
            "ubicacion" => Ok(Self::Ubicacion),
            "fecha" => Ok(Self::Fecha),
            _ => Err(AppError::InvalidSortColumn(s.to_string())),
        }
    }
}

impl SortColumn {
    fn compare(&self, a: &EventRecord, b: &EventRecord, desc: bool) -> Ordering {
        let dir = |o: Ordering| if desc { o.reverse() } else { o };
        match self {
            Self::Cliente => dir(a.cliente.cmp(&b.cliente)),
            Self::Evento => dir(a.evento.cmp(&b.evento)),
            Self::Ubicacion => dir(a.ubicacion.cmp(&b.ubicacion)),
            // undated rows stay at the bottom in both directions
            Self::Fecha => match (a.display_date(), b.display_date()) {
                (Some(x), Some(y)) => dir(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Stable in-place sort.
pub fn sort_events(rows: &mut [&EventRecord], column: SortColumn, desc: bool) {
    rows.sort_by(|a, b| column.compare(a, b, desc));
}

#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub rows: Vec<&'a EventRecord>,
    /// 1-based.
    pub page: usize,
    pub pages: usize,
    pub total: usize,
    pub page_size: usize,
}

impl Page<'_> {
    /// 1-based index of the first row on this page (0 when empty).
    pub fn first_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    pub fn last_row(&self) -> usize {
        self.first_row() + self.rows.len().saturating_sub(1)
    }
}

pub fn validate_page_size(size: usize) -> AppResult<usize> {
    if PAGE_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(AppError::InvalidPageSize(size))
    }
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size).max(1)
}

/// Slice out one page. An empty set has exactly one, empty, page.
pub fn paginate<'a>(rows: &[&'a EventRecord], page_size: usize, page: usize) -> AppResult<Page<'a>> {
    let page_size = validate_page_size(page_size)?;
    let pages = page_count(rows.len(), page_size);

    if page == 0 || page > pages {
        return Err(AppError::PageOutOfRange { page, pages });
    }

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(rows.len());

    Ok(Page {
        rows: rows[start..end].to_vec(),
        page,
        pages,
        total: rows.len(),
        page_size,
    })
}

/// Cell values in `COLUMNS` order.
pub fn row_cells(e: &EventRecord) -> Vec<String> {
    vec![
        e.cliente.clone(),
        e.evento.clone(),
        e.ubicacion.clone(),
        e.fecha_text(),
        e.observacion.clone(),
        dash_if_empty(&e.razones),
        dash_if_empty(&e.resolucion),
        dash_if_empty(&e.respuesta),
        dash_if_empty(&e.proveedor),
    ]
}

fn dash_if_empty(s: &str) -> String {
    if s.trim().is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}
