//! Client-side filter predicates over the in-memory event set.

use crate::core::search::matches_query;
use crate::errors::AppResult;
use crate::export::range::parse_range;
use crate::models::EventRecord;
use chrono::NaiveDate;

/// Placeholder value of the client selector meaning "every client".
pub const ALL_CLIENTS: &str = "Todos";

/// Minimum length of a free-text query that counts as a narrowing filter.
const USEFUL_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub cliente: Option<String>,
    /// Multi-select: an event passes when its type is any of these.
    pub eventos: Vec<String>,
    pub ubicacion: Option<String>,
    pub grupo: Option<String>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub q: Option<String>,
}

/// Distinct values offered by the selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorOptions {
    pub clientes: Vec<String>,
    pub eventos: Vec<String>,
    pub ubicaciones: Vec<String>,
    pub grupos: Vec<String>,
}

fn active(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Filters {
    /// Selected client, `None` when empty or "Todos".
    pub fn client(&self) -> Option<&str> {
        active(&self.cliente).filter(|c| *c != ALL_CLIENTS)
    }

    pub fn query(&self) -> Option<&str> {
        active(&self.q)
    }

    /// Apply a `--range` expression to both date bounds.
    pub fn with_range(mut self, range: &str) -> AppResult<Self> {
        if let Some((start, end)) = parse_range(range)? {
            self.fecha_inicio = Some(start);
            self.fecha_fin = Some(end);
        }
        Ok(self)
    }

    /// Inclusive day bounds, exchanged when given in reverse order.
    pub fn date_bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match (self.fecha_inicio, self.fecha_fin) {
            (Some(a), Some(b)) if a > b => (Some(b), Some(a)),
            other => other,
        }
    }

    /// True when at least one filter narrows the set enough to justify
    /// loading full collections.
    pub fn is_useful(&self) -> bool {
        self.client().is_some()
            || active(&self.ubicacion).is_some()
            || active(&self.grupo).is_some()
            || self.fecha_inicio.is_some()
            || self.fecha_fin.is_some()
            || self
                .query()
                .is_some_and(|q| q.chars().count() >= USEFUL_QUERY_LEN)
    }

    pub fn matches(&self, e: &EventRecord) -> bool {
        let (inicio, fin) = self.date_bounds();
        if inicio.is_some() || fin.is_some() {
            let Some(day) = e.filter_date().map(|d| d.date_naive()) else {
                return false;
            };
            if inicio.is_some_and(|i| day < i) || fin.is_some_and(|f| day > f) {
                return false;
            }
        }

        if self.client().is_some_and(|c| e.cliente.trim() != c) {
            return false;
        }
        if active(&self.grupo).is_some_and(|g| e.grupo.trim() != g) {
            return false;
        }
        if active(&self.ubicacion).is_some_and(|u| e.ubicacion.trim() != u) {
            return false;
        }

        if !self.eventos.is_empty() && !self.eventos.iter().any(|ev| ev.trim() == e.evento) {
            return false;
        }

        match self.query() {
            Some(q) => matches_query(e, q),
            None => true,
        }
    }

    pub fn apply<'a>(&self, events: &'a [EventRecord]) -> Vec<&'a EventRecord> {
        events.iter().filter(|e| self.matches(e)).collect()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Selector values in first-seen order. Event types, locations and groups
/// are restricted to the selected client when there is one.
pub fn selector_options(events: &[EventRecord], filters: &Filters) -> SelectorOptions {
    let mut out = SelectorOptions::default();
    let client = filters.client();

    for e in events {
        push_unique(&mut out.clientes, &e.cliente);

        if client.is_some_and(|c| e.cliente.trim() != c) {
            continue;
        }
        push_unique(&mut out.eventos, &e.evento);
        push_unique(&mut out.ubicaciones, &e.ubicacion);
        push_unique(&mut out.grupos, &e.grupo);
    }

    out
}
