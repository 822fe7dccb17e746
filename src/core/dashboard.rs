//! Live dashboard session.
//!
//! One snapshot listener per client collection feeds an in-memory event
//! set; each snapshot replaces only the slice of the client it came from.
//! The first load is capped at `initial_limit` documents per collection and
//! is widened to full collections, once, when a narrowing filter appears.

use crate::config::Config;
use crate::core::filter::{Filters, SelectorOptions, selector_options};
use crate::core::kpi::Shift;
use crate::errors::AppResult;
use crate::models::{ClientProfile, EventRecord};
use crate::store::{Direction, DocumentStore, ListenerHandle, Query, SnapshotHub};
use chrono::FixedOffset;
use std::cell::RefCell;
use std::rc::Rc;

/// Fields the listeners order by, newest first.
pub const ORDER_FIELDS: [&str; 3] = ["fechaHoraEnvio", "fecha", "fechaObj"];

#[derive(Default)]
struct SessionState {
    /// One slice per profile, in profile order.
    slices: Vec<Vec<EventRecord>>,
    deliveries: usize,
}

pub struct DashboardSession<'s> {
    store: &'s dyn DocumentStore,
    hub: SnapshotHub,
    profiles: Vec<ClientProfile>,
    state: Rc<RefCell<SessionState>>,
    handles: Vec<ListenerHandle>,
    limit: Option<usize>,
    offset: FixedOffset,
    shift: Shift,
    filters: Filters,
}

impl<'s> DashboardSession<'s> {
    pub fn open(store: &'s dyn DocumentStore, cfg: &Config) -> AppResult<Self> {
        let limit = (cfg.initial_limit > 0).then_some(cfg.initial_limit);
        Self::open_with(store, cfg.offset()?, limit, Shift::new(cfg.day_start_hour, cfg.night_start_hour))
    }

    pub fn open_with(
        store: &'s dyn DocumentStore,
        offset: FixedOffset,
        limit: Option<usize>,
        shift: Shift,
    ) -> AppResult<Self> {
        let profiles = ClientProfile::all();
        let state = Rc::new(RefCell::new(SessionState {
            slices: vec![Vec::new(); profiles.len()],
            deliveries: 0,
        }));

        let mut session = Self {
            store,
            hub: SnapshotHub::new(),
            profiles,
            state,
            handles: Vec::new(),
            limit,
            offset,
            shift,
            filters: Filters::default(),
        };
        session.subscribe_all()?;
        Ok(session)
    }

    fn subscribe_all(&mut self) -> AppResult<()> {
        // old handles go first so their listeners never see the new data
        self.handles.clear();

        for (idx, profile) in self.profiles.iter().enumerate() {
            let query = Query::collection(&profile.collection_path())
                .order_by(&ORDER_FIELDS, Direction::Desc)
                .limit(self.limit)
                .in_offset(self.offset);

            let state = Rc::clone(&self.state);
            let offset = self.offset;

            let handle = self.hub.subscribe(self.store, query, move |snap| {
                let records: Vec<EventRecord> = snap
                    .docs
                    .iter()
                    .filter_map(|d| EventRecord::from_document(d, offset))
                    .collect();

                let mut st = state.borrow_mut();
                if let Some(slice) = st.slices.get_mut(idx) {
                    *slice = records;
                }
                st.deliveries += 1;
            })?;

            self.handles.push(handle);
        }

        tracing::debug!(limit = ?self.limit, listeners = self.handles.len(), "dashboard subscribed");
        Ok(())
    }

    /// Replace the active filters. Drops the initial cap the first time a
    /// narrowing filter is set.
    pub fn set_filters(&mut self, filters: Filters) -> AppResult<()> {
        self.filters = filters;
        if self.limit.is_some() && self.filters.is_useful() {
            self.limit = None;
            self.subscribe_all()?;
        }
        Ok(())
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn is_limited(&self) -> bool {
        self.limit.is_some()
    }

    pub fn shift(&self) -> Shift {
        self.shift
    }

    /// Deliver pending store changes. Returns the number of client slices
    /// that were replaced.
    pub fn poll(&self) -> AppResult<usize> {
        self.hub.poll(self.store)
    }

    /// Snapshots received so far, initial ones included.
    pub fn deliveries(&self) -> usize {
        self.state.borrow().deliveries
    }

    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }

    /// Every loaded event, client slices in profile order.
    pub fn events(&self) -> Vec<EventRecord> {
        self.state.borrow().slices.iter().flatten().cloned().collect()
    }

    pub fn filtered(&self) -> Vec<EventRecord> {
        let st = self.state.borrow();
        st.slices
            .iter()
            .flatten()
            .filter(|e| self.filters.matches(e))
            .cloned()
            .collect()
    }

    pub fn options(&self) -> SelectorOptions {
        selector_options(&self.events(), &self.filters)
    }
}
