pub mod chart;
pub mod config;
pub mod db;
pub mod del;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod stats;
pub mod watch;

use crate::cli::parser::FilterArgs;
use crate::config::Config;
use crate::core::dashboard::DashboardSession;
use crate::core::filter::Filters;
use crate::errors::AppResult;
use crate::models::EventRecord;
use crate::store::SqliteStore;

/// Open the configured store, creating the schema when missing.
pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    let parent = std::path::Path::new(&cfg.database).parent();
    if let Some(dir) = parent.filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    SqliteStore::open(&cfg.database)
}

/// Load a one-shot dashboard snapshot and apply the filters.
pub(crate) fn filtered_events(
    store: &SqliteStore,
    cfg: &Config,
    args: &FilterArgs,
) -> AppResult<(Vec<EventRecord>, Filters)> {
    let filters = args.to_filters()?;
    let mut session = DashboardSession::open(store, cfg)?;
    session.set_filters(filters.clone())?;

    if session.is_limited() {
        tracing::debug!(limit = cfg.initial_limit, "showing the most recent events per client");
    }

    Ok((session.filtered(), filters))
}
