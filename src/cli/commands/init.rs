use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::errors::AppResult;
use crate::store::SqliteStore;
use crate::ui::messages::{header, info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite document store and its migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    header("Initializing opsboard…");
    info(format!("Config file : {}", Config::config_file().display()));
    info(format!("Database    : {db_path}"));

    let store = SqliteStore::open(&db_path)?;
    success(format!("Database initialized at {db_path}"));

    log::oblog_quiet(
        &store.pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {db_path}"),
    );

    Ok(())
}
