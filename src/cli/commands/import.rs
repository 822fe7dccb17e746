use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log;
use crate::errors::AppResult;
use crate::store::import::import_file;
use crate::ui::messages::{info, success};
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let store = open_store(cfg)?;
        let path = Path::new(file);

        info(format!("Importing documents from {}", path.display()));
        let n = import_file(&store, path)?;
        success(format!("{n} document(s) imported."));

        log::oblog_quiet(&store.pool.conn, "import", file, &format!("{n} documents"));
    }

    Ok(())
}
