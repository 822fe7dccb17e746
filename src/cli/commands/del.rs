use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::{EditLogic, resolve_path};
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { target, yes } = cmd {
        let store = open_store(cfg)?;
        let path = resolve_path(&store, target)?;

        let prompt = format!("Delete event {path}? This action is irreversible.");
        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        let path = EditLogic::delete(&store, &path)?;
        success(format!("Event {path} has been deleted."));

        log::oblog_quiet(&store.pool.conn, "del", &path, "Event deleted");
    }

    Ok(())
}
