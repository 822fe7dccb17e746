use crate::cli::parser::Commands;
use crate::cli::commands::open_store;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::stats;
use crate::errors::{AppError, AppResult};
use crate::store::SqliteStore;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        // one store shared by every requested action
        let mut store: Option<SqliteStore> = None;

        fn get_store<'a>(store: &'a mut Option<SqliteStore>, cfg: &Config) -> AppResult<&'a SqliteStore> {
            if store.is_none() {
                *store = Some(open_store(cfg)?);
            }
            store
                .as_ref()
                .ok_or_else(|| AppError::Other("database not opened".into()))
        }

        if *migrate {
            let s = get_store(&mut store, cfg)?;
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            run_pending_migrations(&s.pool.conn)?;
            println!("{}✔ Migration completed.{}\n", GREEN, RESET);
        }

        if *info {
            let s = get_store(&mut store, cfg)?;
            stats::print_db_info(&s.pool)?;
        }

        if *check {
            let s = get_store(&mut store, cfg)?;
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = s
                .pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        if *vacuum {
            let s = get_store(&mut store, cfg)?;
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            s.pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
