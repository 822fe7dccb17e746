use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::{EditLogic, EventEdit};
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        target,
        observacion,
        resolucion,
        respuesta,
        fecha,
    } = cmd
    {
        let edit = EventEdit {
            observacion: observacion.clone(),
            resolucion: resolucion.clone(),
            respuesta: respuesta.clone(),
            fecha: fecha.clone(),
        };

        if edit.is_empty() {
            warning("Nothing to edit: pass --observacion, --resolucion, --respuesta or --fecha.");
            return Ok(());
        }

        let store = open_store(cfg)?;
        let path = EditLogic::apply(&store, target, &edit, cfg.offset()?)?;
        success(format!("Event {path} updated."));

        log::oblog_quiet(&store.pool.conn, "edit", &path, "Event updated");
    }

    Ok(())
}
