use crate::cli::commands::{filtered_events, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::table::{SortColumn, paginate, sort_events};
use crate::errors::{AppError, AppResult};
use crate::export::EventExport;
use crate::models::EventRecord;
use crate::ui::render;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        filters,
        sort,
        desc,
        page,
        page_size,
        json,
    } = cmd
    {
        let store = open_store(cfg)?;
        let (events, active) = filtered_events(&store, cfg, filters)?;

        let mut rows: Vec<&EventRecord> = events.iter().collect();
        if let Some(col) = sort {
            let column: SortColumn = col.parse()?;
            sort_events(&mut rows, column, *desc);
        }

        let size = page_size.unwrap_or(cfg.page_size);
        let view = paginate(&rows, size, *page)?;

        if *json {
            let out: Vec<EventExport> = view.rows.iter().map(|e| EventExport::from(*e)).collect();
            let text = serde_json::to_string_pretty(&out).map_err(AppError::from)?;
            println!("{text}");
        } else {
            print!("{}", render::event_table(&view, active.query()));
        }
    }

    Ok(())
}
