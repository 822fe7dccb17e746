use crate::cli::commands::{filtered_events, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::kpi::Shift;
use crate::db::log;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportOutcome, ReportOptions, describe_filters};
use crate::utils::date::{display_datetime, now_in, today_in};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        filters,
        title,
        force,
    } = cmd
    {
        let store = open_store(cfg)?;
        let (events, active) = filtered_events(&store, cfg, filters)?;
        let offset = cfg.offset()?;

        let opts = ReportOptions {
            title: title.clone().unwrap_or_else(|| cfg.report_title.clone()),
            generated: display_datetime(&now_in(offset)),
            subtitle: describe_filters(&active),
            shift: Shift::new(cfg.day_start_hour, cfg.night_start_hour),
            today: today_in(offset),
            client: active.client().map(str::to_string),
        };

        if let ExportOutcome::Written(path) = ExportLogic::export(&events, *format, file, *force, &opts)? {
            log::oblog_quiet(
                &store.pool.conn,
                "export",
                &path.to_string_lossy(),
                &format!("{} events as {}", events.len(), format.as_str()),
            );
        }
    }
    Ok(())
}
