use crate::cli::commands::{filtered_events, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::charts::{self, ChartKind};
use crate::core::kpi::Shift;
use crate::errors::AppResult;
use crate::models::EventRecord;
use crate::ui::render;
use crate::utils::date::today_in;

const TOP_LOCATIONS: usize = 5;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Chart {
        kind,
        filters,
        days,
    } = cmd
    {
        let store = open_store(cfg)?;
        let (events, active) = filtered_events(&store, cfg, filters)?;
        let refs: Vec<&EventRecord> = events.iter().collect();

        let chart = match kind {
            ChartKind::Bar => charts::events_by_type(&refs),
            ChartKind::Horizontal => charts::top_locations(&refs, TOP_LOCATIONS),
            ChartKind::Line => {
                charts::daily_trend(&refs, active.client(), today_in(cfg.offset()?), *days)?
            }
            ChartKind::Pie => charts::events_by_client(&refs),
            ChartKind::Doughnut => {
                charts::day_night(&refs, Shift::new(cfg.day_start_hour, cfg.night_start_hour))
            }
        };

        print!("{}", render::chart(&chart));
    }

    Ok(())
}
