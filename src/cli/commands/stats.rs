use crate::cli::commands::{filtered_events, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::grouping::group_by_month;
use crate::core::kpi::{self, Shift};
use crate::errors::AppResult;
use crate::models::EventRecord;
use crate::ui::render;

/// Cards for the current selection. The client panels only show up when
/// the selection includes that client.
pub(crate) fn cards(events: &[EventRecord], client: Option<&str>, shift: Shift) -> String {
    let refs: Vec<&EventRecord> = events.iter().collect();
    let mut out = render::global_cards(&kpi::global(&refs, shift));
    out.push_str(&render::monthly_counts(&group_by_month(refs.iter().copied())));

    let wants = |name: &str| client.is_none_or(|c| c.eq_ignore_ascii_case(name));

    if wants("TGS") {
        out.push('\n');
        out.push_str(&render::tgs_cards(&kpi::tgs(&refs)));
    }
    if wants("Edificios") {
        out.push('\n');
        out.push_str(&render::edificios_cards(&kpi::edificios(&refs)));
    }
    out
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { filters } = cmd {
        let store = open_store(cfg)?;
        let (events, active) = filtered_events(&store, cfg, filters)?;
        let shift = Shift::new(cfg.day_start_hour, cfg.night_start_hour);

        print!("{}", cards(&events, active.client(), shift));
    }

    Ok(())
}
