use crate::cli::commands::open_store;
use crate::cli::commands::stats::cards;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dashboard::DashboardSession;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::date::{display_datetime, now_in};
use std::thread;
use std::time::Duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch {
        filters,
        interval,
        count,
    } = cmd
    {
        let store = open_store(cfg)?;
        let offset = cfg.offset()?;

        let mut session = DashboardSession::open(&store, cfg)?;
        session.set_filters(filters.to_filters()?)?;

        let every = Duration::from_secs(interval.unwrap_or(cfg.poll_interval_secs).max(1));
        let client = session.filters().client().map(str::to_string);

        info(format!(
            "Watching {} listener(s), every {}s",
            session.listener_count(),
            every.as_secs()
        ));
        print!("{}", cards(&session.filtered(), client.as_deref(), session.shift()));

        let mut checks = 0usize;
        while count.is_none_or(|n| checks < n) {
            thread::sleep(every);
            checks += 1;

            let changed = session.poll()?;
            if changed == 0 {
                continue;
            }

            tracing::debug!(changed, deliveries = session.deliveries(), "snapshot delivered");
            println!();
            info(format!("Updated {}", display_datetime(&now_in(offset))));
            print!("{}", cards(&session.filtered(), client.as_deref(), session.shift()));
        }
    }

    Ok(())
}
