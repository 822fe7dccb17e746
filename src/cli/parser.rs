use crate::core::charts::ChartKind;
use crate::core::filter::Filters;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::utils::date::parse_date;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for opsboard
/// Operations dashboard over a live store of monitoring events
#[derive(Parser)]
#[command(
    name = "opsboard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Operations dashboard for monitoring events: KPIs, charts, event table and PDF reports",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filter selectors shared by every read command.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, help = "Client name (TGS, Edificios, VTV, ...); \"Todos\" means all")]
    pub cliente: Option<String>,

    #[arg(long = "evento", help = "Event type; repeat to select several")]
    pub eventos: Vec<String>,

    #[arg(long, help = "Exact location")]
    pub ubicacion: Option<String>,

    #[arg(long, help = "Location group (first word of the location / building)")]
    pub grupo: Option<String>,

    #[arg(long = "from", value_name = "YYYY-MM-DD", help = "First day (inclusive)")]
    pub from: Option<String>,

    #[arg(long = "to", value_name = "YYYY-MM-DD", help = "Last day (inclusive)")]
    pub to: Option<String>,

    #[arg(
        long,
        value_name = "RANGE",
        help = "Year/month/day or a custom range (YYYY, YYYY-MM, YYYY-MM-DD, a:b)"
    )]
    pub range: Option<String>,

    #[arg(long = "q", short = 'q', help = "Free-text search; every term must match")]
    pub q: Option<String>,
}

fn day_arg(raw: &Option<String>) -> AppResult<Option<chrono::NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| AppError::InvalidDate(s.clone())),
    }
}

impl FilterArgs {
    pub fn to_filters(&self) -> AppResult<Filters> {
        let filters = Filters {
            cliente: self.cliente.clone(),
            eventos: self.eventos.clone(),
            ubicacion: self.ubicacion.clone(),
            grupo: self.grupo.clone(),
            fecha_inicio: day_arg(&self.from)?,
            fecha_fin: day_arg(&self.to)?,
            q: self.q.clone(),
        };

        match &self.range {
            Some(r) => filters.with_range(r),
            None => Ok(filters),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Load event documents from a JSON dump
    Import {
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Show the event table
    List {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, help = "Sort by: cliente, evento, ubicacion, fecha")]
        sort: Option<String>,

        #[arg(long, help = "Descending order (with --sort)")]
        desc: bool,

        #[arg(long, default_value_t = 1, help = "Page number (1-based)")]
        page: usize,

        #[arg(long = "page-size", help = "Rows per page: 10, 20, 50, 100, 150")]
        page_size: Option<usize>,

        #[arg(long, help = "Print the page as JSON")]
        json: bool,
    },

    /// Show the KPI cards
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Draw a chart in the terminal
    Chart {
        #[arg(value_enum)]
        kind: ChartKind,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, default_value_t = 30, help = "Days covered by the line chart")]
        days: i64,
    },

    /// Edit an event (observation, resolution, response, date)
    Edit {
        /// Document path or bare document id
        target: String,

        #[arg(long)]
        observacion: Option<String>,

        #[arg(long)]
        resolucion: Option<String>,

        #[arg(long)]
        respuesta: Option<String>,

        #[arg(long, help = "New date/time, e.g. \"2025-08-01 14:30\"")]
        fecha: Option<String>,
    },

    /// Delete an event
    Del {
        /// Document path or bare document id
        target: String,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Follow the store and refresh the KPIs on every change
    Watch {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, help = "Seconds between checks (default: poll_interval_secs)")]
        interval: Option<u64>,

        #[arg(long, help = "Stop after this many checks")]
        count: Option<usize>,
    },

    /// Export the filtered events
    Export {
        #[arg(long, value_enum, default_value = "pdf")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, help = "Report title (default: report_title)")]
        title: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
