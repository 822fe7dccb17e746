use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Offset of the operations time zone, e.g. "-03:00".
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Documents per collection delivered before the first useful filter.
    #[serde(default = "default_initial_limit")]
    pub initial_limit: usize,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_report_title")]
    pub report_title: String,
    #[serde(default = "default_day_start")]
    pub day_start_hour: u32,
    #[serde(default = "default_night_start")]
    pub night_start_hour: u32,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_utc_offset() -> String {
    "-03:00".to_string()
}
fn default_page_size() -> usize {
    50
}
fn default_initial_limit() -> usize {
    100
}
fn default_poll_interval() -> u64 {
    2
}
fn default_report_title() -> String {
    "Reporte de Monitoreo".to_string()
}
fn default_day_start() -> u32 {
    6
}
fn default_night_start() -> u32 {
    18
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            utc_offset: default_utc_offset(),
            page_size: default_page_size(),
            initial_limit: default_initial_limit(),
            poll_interval_secs: default_poll_interval(),
            report_title: default_report_title(),
            day_start_hour: default_day_start(),
            night_start_hour: default_night_start(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("opsboard")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".opsboard")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("opsboard.conf")
    }

    /// Return the full path of the SQLite document store
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("opsboard.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml).map_err(|_| AppError::ConfigSave)
    }

    /// Parsed `utc_offset`.
    pub fn offset(&self) -> AppResult<FixedOffset> {
        parse_offset(&self.utc_offset)
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB path: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => dir.join("opsboard.sqlite"),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            config.save(&Self::config_file())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(db_path)
    }
}

/// Parse "+HH:MM" / "-HH:MM" / "Z" into a fixed offset.
pub fn parse_offset(s: &str) -> AppResult<FixedOffset> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("z") || t.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| AppError::InvalidOffset(s.into()));
    }

    let (sign, rest) = match t.chars().next() {
        Some('+') => (1, &t[1..]),
        Some('-') => (-1, &t[1..]),
        _ => return Err(AppError::InvalidOffset(s.into())),
    };

    let (h, m) = rest
        .split_once(':')
        .ok_or_else(|| AppError::InvalidOffset(s.into()))?;
    let h: i32 = h.parse().map_err(|_| AppError::InvalidOffset(s.into()))?;
    let m: i32 = m.parse().map_err(|_| AppError::InvalidOffset(s.into()))?;

    if h > 14 || m > 59 {
        return Err(AppError::InvalidOffset(s.into()));
    }

    FixedOffset::east_opt(sign * (h * 3600 + m * 60)).ok_or_else(|| AppError::InvalidOffset(s.into()))
}
