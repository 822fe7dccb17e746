use crate::config::Config;
use crate::config::migrate::{migrate_file, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(cfg: &Config) -> AppResult<()> {
        let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
        println!("📄 Current configuration:\n");
        println!("{yaml}");
        Ok(())
    }

    /// Report keys missing from the file. Returns how many there are.
    pub fn check(path: &Path) -> AppResult<usize> {
        let missing = missing_keys(path)?;
        if missing.is_empty() {
            success(format!("{} is complete", path.display()));
        } else {
            warning(format!("Missing keys in {}: {}", path.display(), missing.join(", ")));
        }
        Ok(missing.len())
    }

    pub fn migrate(path: &Path) -> AppResult<Vec<String>> {
        if !path.exists() {
            info(format!("{} not found, writing defaults", path.display()));
            Config::default().save(path)?;
            return Ok(Vec::new());
        }
        migrate_file(path)
    }

    fn default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }

    /// Open the file in `editor`, falling back to $EDITOR / $VISUAL / nano.
    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let fallback = Self::default_editor();
        let chosen = editor.clone().unwrap_or_else(|| fallback.clone());

        match Command::new(&chosen).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!("Configuration file edited using '{chosen}'"));
                return Ok(());
            }
            _ if chosen == fallback => {
                return Err(AppError::Config(format!("editor '{chosen}' failed")));
            }
            _ => warning(format!(
                "Editor '{chosen}' not available, falling back to '{fallback}'"
            )),
        }

        match Command::new(&fallback).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!("Configuration file edited using fallback '{fallback}'"));
                Ok(())
            }
            _ => Err(AppError::Config(format!("editor '{fallback}' failed"))),
        }
    }
}
