// ⚙️ Configuration - where the ledger lives and how edits behave

use crate::form::EditMode;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "EXPENSE_LEDGER_DB";
pub const EDIT_MODE_VAR: &str = "EXPENSE_LEDGER_EDIT_MODE";
pub const DEFAULT_DB_PATH: &str = "expenses.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub edit_mode: EditMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            edit_mode: EditMode::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve from any variable source; unset or blank means default
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup(DB_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(mode) = lookup(EDIT_MODE_VAR).filter(|v| !v.trim().is_empty()) {
            config.edit_mode = mode
                .parse()
                .with_context(|| format!("Invalid {}", EDIT_MODE_VAR))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.db_path, PathBuf::from("expenses.db"));
        assert_eq!(config.edit_mode, EditMode::RemoveOnStart);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (DB_PATH_VAR, "/tmp/ledger.db"),
            (EDIT_MODE_VAR, "defer"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.edit_mode, EditMode::DeferUntilSave);
    }

    #[test]
    fn test_bad_edit_mode_is_an_error() {
        let err = Config::from_lookup(lookup(&[(EDIT_MODE_VAR, "sometimes")])).unwrap_err();
        assert!(format!("{:#}", err).contains("sometimes"));
    }
}
