//! Save/load boundary for the strategy settings. The engine never touches
//! storage itself; callers load a config, build the engine, and save on request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StrategyConfig;
use crate::error::Result;

pub trait SettingsStore {
    /// `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<StrategyConfig>>;
    fn save(&mut self, config: &StrategyConfig) -> Result<()>;
}

#[derive(Default)]
pub struct MemorySettingsStore {
    saved: Option<StrategyConfig>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<StrategyConfig>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, config: &StrategyConfig) -> Result<()> {
        config.validate()?;
        self.saved = Some(config.clone());
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedSettings {
    config: StrategyConfig,
    saved_at: DateTime<Utc>,
}

/// Settings kept as a small JSON document on disk.
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSettingsStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn load(&self) -> Result<Option<StrategyConfig>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let saved: SavedSettings = serde_json::from_str(&raw)?;
        saved.config.validate()?;
        log::debug!("Loaded settings from {:?} (saved {})", self.path, saved.saved_at);
        Ok(Some(saved.config))
    }

    fn save(&mut self, config: &StrategyConfig) -> Result<()> {
        config.validate()?;
        let doc = SavedSettings {
            config: config.clone(),
            saved_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&doc)?)?;
        log::info!("Settings saved to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JournalError;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "risk_settings_{}_{}_{}.json",
            tag,
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or(0)
        ))
    }

    #[test]
    fn memory_store_starts_empty() {
        let mut store = MemorySettingsStore::new();
        assert!(store.load().unwrap().is_none());
        let mut cfg = StrategyConfig::default();
        cfg.leverage = 100;
        store.save(&cfg).unwrap();
        assert_eq!(store.load().unwrap(), Some(cfg));
    }

    #[test]
    fn memory_store_refuses_invalid_config() {
        let mut store = MemorySettingsStore::new();
        let mut cfg = StrategyConfig::default();
        cfg.initial_risk_percent = 150.0;
        assert!(store.save(&cfg).is_err());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let store = JsonFileSettingsStore::new(temp_path("missing"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_persists_config() {
        let path = temp_path("persist");
        let mut store = JsonFileSettingsStore::new(&path);
        let mut cfg = StrategyConfig::default();
        cfg.initial_capital = 7500.0;
        store.save(&cfg).unwrap();

        let reopened = JsonFileSettingsStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(cfg));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"savedAt\""));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileSettingsStore::new(&path);
        assert!(matches!(store.load(), Err(JournalError::Json(_))));
        fs::remove_file(&path).unwrap();
    }
}
