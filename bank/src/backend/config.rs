//! # Bank Configuration
//!
//! Runtime settings for the bank, kept in a single YAML file:
//!
//! ```yaml
//! data_directory: "/home/alex/.local/share/screen-time-bank"
//! log_filter: "info"
//! tick_interval_ms: 1000
//! advisory_timeout_secs: 20
//! default_child_password: "1234"
//! default_weekly_allowance: 30
//! seed_defaults: true
//! ```
//!
//! Missing fields take their defaults. A missing file is created with
//! defaults on first load.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::domain::ledger_service::AccountDefaults;

pub const CONFIG_FILE_NAME: &str = "bank_config.yaml";
const APP_DIRECTORY_NAME: &str = "screen-time-bank";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Where the collection files live
    pub data_directory: PathBuf,
    /// env_logger filter; `RUST_LOG` wins when set
    pub log_filter: String,
    /// Session ticker period, 1..=1000
    pub tick_interval_ms: u64,
    pub advisory_timeout_secs: u64,
    pub default_child_password: String,
    pub default_weekly_allowance: u32,
    /// Seed the demo family on first run
    pub seed_defaults: bool,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            log_filter: "info".to_string(),
            tick_interval_ms: 1000,
            advisory_timeout_secs: 20,
            default_child_password: "1234".to_string(),
            default_weekly_allowance: 30,
            seed_defaults: true,
        }
    }
}

impl BankConfig {
    /// Load the config at `path`, writing defaults there if it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let yaml_content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: BankConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?;
            config.validate()?;
            debug!("Loaded config from {:?}", path);
            Ok(config)
        } else {
            let config = BankConfig::default();
            config.save(path)?;
            info!("Created default config at {:?}", path);
            Ok(config)
        }
    }

    /// Write the config atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!("Created config directory: {:?}", parent);
            }
        }
        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;
        debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.tick_interval_ms) {
            bail!("tick_interval_ms must be between 1 and 1000, got {}", self.tick_interval_ms);
        }
        if self.advisory_timeout_secs == 0 {
            bail!("advisory_timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn advisory_timeout(&self) -> Duration {
        Duration::from_secs(self.advisory_timeout_secs)
    }

    pub fn account_defaults(&self) -> AccountDefaults {
        AccountDefaults {
            password: self.default_child_password.clone(),
            weekly_allowance: self.default_weekly_allowance,
        }
    }
}

fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIRECTORY_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = BankConfig::load_or_default(&path).unwrap();
        assert_eq!(config, BankConfig::default());
        assert!(path.exists());
        assert!(config.data_directory.ends_with("screen-time-bank"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "tick_interval_ms: 250\nseed_defaults: false\n").unwrap();

        let config = BankConfig::load_or_default(&path).unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert!(!config.seed_defaults);
        assert_eq!(config.advisory_timeout(), Duration::from_secs(20));
        assert_eq!(config.account_defaults().password, "1234");
    }

    #[test]
    fn test_tick_interval_must_keep_once_per_second() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "tick_interval_ms: 5000\n").unwrap();
        assert!(BankConfig::load_or_default(&path).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        let config = BankConfig {
            data_directory: temp_dir.path().join("data"),
            default_weekly_allowance: 45,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(BankConfig::load_or_default(&path).unwrap(), config);
    }
}
