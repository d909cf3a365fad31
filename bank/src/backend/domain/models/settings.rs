//! Family-wide settings and the allowed-app whitelist.
//!
//! Curfew times are stored and validated but nothing enforces them.
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilySettings {
    /// Minutes granted per earned coin
    pub exchange_rate: u32,
    /// HH:mm
    pub weekday_curfew_start: String,
    pub weekday_curfew_end: String,
    pub weekend_curfew_start: String,
    pub weekend_curfew_end: String,
}

impl Default for FamilySettings {
    fn default() -> Self {
        Self {
            exchange_rate: 1,
            weekday_curfew_start: "16:00".to_string(),
            weekday_curfew_end: "20:00".to_string(),
            weekend_curfew_start: "10:00".to_string(),
            weekend_curfew_end: "21:00".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsValidationError {
    #[error("Exchange rate must be positive")]
    NonPositiveExchangeRate,
    #[error("Invalid time '{0}', expected HH:mm")]
    InvalidTime(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub exchange_rate: Option<u32>,
    pub weekday_curfew_start: Option<String>,
    pub weekday_curfew_end: Option<String>,
    pub weekend_curfew_start: Option<String>,
    pub weekend_curfew_end: Option<String>,
}

impl SettingsPatch {
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        if self.exchange_rate == Some(0) {
            return Err(SettingsValidationError::NonPositiveExchangeRate);
        }
        let times = [
            &self.weekday_curfew_start,
            &self.weekday_curfew_end,
            &self.weekend_curfew_start,
            &self.weekend_curfew_end,
        ];
        for time in times.into_iter().flatten() {
            if NaiveTime::parse_from_str(time.trim(), "%H:%M").is_err() {
                return Err(SettingsValidationError::InvalidTime(time.clone()));
            }
        }
        Ok(())
    }

    pub fn apply_to(self, settings: &mut FamilySettings) {
        if let Some(rate) = self.exchange_rate {
            settings.exchange_rate = rate;
        }
        if let Some(t) = self.weekday_curfew_start {
            settings.weekday_curfew_start = t.trim().to_string();
        }
        if let Some(t) = self.weekday_curfew_end {
            settings.weekday_curfew_end = t.trim().to_string();
        }
        if let Some(t) = self.weekend_curfew_start {
            settings.weekend_curfew_start = t.trim().to_string();
        }
        if let Some(t) = self.weekend_curfew_end {
            settings.weekend_curfew_end = t.trim().to_string();
        }
    }
}

/// Whitelisted app. The rule is advisory text shown to the child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedApp {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rule: String,
}

impl AllowedApp {
    pub fn new(name: impl Into<String>, rule: impl Into<String>) -> Self {
        Self { name: name.into(), rule: rule.into() }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn default_allowed_apps() -> Vec<AllowedApp> {
    vec![
        AllowedApp::new("YouTube", "只能看英文教學頻道"),
        AllowedApp::new("Roblox", "禁止在遊戲中聊天"),
        AllowedApp::new("Minecraft", ""),
        AllowedApp::new("Netflix", ""),
    ]
}
