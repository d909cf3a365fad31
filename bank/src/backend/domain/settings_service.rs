use log::{debug, info};
use std::sync::Arc;

use crate::backend::domain::errors::BankError;
use crate::backend::domain::models::{AllowedApp, FamilySettings, SettingsPatch};
use crate::backend::storage::StateStore;

/// Service for family settings and the allowed-app whitelist
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<StateStore>,
}

impl SettingsService {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    pub fn get_settings(&self) -> Result<FamilySettings, BankError> {
        Ok(self.store.read(|state| state.settings.clone())?)
    }

    /// Validate the patch, then apply it. Nothing changes on a bad patch.
    pub fn update_settings(&self, patch: SettingsPatch) -> Result<FamilySettings, BankError> {
        patch.validate()?;
        let settings = self.store.mutate(|state| {
            patch.apply_to(&mut state.settings);
            state.settings.clone()
        })?;
        info!("Updated family settings: {:?}", settings);
        Ok(settings)
    }

    pub fn list_allowed_apps(&self) -> Result<Vec<AllowedApp>, BankError> {
        Ok(self.store.read(|state| state.allowed_apps.clone())?)
    }

    /// Whitelist an app. Returns false when an app with that name is
    /// already listed; the existing entry is left alone.
    pub fn add_allowed_app(&self, name: &str, rule: Option<&str>) -> Result<bool, BankError> {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring allowed app with an empty name");
            return Ok(false);
        }
        let app = AllowedApp::new(name, rule.unwrap_or_default().trim());
        let added = self.store.mutate(|state| {
            if state.allowed_apps.iter().any(|a| a.name == app.name) {
                return false;
            }
            state.allowed_apps.push(app);
            true
        })?;
        if added {
            info!("Added allowed app {}", name);
        } else {
            debug!("Allowed app {} already listed", name);
        }
        Ok(added)
    }

    /// Returns false when no app had that name
    pub fn remove_allowed_app(&self, name: &str) -> Result<bool, BankError> {
        let removed = self.store.mutate(|state| {
            let before = state.allowed_apps.len();
            state.allowed_apps.retain(|a| a.name != name);
            state.allowed_apps.len() != before
        })?;
        if removed {
            info!("Removed allowed app {}", name);
        }
        Ok(removed)
    }
}
