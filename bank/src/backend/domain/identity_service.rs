//! Identity & access: credentials, login state and role checks.
//!
//! Passwords are compared as plain strings. Attempts are only ever logged by
//! length.

use anyhow::anyhow;
use log::{info, warn};
use shared::Role;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::domain::errors::BankError;
use crate::backend::domain::models::Account;
use crate::backend::storage::StateStore;

#[derive(Clone)]
pub struct IdentityService {
    store: Arc<StateStore>,
    /// Id of the logged-in account, if any
    current: Arc<Mutex<Option<String>>>,
}

impl IdentityService {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self {
            store,
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Exact match against the stored credential. Unknown ids never verify.
    pub fn verify(&self, account_id: &str, attempt: &str) -> Result<bool, BankError> {
        let stored = self
            .store
            .read(|state| state.account(account_id).map(|a| a.password().to_string()))?;
        Ok(stored.is_some_and(|password| password == attempt))
    }

    /// Verify and make `account_id` the current user
    pub fn login(&self, account_id: &str, attempt: &str) -> Result<Account, BankError> {
        info!("Login attempt for {} (password length: {})", account_id, attempt.chars().count());
        if !self.verify(account_id, attempt)? {
            warn!("Login failed for {}", account_id);
            return Err(BankError::InvalidCredential);
        }
        let account = self.account(account_id)?;
        *self.lock_current()? = Some(account.id().to_string());
        info!("Logged in {} as {:?}", account.id(), account.role());
        Ok(account)
    }

    pub fn logout(&self) -> Result<(), BankError> {
        if let Some(previous) = self.lock_current()?.take() {
            info!("Logged out {}", previous);
        }
        Ok(())
    }

    /// The logged-in account as it is now. An account deleted after login
    /// no longer counts as logged in.
    pub fn current_user(&self) -> Result<Option<Account>, BankError> {
        let current = self.lock_current()?.clone();
        match current {
            Some(id) => Ok(self.store.read(|state| state.account(&id))?),
            None => Ok(None),
        }
    }

    /// Change the current user without a password
    pub fn switch_user(&self, account_id: &str) -> Result<Account, BankError> {
        let account = self.account(account_id)?;
        *self.lock_current()? = Some(account.id().to_string());
        info!("Switched current user to {}", account.id());
        Ok(account)
    }

    /// Overwrite a credential unconditionally
    pub fn rotate_credential(&self, account_id: &str, new_password: &str) -> Result<(), BankError> {
        let found = self.store.mutate(|state| {
            if state.parent.id == account_id {
                state.parent.password = new_password.to_string();
                return true;
            }
            match state.child_mut(account_id) {
                Some(child) => {
                    child.password = new_password.to_string();
                    true
                }
                None => false,
            }
        })?;
        if !found {
            warn!("Cannot rotate credential, account not found: {}", account_id);
            return Err(BankError::AccountNotFound(account_id.to_string()));
        }
        info!("Credential rotated for {}", account_id);
        Ok(())
    }

    /// Self-service change: the old password must verify and the new one
    /// must be non-empty and confirmed.
    pub fn change_password(
        &self,
        account_id: &str,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), BankError> {
        if !self.verify(account_id, old_password)? {
            warn!("Password change for {} rejected: old password does not verify", account_id);
            return Err(BankError::InvalidCredential);
        }
        if new_password.is_empty() || new_password != confirm_password {
            return Err(BankError::PasswordMismatch);
        }
        self.rotate_credential(account_id, new_password)
    }

    /// The current user, provided it has `role`
    pub fn require_role(&self, role: Role) -> Result<Account, BankError> {
        match self.current_user()? {
            Some(account) if account.role() == role => Ok(account),
            Some(account) => {
                warn!("{} ({:?}) attempted a {:?}-only operation", account.id(), account.role(), role);
                Err(BankError::AccessDenied)
            }
            None => {
                warn!("Attempted a {:?}-only operation without logging in", role);
                Err(BankError::AccessDenied)
            }
        }
    }

    fn account(&self, account_id: &str) -> Result<Account, BankError> {
        self.store
            .read(|state| state.account(account_id))?
            .ok_or_else(|| BankError::AccountNotFound(account_id.to_string()))
    }

    fn lock_current(&self) -> Result<MutexGuard<'_, Option<String>>, BankError> {
        self.current
            .lock()
            .map_err(|_| BankError::StateUnavailable(anyhow!("current user lock poisoned")))
    }
}
