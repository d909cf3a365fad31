//! Session metering: turns device usage time into ledger debits.
//!
//! A session records when it started and how many whole minutes it has
//! charged so far. Each tick compares the minutes due (elapsed seconds / 60)
//! with the minutes charged and debits the difference one minute at a time,
//! so every 60-second boundary is charged exactly once no matter how often
//! or how late ticks arrive.
//!
//! Before every debit the tick re-reads the account inside the same state
//! mutation. A lock or an empty balance therefore stops the session before
//! the next minute is charged.
//!
//! Lock order is sessions first, then state.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

use crate::backend::domain::clock::Clock;
use crate::backend::domain::commands::ledger::{DebitCommand, LedgerResult};
use crate::backend::domain::errors::{BankError, SessionStartError};
use crate::backend::domain::ledger_service::debit_child;
use crate::backend::domain::models::Transaction;
use crate::backend::storage::StateStore;

/// Seconds of usage charged as one minute
pub const SECONDS_PER_CHARGE: i64 = 60;

const NOTICE_CAPACITY: usize = 32;

pub fn usage_reason(app_name: &str) -> String {
    format!("使用 {}", app_name)
}

pub fn retroactive_reason(app_name: &str) -> String {
    format!("補登: {}", app_name)
}

#[derive(Debug, Clone)]
struct ActiveSession {
    app_name: String,
    started_at: DateTime<Utc>,
    charged_minutes: u64,
}

impl ActiveSession {
    fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.started_at).num_seconds()).unwrap_or(0)
    }

    fn minutes_due(&self, now: DateTime<Utc>) -> u64 {
        self.elapsed_seconds(now) / SECONDS_PER_CHARGE as u64
    }
}

/// Read-only view of a running session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub child_id: String,
    pub app_name: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_seconds: u64,
    pub charged_minutes: u64,
}

/// Why a session ended without the child stopping it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Exhausted,
    Locked,
    AccountRemoved,
}

impl StopReason {
    /// Notice shown to the child
    pub fn message(&self) -> &'static str {
        match self {
            StopReason::Exhausted => "時間用光了！請先完成任務賺取更多時間吧。",
            StopReason::Locked => "家長已暫時鎖定您的使用權限。",
            StopReason::AccountRemoved => "帳號已不存在。",
        }
    }
}

/// Published whenever a session is force-stopped
#[derive(Debug, Clone, PartialEq)]
pub struct SessionNotice {
    pub child_id: String,
    pub app_name: String,
    pub reason: StopReason,
    pub charged_minutes: u64,
}

impl SessionNotice {
    pub fn message(&self) -> &'static str {
        self.reason.message()
    }
}

/// What a single tick did for one session
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub child_id: String,
    pub debits: Vec<Transaction>,
    pub stopped: Option<StopReason>,
}

impl TickOutcome {
    fn is_quiet(&self) -> bool {
        self.debits.is_empty() && self.stopped.is_none()
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<StateStore>,
    clock: Arc<dyn Clock>,
    sessions: Arc<Mutex<HashMap<String, ActiveSession>>>,
    notices: broadcast::Sender<SessionNotice>,
}

impl SessionService {
    pub fn new(store: Arc<StateStore>, clock: Arc<dyn Clock>) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            store,
            clock,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            notices,
        }
    }

    /// Receive a notice for every forced stop from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionNotice> {
        self.notices.subscribe()
    }

    /// Start metering usage of `app_name`. Rejected without side effects when
    /// the account is missing, locked or empty, no app is named, or a session
    /// is already running.
    pub fn start_session(&self, child_id: &str, app_name: &str) -> Result<SessionSnapshot, BankError> {
        let mut sessions = self.lock_sessions()?;
        let child = self.store.read(|state| state.child(child_id).cloned())?;

        let rejection = match &child {
            None => Some(SessionStartError::AccountNotFound(child_id.to_string())),
            Some(child) if child.is_locked => Some(SessionStartError::AccountLocked),
            Some(child) if child.balance == 0 => Some(SessionStartError::InsufficientBalance),
            Some(_) if app_name.trim().is_empty() => Some(SessionStartError::NoAppSelected),
            Some(_) if sessions.contains_key(child_id) => Some(SessionStartError::AlreadyActive),
            Some(_) => None,
        };
        if let Some(rejection) = rejection {
            info!("Session start rejected for {}: {}", child_id, rejection);
            return Err(rejection.into());
        }

        let session = ActiveSession {
            app_name: app_name.trim().to_string(),
            started_at: self.clock.now(),
            charged_minutes: 0,
        };
        info!("Session started for {} on {}", child_id, session.app_name);
        let snapshot = Self::snapshot(child_id, &session, session.started_at);
        sessions.insert(child_id.to_string(), session);
        Ok(snapshot)
    }

    /// Charge whatever minute boundaries this child's session crossed since
    /// the last tick, then force-stop it if the account is locked or empty.
    /// Returns `None` when no session is running.
    pub fn tick(&self, child_id: &str) -> Result<Option<TickOutcome>, BankError> {
        let mut sessions = self.lock_sessions()?;
        self.tick_locked(&mut sessions, child_id)
    }

    /// Tick every running session. Only sessions that debited or stopped are
    /// reported.
    pub fn tick_all(&self) -> Result<Vec<TickOutcome>, BankError> {
        let mut sessions = self.lock_sessions()?;
        let child_ids: Vec<String> = sessions.keys().cloned().collect();
        let mut outcomes = Vec::new();
        for child_id in child_ids {
            if let Some(outcome) = self.tick_locked(&mut sessions, &child_id)? {
                if !outcome.is_quiet() {
                    outcomes.push(outcome);
                }
            }
        }
        Ok(outcomes)
    }

    /// Child-initiated stop. Boundaries already crossed are charged; the
    /// partial minute since the last boundary is not.
    pub fn stop_session(&self, child_id: &str) -> Result<Option<SessionSnapshot>, BankError> {
        let mut sessions = self.lock_sessions()?;
        self.tick_locked(&mut sessions, child_id)?;

        let Some(session) = sessions.remove(child_id) else {
            debug!("No running session to stop for {}", child_id);
            return Ok(None);
        };
        let snapshot = Self::snapshot(child_id, &session, self.clock.now());
        info!(
            "Session stopped for {} on {} after {}s ({} minutes charged)",
            child_id, session.app_name, snapshot.elapsed_seconds, snapshot.charged_minutes
        );
        Ok(Some(snapshot))
    }

    pub fn status(&self, child_id: &str) -> Result<Option<SessionSnapshot>, BankError> {
        let sessions = self.lock_sessions()?;
        let now = self.clock.now();
        Ok(sessions.get(child_id).map(|s| Self::snapshot(child_id, s, now)))
    }

    pub fn active_sessions(&self) -> Result<Vec<SessionSnapshot>, BankError> {
        let sessions = self.lock_sessions()?;
        let now = self.clock.now();
        Ok(sessions.iter().map(|(id, s)| Self::snapshot(id, s, now)).collect())
    }

    /// Debit usage that happened without a live session
    pub fn record_retroactive(&self, child_id: &str, app_name: &str, minutes: u32) -> Result<LedgerResult, BankError> {
        info!("Recording {} retroactive minutes on {} for {}", minutes, app_name, child_id);
        let now = self.clock.now();
        let command = DebitCommand {
            account_id: child_id.to_string(),
            amount: minutes,
            reason: retroactive_reason(app_name.trim()),
        };
        let result = self.store.mutate(|state| debit_child(state, command, now))?;
        if let Err(e) = &result {
            warn!("Retroactive entry for {} failed: {}", child_id, e);
        }
        result
    }

    fn tick_locked(
        &self,
        sessions: &mut HashMap<String, ActiveSession>,
        child_id: &str,
    ) -> Result<Option<TickOutcome>, BankError> {
        let Some(session) = sessions.get_mut(child_id) else {
            return Ok(None);
        };
        let now = self.clock.now();
        let mut pending = session.minutes_due(now).saturating_sub(session.charged_minutes);

        let (debits, stopped) = self.store.mutate(|state| {
            let mut debits = Vec::new();
            loop {
                let Some(child) = state.child(child_id) else {
                    return (debits, Some(StopReason::AccountRemoved));
                };
                if child.is_locked {
                    return (debits, Some(StopReason::Locked));
                }
                if child.balance == 0 {
                    return (debits, Some(StopReason::Exhausted));
                }
                if pending == 0 {
                    return (debits, None);
                }

                let command = DebitCommand {
                    account_id: child_id.to_string(),
                    amount: 1,
                    reason: usage_reason(&session.app_name),
                };
                match debit_child(state, command, now) {
                    Ok(result) => {
                        session.charged_minutes += 1;
                        pending -= 1;
                        debits.push(result.transaction);
                    }
                    Err(e) => {
                        warn!("Usage debit for {} failed: {}", child_id, e);
                        return (debits, Some(StopReason::AccountRemoved));
                    }
                }
            }
        })?;

        if !debits.is_empty() {
            debug!("Charged {} minute(s) to {} for {}", debits.len(), child_id, session.app_name);
        }

        if let Some(reason) = stopped {
            let notice = SessionNotice {
                child_id: child_id.to_string(),
                app_name: session.app_name.clone(),
                reason,
                charged_minutes: session.charged_minutes,
            };
            sessions.remove(child_id);
            info!("Session for {} force-stopped: {:?}", child_id, reason);
            // no subscribers is fine
            let _ = self.notices.send(notice);
        }

        Ok(Some(TickOutcome { child_id: child_id.to_string(), debits, stopped }))
    }

    fn snapshot(child_id: &str, session: &ActiveSession, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            child_id: child_id.to_string(),
            app_name: session.app_name.clone(),
            started_at: session.started_at,
            elapsed_seconds: session.elapsed_seconds(now),
            charged_minutes: session.charged_minutes,
        }
    }

    fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<String, ActiveSession>>, BankError> {
        self.sessions
            .lock()
            .map_err(|_| BankError::StateUnavailable(anyhow!("session table lock poisoned")))
    }
}
