//! # State Store
//!
//! Owns the in-memory `BankState` and writes it through to a `KeyValueStore`
//! after every mutation. One mutex guards the whole snapshot, so every
//! ledger operation runs as a single writer: a metering debit and a parent
//! credit can never interleave inside each other.
//!
//! Each collection is stored under its own key, using the same keys and
//! JSON shape as the original web client:
//!
//! | key                 | content                    |
//! |---------------------|----------------------------|
//! | `tb_parent`         | parent account             |
//! | `tb_children`       | child accounts             |
//! | `tb_tasks`          | task catalog               |
//! | `tb_transactions`   | transaction log            |
//! | `tb_pending_proofs` | proofs awaiting a decision |
//! | `tb_settings`       | family settings            |
//! | `tb_allowed_apps`   | app whitelist              |
//!
//! Only collections whose serialized form changed are rewritten. A failed
//! write is logged and retried on the next mutation; the in-memory snapshot
//! stays authoritative.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::KeyValueStore;
use crate::backend::domain::models::{
    default_allowed_apps, default_tasks, AllowedApp, BankState, ChildProfile, FamilySettings,
    ParentProfile, Transaction, TransactionLog,
};

pub const PARENT_KEY: &str = "tb_parent";
pub const CHILDREN_KEY: &str = "tb_children";
pub const TASKS_KEY: &str = "tb_tasks";
pub const TRANSACTIONS_KEY: &str = "tb_transactions";
pub const PENDING_PROOFS_KEY: &str = "tb_pending_proofs";
pub const SETTINGS_KEY: &str = "tb_settings";
pub const ALLOWED_APPS_KEY: &str = "tb_allowed_apps";

/// Appended to a key to hold a stored value that failed to parse
pub const UNREADABLE_SUFFIX: &str = "_unreadable";

/// Accounts are written with their `role` tag, as the web client reads them.
/// Loading ignores the tag since each key holds a single role.
#[derive(Serialize)]
#[serde(tag = "role", rename_all = "UPPERCASE")]
enum StoredAccount<'a> {
    Parent(&'a ParentProfile),
    Child(&'a ChildProfile),
}

/// Allowed apps were once stored as bare names; both shapes still load.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAllowedApp {
    Name(String),
    Entry(AllowedApp),
}

impl From<StoredAllowedApp> for AllowedApp {
    fn from(stored: StoredAllowedApp) -> Self {
        match stored {
            StoredAllowedApp::Name(name) => AllowedApp::new(name, ""),
            StoredAllowedApp::Entry(app) => app,
        }
    }
}

struct StoreInner {
    state: BankState,
    /// Last serialized value successfully written per key
    persisted: HashMap<&'static str, String>,
}

pub struct StateStore {
    kv: Arc<dyn KeyValueStore>,
    inner: Mutex<StoreInner>,
}

impl StateStore {
    /// Load every collection, falling back to defaults for anything missing
    /// or unreadable, then write back whatever had to be defaulted or upgraded.
    ///
    /// With `seed_demo_data`, a first run also gets the sample children and
    /// their opening transactions. Demo data never replaces a collection that
    /// exists but cannot be read: such a collection starts empty, its raw value
    /// is copied under `<key>_unreadable`, and the original key is left alone
    /// until a mutation actually changes that collection.
    pub fn load(kv: Arc<dyn KeyValueStore>, seed_demo_data: bool, now: DateTime<Utc>) -> Result<Self> {
        info!("Loading bank state (demo data: {})", seed_demo_data);
        let mut unreadable = Vec::new();

        let parent = load_collection(kv.as_ref(), PARENT_KEY, &mut unreadable, ParentProfile::default, ParentProfile::default)?;
        let children = load_collection(
            kv.as_ref(),
            CHILDREN_KEY,
            &mut unreadable,
            || if seed_demo_data { demo_children() } else { Vec::new() },
            Vec::new,
        )?;
        let tasks = load_collection(kv.as_ref(), TASKS_KEY, &mut unreadable, default_tasks, default_tasks)?;
        let transactions = load_collection(
            kv.as_ref(),
            TRANSACTIONS_KEY,
            &mut unreadable,
            || if seed_demo_data { demo_transactions(now) } else { TransactionLog::default() },
            TransactionLog::default,
        )?;
        let pending_proofs = load_collection(kv.as_ref(), PENDING_PROOFS_KEY, &mut unreadable, Vec::new, Vec::new)?;
        let settings = load_collection(kv.as_ref(), SETTINGS_KEY, &mut unreadable, FamilySettings::default, FamilySettings::default)?;
        let allowed_apps = load_allowed_apps(kv.as_ref(), &mut unreadable)?;

        let state = BankState {
            parent,
            children,
            tasks,
            transactions,
            pending_proofs,
            settings,
            allowed_apps,
        };
        info!(
            "Loaded {} children, {} tasks, {} transactions, {} pending proofs",
            state.children.len(),
            state.tasks.len(),
            state.transactions.len(),
            state.pending_proofs.len()
        );

        let mut inner = StoreInner { state, persisted: HashMap::new() };
        // Seed the cache with what is already on disk so unchanged keys are not rewritten
        for key in ALL_KEYS {
            if let Some(raw) = kv.get(key)? {
                inner.persisted.insert(key, raw);
            }
        }
        inner.preserve_unreadable(kv.as_ref(), &unreadable)?;
        inner.write_through(kv.as_ref());

        Ok(Self { kv, inner: Mutex::new(inner) })
    }

    /// Run `f` against the current snapshot
    pub fn read<R>(&self, f: impl FnOnce(&BankState) -> R) -> Result<R> {
        let inner = self.lock()?;
        Ok(f(&inner.state))
    }

    /// Run `f` with exclusive access, then persist whatever changed
    pub fn mutate<R>(&self, f: impl FnOnce(&mut BankState) -> R) -> Result<R> {
        let mut inner = self.lock()?;
        let result = f(&mut inner.state);
        inner.write_through(self.kv.as_ref());
        Ok(result)
    }

    /// Cloned copy of the whole state
    pub fn snapshot(&self) -> Result<BankState> {
        self.read(|state| state.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>> {
        self.inner.lock().map_err(|_| anyhow!("bank state lock poisoned"))
    }
}

const ALL_KEYS: [&str; 7] = [
    PARENT_KEY,
    CHILDREN_KEY,
    TASKS_KEY,
    TRANSACTIONS_KEY,
    PENDING_PROOFS_KEY,
    SETTINGS_KEY,
    ALLOWED_APPS_KEY,
];

impl StoreInner {
    /// Back up each unreadable raw value, then mark the fallback that replaced
    /// it as already persisted so loading alone never overwrites it.
    fn preserve_unreadable(&mut self, kv: &dyn KeyValueStore, unreadable: &[&'static str]) -> Result<()> {
        if unreadable.is_empty() {
            return Ok(());
        }
        let serialized = serialize_collections(&self.state)?;
        for key in unreadable {
            if let Some(raw) = self.persisted.get(key) {
                let backup_key = format!("{}{}", key, UNREADABLE_SUFFIX);
                match kv.set(&backup_key, raw) {
                    Ok(()) => warn!("Kept unreadable {} as {}", key, backup_key),
                    Err(e) => error!("Failed to back up unreadable {}: {}", key, e),
                }
            }
            if let Some((_, json)) = serialized.iter().find(|(k, _)| k == key) {
                self.persisted.insert(*key, json.clone());
            }
        }
        Ok(())
    }

    fn write_through(&mut self, kv: &dyn KeyValueStore) {
        let serialized = match serialize_collections(&self.state) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!("Failed to serialize bank state: {}", e);
                return;
            }
        };

        for (key, json) in serialized {
            if self.persisted.get(key) == Some(&json) {
                continue;
            }
            match kv.set(key, &json) {
                Ok(()) => {
                    debug!("Wrote through {}", key);
                    self.persisted.insert(key, json);
                }
                Err(e) => error!("Failed to persist {}: {}", key, e),
            }
        }
    }
}

fn serialize_collections(state: &BankState) -> Result<Vec<(&'static str, String)>> {
    Ok(vec![
        (PARENT_KEY, serde_json::to_string(&StoredAccount::Parent(&state.parent))?),
        (
            CHILDREN_KEY,
            serde_json::to_string(&state.children.iter().map(StoredAccount::Child).collect::<Vec<_>>())?,
        ),
        (TASKS_KEY, serde_json::to_string(&state.tasks)?),
        (TRANSACTIONS_KEY, serde_json::to_string(&state.transactions)?),
        (PENDING_PROOFS_KEY, serde_json::to_string(&state.pending_proofs)?),
        (SETTINGS_KEY, serde_json::to_string(&state.settings)?),
        (ALLOWED_APPS_KEY, serde_json::to_string(&state.allowed_apps)?),
    ])
}

fn load_collection<T, M, U>(
    kv: &dyn KeyValueStore,
    key: &'static str,
    unreadable: &mut Vec<&'static str>,
    when_missing: M,
    when_unreadable: U,
) -> Result<T>
where
    T: DeserializeOwned,
    M: FnOnce() -> T,
    U: FnOnce() -> T,
{
    match kv.get(key)? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Stored {} is unreadable ({}), starting from a fallback", key, e);
                unreadable.push(key);
                Ok(when_unreadable())
            }
        },
        None => {
            debug!("No stored {}, using defaults", key);
            Ok(when_missing())
        }
    }
}

fn load_allowed_apps(kv: &dyn KeyValueStore, unreadable: &mut Vec<&'static str>) -> Result<Vec<AllowedApp>> {
    let stored: Vec<StoredAllowedApp> = match kv.get(ALLOWED_APPS_KEY)? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Stored allowed apps are unreadable ({}), using defaults", e);
                unreadable.push(ALLOWED_APPS_KEY);
                return Ok(default_allowed_apps());
            }
        },
        None => return Ok(default_allowed_apps()),
    };

    let legacy = stored.iter().filter(|s| matches!(s, StoredAllowedApp::Name(_))).count();
    if legacy > 0 {
        info!("Upgrading {} allowed app(s) from the name-only format", legacy);
    }
    Ok(stored.into_iter().map(AllowedApp::from).collect())
}

fn demo_children() -> Vec<ChildProfile> {
    vec![
        ChildProfile {
            id: "c1".to_string(),
            name: "小李 (Leo)".to_string(),
            avatar: "https://picsum.photos/150/150?random=1".to_string(),
            password: "1234".to_string(),
            balance: 45,
            total_earned: 120,
            level: 2,
            is_locked: false,
            weekly_allowance: 30,
        },
        ChildProfile {
            id: "c2".to_string(),
            name: "小美 (Mia)".to_string(),
            avatar: "https://picsum.photos/150/150?random=2".to_string(),
            password: "1234".to_string(),
            balance: 10,
            total_earned: 80,
            level: 1,
            is_locked: false,
            weekly_allowance: 30,
        },
    ]
}

fn demo_transactions(now: DateTime<Utc>) -> TransactionLog {
    let mut allowance = Transaction::earn(
        "c1",
        30,
        "每週零用時間".to_string(),
        Some("Allowance".to_string()),
        now - Duration::days(1),
    );
    allowance.id = "tx1".to_string();
    let mut reading = Transaction::earn(
        "c1",
        15,
        "閱讀課外書".to_string(),
        Some("Reading".to_string()),
        now - Duration::hours(1),
    );
    reading.id = "tx2".to_string();
    TransactionLog::from_entries(vec![allowance, reading])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::InMemoryKeyValueStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    /// Store that fails every write, to check the in-memory state stays usable
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk full writing {}", key))
        }
    }

    #[test]
    fn test_first_run_seeds_and_persists_defaults() {
        let kv = InMemoryKeyValueStore::new();
        let store = StateStore::load(Arc::new(kv.clone()), true, now()).unwrap();
        let state = store.snapshot().unwrap();

        assert_eq!(state.parent.id, "p1");
        assert_eq!(state.children.len(), 2);
        assert_eq!(state.tasks.len(), 4);
        assert_eq!(state.transactions.len(), 2);
        assert_eq!(state.allowed_apps.len(), 4);

        for key in ALL_KEYS {
            assert!(kv.get(key).unwrap().is_some(), "{} should be written on first run", key);
        }
    }

    #[test]
    fn test_without_demo_data_starts_with_no_children() {
        let store = StateStore::load(Arc::new(InMemoryKeyValueStore::new()), false, now()).unwrap();
        let state = store.snapshot().unwrap();
        assert!(state.children.is_empty());
        assert!(state.transactions.is_empty());
        assert_eq!(state.tasks.len(), 4);
    }

    #[test]
    fn test_legacy_allowed_apps_are_upgraded() {
        let kv = InMemoryKeyValueStore::new().with_entry(ALLOWED_APPS_KEY, r#"["YouTube","Roblox"]"#);
        let store = StateStore::load(Arc::new(kv.clone()), false, now()).unwrap();

        let apps = store.read(|s| s.allowed_apps.clone()).unwrap();
        assert_eq!(apps, vec![AllowedApp::new("YouTube", ""), AllowedApp::new("Roblox", "")]);

        let rewritten: serde_json::Value =
            serde_json::from_str(&kv.get(ALLOWED_APPS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(rewritten[0]["name"], "YouTube");
        assert_eq!(rewritten[0]["rule"], "");
    }

    #[test]
    fn test_current_and_mixed_allowed_app_shapes_load() {
        let kv = InMemoryKeyValueStore::new().with_entry(
            ALLOWED_APPS_KEY,
            r#"[{"name":"YouTube","rule":"只能看英文教學頻道"},"Minecraft"]"#,
        );
        let store = StateStore::load(Arc::new(kv), false, now()).unwrap();
        let apps = store.read(|s| s.allowed_apps.clone()).unwrap();
        assert_eq!(apps[0].rule, "只能看英文教學頻道");
        assert_eq!(apps[1], AllowedApp::new("Minecraft", ""));
    }

    #[test]
    fn test_unreadable_allowed_apps_fall_back_to_defaults() {
        let kv = InMemoryKeyValueStore::new().with_entry(ALLOWED_APPS_KEY, "{not json");
        let store = StateStore::load(Arc::new(kv), false, now()).unwrap();
        assert_eq!(store.read(|s| s.allowed_apps.len()).unwrap(), 4);
    }

    #[test]
    fn test_mutation_writes_through_only_changed_keys() {
        let kv = InMemoryKeyValueStore::new();
        let store = StateStore::load(Arc::new(kv.clone()), true, now()).unwrap();
        let tasks_before = kv.get(TASKS_KEY).unwrap();

        store.mutate(|s| s.child_mut("c1").unwrap().is_locked = true).unwrap();

        let children: Vec<ChildProfile> =
            serde_json::from_str(&kv.get(CHILDREN_KEY).unwrap().unwrap()).unwrap();
        assert!(children[0].is_locked);
        assert_eq!(kv.get(TASKS_KEY).unwrap(), tasks_before);
    }

    #[test]
    fn test_reload_sees_persisted_state() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = StateStore::load(kv.clone(), true, now()).unwrap();
        store.mutate(|s| s.children.retain(|c| c.id != "c2")).unwrap();

        let reloaded = StateStore::load(kv, true, now()).unwrap();
        let ids: Vec<String> = reloaded.read(|s| s.children.iter().map(|c| c.id.clone()).collect()).unwrap();
        assert_eq!(ids, vec!["c1".to_string()]);
    }

    #[test]
    fn test_failed_writes_keep_memory_authoritative() {
        let store = StateStore::load(Arc::new(FailingStore), true, now()).unwrap();
        store.mutate(|s| s.child_mut("c2").unwrap().balance = 99).unwrap();
        assert_eq!(store.read(|s| s.child("c2").unwrap().balance).unwrap(), 99);
    }

    #[test]
    fn test_unreadable_children_survive_load() {
        let raw = r#"[{"id":"c17","name":"Kai","role":"CHILD","avatar":"","balance":42.5,
            "totalEarned":60,"level":1,"isLocked":false,"weeklyAllowance":30,"password":"1234"}]"#;
        let kv = InMemoryKeyValueStore::new().with_entry(CHILDREN_KEY, raw);
        let store = StateStore::load(Arc::new(kv.clone()), true, now()).unwrap();

        // no demo children in place of a family that exists on disk
        assert!(store.read(|s| s.children.is_empty()).unwrap());
        assert_eq!(kv.get(CHILDREN_KEY).unwrap().as_deref(), Some(raw));
        let backup = format!("{}{}", CHILDREN_KEY, UNREADABLE_SUFFIX);
        assert_eq!(kv.get(&backup).unwrap().as_deref(), Some(raw));

        // unrelated mutations leave the stored children alone
        store.mutate(|s| s.settings.exchange_rate = 2).unwrap();
        assert_eq!(kv.get(CHILDREN_KEY).unwrap().as_deref(), Some(raw));
    }

    #[test]
    fn test_unreadable_transactions_are_not_replaced_by_demo_log() {
        let kv = InMemoryKeyValueStore::new().with_entry(TRANSACTIONS_KEY, "{truncated");
        let store = StateStore::load(Arc::new(kv.clone()), true, now()).unwrap();

        assert!(store.read(|s| s.transactions.is_empty()).unwrap());
        assert_eq!(store.read(|s| s.children.len()).unwrap(), 2);
        assert_eq!(kv.get(TRANSACTIONS_KEY).unwrap().as_deref(), Some("{truncated"));
    }

    #[test]
    fn test_accounts_are_stored_with_their_role() {
        let kv = InMemoryKeyValueStore::new();
        StateStore::load(Arc::new(kv.clone()), true, now()).unwrap();

        let parent: serde_json::Value = serde_json::from_str(&kv.get(PARENT_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(parent["role"], "PARENT");
        assert_eq!(parent["id"], "p1");

        let children: serde_json::Value = serde_json::from_str(&kv.get(CHILDREN_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(children[0]["role"], "CHILD");
        assert_eq!(children[1]["totalEarned"], 80);

        let reloaded = StateStore::load(Arc::new(kv), true, now()).unwrap();
        assert_eq!(reloaded.read(|s| s.parent.password.clone()).unwrap(), "0000");
        assert_eq!(reloaded.read(|s| s.children.len()).unwrap(), 2);
    }
}
