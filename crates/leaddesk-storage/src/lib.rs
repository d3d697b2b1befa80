use chrono::Utc;
use leaddesk_core::records::{uid, FollowUp, FollowUpDraft, Lead, LeadDraft};
use leaddesk_core::validate::{validate_follow_up, validate_lead, ValidationErrors};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::warn;

pub const LEADS_KEY: &str = "leads";
pub const FOLLOW_UPS_KEY: &str = "followups";

#[derive(Debug, Error)]
enum KvError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

// Key/value adapter over one JSON file per key. Reads and writes never fail
// the caller: a broken entry falls back to the supplied default and a failed
// write leaves the previous file in place, both logged at warn level.
#[derive(Debug, Clone)]
pub struct KvStore {
    backend: Backend,
}

#[derive(Debug, Clone)]
enum Backend {
    Dir(PathBuf),
    Memory(Arc<Mutex<HashMap<String, String>>>),
}

impl KvStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Dir(dir.into()),
        }
    }

    // Clones share the same map, so several stores can sit on one backend.
    pub fn open_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::default()),
        }
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read_value(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                warn!(key, error = %err, "load failed, falling back to default");
                default
            }
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = self.write_value(key, value) {
            warn!(key, error = %err, "save failed, value not persisted");
        }
    }

    fn read_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        let raw = match &self.backend {
            Backend::Dir(dir) => {
                let path = entry_path(dir, key);
                if !path.exists() {
                    return Ok(None);
                }
                Some(fs::read_to_string(path)?)
            }
            Backend::Memory(entries) => {
                let entries = entries
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                entries.get(key).cloned()
            }
        };
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write_value<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let raw = serde_json::to_string(value)?;
        match &self.backend {
            Backend::Dir(dir) => {
                fs::create_dir_all(dir)?;
                fs::write(entry_path(dir, key), raw)?;
            }
            Backend::Memory(entries) => {
                let mut entries = entries
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                entries.insert(key.to_string(), raw);
            }
        }
        Ok(())
    }
}

fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

pub trait Record: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> &str;
}

impl Record for Lead {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for FollowUp {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action<R> {
    Add(R),
    Update(R),
    Delete(String),
    Set(Vec<R>),
}

// Pure transition: adds prepend, updates replace in place, deletes drop by
// id, sets swap the whole collection. Unknown update and delete ids leave
// the collection unchanged.
pub fn apply<R: Record>(mut items: Vec<R>, action: Action<R>) -> Vec<R> {
    match action {
        Action::Add(record) => {
            items.insert(0, record);
            items
        }
        Action::Update(record) => {
            if let Some(slot) = items.iter_mut().find(|existing| existing.id() == record.id()) {
                *slot = record;
            }
            items
        }
        Action::Delete(id) => {
            items.retain(|existing| existing.id() != id);
            items
        }
        Action::Set(replacement) => replacement,
    }
}

pub struct RecordStore<R: Record> {
    key: &'static str,
    kv: KvStore,
    items: Vec<R>,
}

impl<R: Record> RecordStore<R> {
    pub fn open(kv: KvStore, key: &'static str) -> Self {
        let items = kv.load(key, Vec::new());
        Self { key, kv, items }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    // Every dispatch rewrites the key, even when the action was a no-op.
    pub fn dispatch(&mut self, action: Action<R>) {
        let items = std::mem::take(&mut self.items);
        self.items = apply(items, action);
        self.kv.save(self.key, &self.items);
    }
}

pub struct LeadStore {
    store: RecordStore<Lead>,
}

impl LeadStore {
    pub fn open(kv: KvStore) -> Self {
        Self {
            store: RecordStore::open(kv, LEADS_KEY),
        }
    }

    pub fn leads(&self) -> &[Lead] {
        self.store.items()
    }

    pub fn add(&mut self, draft: LeadDraft) -> Result<Lead, ValidationErrors> {
        validate_lead(&draft, self.store.items(), None).into_result()?;
        let lead = draft.materialize(uid(), Utc::now());
        self.store.dispatch(Action::Add(lead.clone()));
        Ok(lead)
    }

    // Ok(None) means no lead carried the id; the draft itself was valid.
    pub fn update(&mut self, id: &str, draft: LeadDraft) -> Result<Option<Lead>, ValidationErrors> {
        validate_lead(&draft, self.store.items(), Some(id)).into_result()?;
        let created_at = self
            .store
            .items()
            .iter()
            .find(|lead| lead.id == id)
            .map(|lead| lead.created_at);
        let found = created_at.is_some();
        let lead = draft.materialize(id.to_string(), created_at.unwrap_or_else(Utc::now));
        self.store.dispatch(Action::Update(lead.clone()));
        Ok(found.then_some(lead))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let existed = self.store.items().iter().any(|lead| lead.id == id);
        self.store.dispatch(Action::Delete(id.to_string()));
        existed
    }

    pub fn replace_all(&mut self, leads: Vec<Lead>) {
        self.store.dispatch(Action::Set(leads));
    }
}

pub struct FollowUpStore {
    store: RecordStore<FollowUp>,
}

impl FollowUpStore {
    pub fn open(kv: KvStore) -> Self {
        Self {
            store: RecordStore::open(kv, FOLLOW_UPS_KEY),
        }
    }

    pub fn follow_ups(&self) -> &[FollowUp] {
        self.store.items()
    }

    pub fn add(&mut self, draft: FollowUpDraft) -> Result<FollowUp, ValidationErrors> {
        validate_follow_up(&draft).into_result()?;
        let follow_up = draft.materialize(uid(), Utc::now());
        self.store.dispatch(Action::Add(follow_up.clone()));
        Ok(follow_up)
    }

    pub fn update(
        &mut self,
        id: &str,
        draft: FollowUpDraft,
    ) -> Result<Option<FollowUp>, ValidationErrors> {
        validate_follow_up(&draft).into_result()?;
        let created_at = self
            .store
            .items()
            .iter()
            .find(|follow_up| follow_up.id == id)
            .map(|follow_up| follow_up.created_at);
        let found = created_at.is_some();
        let follow_up = draft.materialize(id.to_string(), created_at.unwrap_or_else(Utc::now));
        self.store.dispatch(Action::Update(follow_up.clone()));
        Ok(found.then_some(follow_up))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let existed = self.store.items().iter().any(|follow_up| follow_up.id == id);
        self.store.dispatch(Action::Delete(id.to_string()));
        existed
    }

    pub fn replace_all(&mut self, follow_ups: Vec<FollowUp>) {
        self.store.dispatch(Action::Set(follow_ups));
    }
}
