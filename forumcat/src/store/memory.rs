use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde_json::Value;

use crate::{
    errors::CategoryError,
    store::ObjectStore,
    types::CategoryRecord,
    values::{parse_int, to_loose_string},
};

/// One call received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    GetObjects { keys: Vec<String>, fields: Vec<String> },
    SetObjectField { key: String, field: String, value: Value },
    IncrObjectFieldBy { key: String, field: String, delta: i64 },
    GetSortedSetRange { key: String },
}

#[derive(Debug, Default)]
struct MemoryState {
    hashes: HashMap<String, CategoryRecord>,
    sorted_sets: HashMap<String, Vec<(f64, String)>>,
    calls: Vec<StoreCall>,
}

/// In-process [`ObjectStore`] with Redis-like read semantics.
///
/// Writes store string values the way Redis would; records inserted directly
/// through [`MemoryStore::insert_object`] keep whatever value types they carry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_object(&self, key: impl Into<String>, record: CategoryRecord) {
        self.state().hashes.insert(key.into(), record);
    }

    pub fn object(&self, key: &str) -> Option<CategoryRecord> {
        self.state().hashes.get(key).cloned()
    }

    /// Adds or re-scores a sorted-set member.
    pub fn add_to_sorted_set(&self, key: impl Into<String>, score: f64, member: impl Into<String>) {
        let member = member.into();
        let mut state = self.state();
        let set = state.sorted_sets.entry(key.into()).or_default();
        set.retain(|(_, existing)| *existing != member);
        set.push((score, member));
        set.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

impl ObjectStore for MemoryStore {
    async fn get_objects(
        &self,
        keys: &[String],
        fields: &[String],
    ) -> Result<Vec<Option<CategoryRecord>>, CategoryError> {
        let mut state = self.state();
        state.calls.push(StoreCall::GetObjects {
            keys: keys.to_vec(),
            fields: fields.to_vec(),
        });

        let records = keys
            .iter()
            .map(|key| {
                let hash = state.hashes.get(key).filter(|hash| !hash.is_empty())?;
                if fields.is_empty() {
                    return Some(hash.clone());
                }
                Some(
                    fields
                        .iter()
                        .map(|field| (field.clone(), hash.get(field).cloned().unwrap_or(Value::Null)))
                        .collect(),
                )
            })
            .collect();
        Ok(records)
    }

    async fn set_object_field(&self, key: &str, field: &str, value: &Value) -> Result<(), CategoryError> {
        let mut state = self.state();
        state.calls.push(StoreCall::SetObjectField {
            key: key.to_string(),
            field: field.to_string(),
            value: value.clone(),
        });
        state
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), Value::String(to_loose_string(value)));
        Ok(())
    }

    async fn incr_object_field_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, CategoryError> {
        let mut state = self.state();
        state.calls.push(StoreCall::IncrObjectFieldBy {
            key: key.to_string(),
            field: field.to_string(),
            delta,
        });
        let hash = state.hashes.entry(key.to_string()).or_default();
        let current = hash.get(field).map_or(0, parse_int);
        let updated = current.checked_add(delta).ok_or_else(|| CategoryError::Other {
            message: format!("increment of {key}.{field} overflows").into(),
        })?;
        hash.insert(field.to_string(), Value::String(updated.to_string()));
        Ok(updated)
    }

    async fn get_sorted_set_range(&self, key: &str) -> Result<Vec<String>, CategoryError> {
        let mut state = self.state();
        state.calls.push(StoreCall::GetSortedSetRange { key: key.to_string() });
        Ok(state
            .sorted_sets
            .get(key)
            .map(|set| set.iter().map(|(_, member)| member.clone()).collect())
            .unwrap_or_default())
    }
}
