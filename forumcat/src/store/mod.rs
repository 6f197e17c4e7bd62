//! Key-value store access for category hashes.
//!
//! [`ObjectStore`] is the narrow surface category reads and writes need:
//! a batched hash read, single-field writes, atomic increments and sorted-set
//! enumeration. [`RedisStore`] talks to Redis; [`MemoryStore`] keeps everything
//! in-process and records each call it receives.

mod memory;
mod redis_store;

pub use memory::{MemoryStore, StoreCall};
pub use redis_store::RedisStore;

use serde_json::Value;

use crate::{errors::CategoryError, types::CategoryRecord};

#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Reads one hash per key, in key order.
    ///
    /// An empty `fields` reads whole hashes. Otherwise only the named fields are
    /// read and a field missing from an existing hash comes back as `null`.
    /// A key with no hash yields `None`.
    async fn get_objects(&self, keys: &[String], fields: &[String])
    -> Result<Vec<Option<CategoryRecord>>, CategoryError>;

    async fn set_object_field(&self, key: &str, field: &str, value: &Value) -> Result<(), CategoryError>;

    /// Atomically adds `delta` to an integer field and returns the new value.
    async fn incr_object_field_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, CategoryError>;

    /// Every member of a sorted set, lowest score first.
    async fn get_sorted_set_range(&self, key: &str) -> Result<Vec<String>, CategoryError>;
}
