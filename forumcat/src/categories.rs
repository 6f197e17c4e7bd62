//! Category reads and writes keyed by category id.
//!
//! # Example
//! ```ignore
//! let store = RedisStore::connect("redis://127.0.0.1/").await?;
//! let categories = Categories::new(store, CategoryHooks::default(), ForumConfig::default());
//!
//! let general = categories.get_category_data(1).await?;
//! let names = categories.get_all_category_fields(&["cid", "name"]).await?;
//! ```

use serde_json::Value;

use crate::{
    config::ForumConfig,
    errors::CategoryError,
    hooks::{CategoryHooks, GetFieldsPayload},
    keys::{CATEGORY_ID_SET, KeyContext},
    normalize::normalize_categories,
    store::ObjectStore,
    types::CategoryRecord,
};

/// Category data access over a store, a set of hooks and site settings.
#[derive(Debug)]
pub struct Categories<S> {
    store: S,
    hooks: CategoryHooks,
    config: ForumConfig,
    keys: KeyContext,
}

impl<S> Categories<S>
where
    S: ObjectStore,
{
    /// Keys are namespaced with `config.redis.prefix`.
    pub fn new(store: S, hooks: CategoryHooks, config: ForumConfig) -> Self {
        let keys = KeyContext::new(config.redis.prefix.clone());
        Self {
            store,
            hooks,
            config,
            keys,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hooks(&self) -> &CategoryHooks {
        &self.hooks
    }

    pub fn config(&self) -> &ForumConfig {
        &self.config
    }

    pub fn keys(&self) -> &KeyContext {
        &self.keys
    }

    /// Reads and normalizes the categories `cids`, restricted to `fields` (empty for all).
    ///
    /// The result has one slot per id, in id order; `None` means the category
    /// does not exist. An empty id list returns immediately without touching
    /// the store or the hooks.
    pub async fn get_categories_fields(
        &self,
        cids: &[i64],
        fields: &[&str],
    ) -> Result<Vec<Option<CategoryRecord>>, CategoryError> {
        if cids.is_empty() {
            return Ok(Vec::new());
        }

        let keys = self.keys.categories(cids);
        let fields: Vec<String> = fields.iter().map(|field| (*field).to_string()).collect();
        let categories = self.store.get_objects(&keys, &fields).await?;
        log::debug!("fetched {} categories for {} ids", categories.len(), cids.len());

        let payload = self
            .hooks
            .get_fields
            .fire(GetFieldsPayload {
                cids: cids.to_vec(),
                categories,
                fields: fields.clone(),
                keys,
            })
            .await?;

        let mut categories = payload.categories;
        normalize_categories(&mut categories, &fields, &self.config);
        Ok(categories)
    }

    /// Every field of one category.
    pub async fn get_category_data(&self, cid: i64) -> Result<Option<CategoryRecord>, CategoryError> {
        let categories = self.get_categories_fields(&[cid], &[]).await?;
        Ok(categories.into_iter().next().flatten())
    }

    pub async fn get_categories_data(&self, cids: &[i64]) -> Result<Vec<Option<CategoryRecord>>, CategoryError> {
        self.get_categories_fields(cids, &[]).await
    }

    /// One field of one category; `None` when the category or the field is missing.
    pub async fn get_category_field(&self, cid: i64, field: &str) -> Result<Option<Value>, CategoryError> {
        let category = self.get_category_fields(cid, &[field]).await?;
        Ok(category.and_then(|mut category| category.remove(field)))
    }

    pub async fn get_category_fields(
        &self,
        cid: i64,
        fields: &[&str],
    ) -> Result<Option<CategoryRecord>, CategoryError> {
        let categories = self.get_categories_fields(&[cid], fields).await?;
        Ok(categories.into_iter().next().flatten())
    }

    /// `fields` of every registered category, in display order.
    pub async fn get_all_category_fields(&self, fields: &[&str]) -> Result<Vec<Option<CategoryRecord>>, CategoryError> {
        let cids = self.get_all_cids_from_set(CATEGORY_ID_SET).await?;
        self.get_categories_fields(&cids, fields).await
    }

    /// Category ids stored in the sorted set `set_name`, lowest score first.
    ///
    /// Members that are not integers are skipped.
    pub async fn get_all_cids_from_set(&self, set_name: &str) -> Result<Vec<i64>, CategoryError> {
        let key = self.keys.set(set_name);
        let members = self.store.get_sorted_set_range(&key).await?;
        Ok(members
            .into_iter()
            .filter_map(|member| match member.trim().parse::<i64>() {
                Ok(cid) => Some(cid),
                Err(_) => {
                    log::warn!("skipping non-numeric member {member:?} of {key}");
                    None
                }
            })
            .collect())
    }

    /// Writes one raw field; the value is not normalized.
    pub async fn set_category_field(&self, cid: i64, field: &str, value: impl Into<Value>) -> Result<(), CategoryError> {
        let value = value.into();
        self.store.set_object_field(&self.keys.category(cid), field, &value).await
    }

    /// Atomically adds `delta` to one field and returns the stored result.
    pub async fn increment_category_field_by(&self, cid: i64, field: &str, delta: i64) -> Result<i64, CategoryError> {
        self.store.incr_object_field_by(&self.keys.category(cid), field, delta).await
    }
}
