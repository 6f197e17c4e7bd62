//! Forum settings consumed by category normalization.
//!
//! Loaded from TOML; every section is optional and falls back to defaults.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CategoryError;

/// Configuration stored in `forumcat.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForumConfig {
    #[serde(default)]
    pub redis: RedisSettings,
    #[serde(default)]
    pub meta: MetaSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Namespace prepended to every key; empty for the bare layout.
    #[serde(default)]
    pub prefix: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            prefix: String::new(),
        }
    }
}

fn default_redis_url() -> String {
    "${REDIS_URL}".to_string()
}

/// Site-wide settings, keyed the way the forum stores them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaSettings {
    #[serde(rename = "minimumTagsPerTopic", default)]
    pub minimum_tags_per_topic: i64,
    #[serde(rename = "maximumTagsPerTopic", default = "default_maximum_tags")]
    pub maximum_tags_per_topic: i64,
    #[serde(rename = "postQueue", default)]
    pub post_queue: i64,
    /// Any other setting, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for MetaSettings {
    fn default() -> Self {
        Self {
            minimum_tags_per_topic: 0,
            maximum_tags_per_topic: default_maximum_tags(),
            post_queue: 0,
            extra: BTreeMap::new(),
        }
    }
}

fn default_maximum_tags() -> i64 {
    5
}

impl ForumConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, CategoryError> {
        toml::from_str(content).map_err(|err| CategoryError::Config {
            message: format!("failed to parse config: {err}"),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CategoryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| CategoryError::Config {
            message: format!("failed to read {}: {err}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Looks up a site setting by its stored key.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "minimumTagsPerTopic" => Some(Value::from(self.meta.minimum_tags_per_topic)),
            "maximumTagsPerTopic" => Some(Value::from(self.meta.maximum_tags_per_topic)),
            "postQueue" => Some(Value::from(self.meta.post_queue)),
            other => self.meta.extra.get(other).cloned(),
        }
    }

    /// Get the Redis URL, expanding `${VAR}` from the environment
    pub fn redis_url(&self) -> Result<String, CategoryError> {
        let url = self.redis.url.as_str();
        if url.starts_with("${") && url.ends_with('}') {
            let var_name = &url[2..url.len() - 1];
            std::env::var(var_name).map_err(|_| CategoryError::Config {
                message: format!("environment variable {var_name} not set"),
            })
        } else {
            Ok(url.to_string())
        }
    }
}
