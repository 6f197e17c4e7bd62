/// Key-construction helpers for category hashes and the category id set.
///
/// An empty prefix yields the bare forum layout (`category:1`, `categories:cid`).
#[derive(Debug, Clone, Default)]
pub struct KeyContext {
    prefix: String,
}

/// Sorted set holding every registered category id, scored by display order.
pub const CATEGORY_ID_SET: &str = "categories:cid";

impl KeyContext {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn category(&self, cid: i64) -> String {
        self.namespaced(&format!("category:{cid}"))
    }

    pub fn categories(&self, cids: &[i64]) -> Vec<String> {
        cids.iter().map(|cid| self.category(*cid)).collect()
    }

    pub fn set(&self, set_name: &str) -> String {
        self.namespaced(set_name)
    }

    /// Glob matching every key under this context (for test cleanup).
    pub fn pattern(&self) -> String {
        self.namespaced("*")
    }

    fn namespaced(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.prefix, key)
        }
    }
}
