//! forumcat: category data access for a Redis-backed discussion forum.
//!
//! Category hashes are read in batches, passed through the
//! `filter:category.getFields` hook chain and normalized: tag limits fall back to
//! site settings, counters become integers, display text is HTML-escaped and a
//! few derived fields are filled in.

pub mod categories;
pub mod config;
pub mod errors;
pub mod escape;
pub mod hooks;
pub mod keys;
pub mod normalize;
pub mod store;
pub mod types;
pub mod values;

pub use categories::Categories;
pub use config::ForumConfig;
pub use errors::*;
pub use hooks::{CATEGORY_GET_FIELDS, CategoryHooks, FilterChain, FilterListener, GetFieldsPayload, listener_fn};
pub use store::{MemoryStore, ObjectStore, RedisStore, StoreCall};
pub use types::CategoryRecord;

// Re-export redis types so users don't need to depend on a specific redis version
pub use redis;
pub use redis::aio::ConnectionManager;

/// Delete all keys matching a pattern (for test cleanup).
///
/// This performs a SCAN + DEL operation to safely delete keys without blocking Redis.
pub async fn cleanup_pattern(conn: &mut ConnectionManager, pattern: &str) -> Result<u64, CategoryError> {
    const SCAN_COUNT: usize = 1000;
    let mut cursor: u64 = 0;
    let mut total_deleted: u64 = 0;

    loop {
        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_COUNT)
            .query_async(conn)
            .await?;

        if !keys.is_empty() {
            let deleted: u64 = redis::cmd("DEL").arg(&keys).query_async(conn).await?;
            total_deleted += deleted;
        }

        cursor = next_cursor;
        if cursor == 0 {
            break;
        }
    }

    Ok(total_deleted)
}
