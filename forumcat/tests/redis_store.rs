//! Round trips against a live Redis at 127.0.0.1.
//!
//! Run with `cargo test -- --ignored` once Redis is up. Every test works under
//! its own key prefix and removes it afterwards.

use std::sync::atomic::{AtomicUsize, Ordering};

use forumcat::{
    Categories, CategoryHooks, ForumConfig, ObjectStore, RedisStore, cleanup_pattern, keys::KeyContext,
    redis::{AsyncCommands, aio::ConnectionManager},
};
use serde_json::{Value, json};

static TEST_NAMESPACE_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TestNamespace {
    prefix: String,
}

impl TestNamespace {
    fn unique() -> Self {
        let idx = TEST_NAMESPACE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let salt = uuid::Uuid::new_v4().simple().to_string();
        Self {
            prefix: format!("forumcat_test_{idx}_{}", &salt[..8]),
        }
    }

    fn keys(&self) -> KeyContext {
        KeyContext::new(self.prefix.clone())
    }

    fn categories(&self, conn: &ConnectionManager) -> Categories<RedisStore> {
        let mut config = ForumConfig::default();
        config.redis.prefix = self.prefix.clone();
        Categories::new(RedisStore::new(conn.clone()), CategoryHooks::default(), config)
    }

    async fn cleanup(&self, conn: &mut ConnectionManager) {
        cleanup_pattern(conn, &self.keys().pattern()).await.expect("cleanup");
    }
}

async fn redis_conn() -> ConnectionManager {
    let client = forumcat::redis::Client::open("redis://127.0.0.1/").expect("redis client");
    client.get_connection_manager().await.expect("connection manager")
}

async fn seed_category(conn: &mut ConnectionManager, keys: &KeyContext, cid: i64, fields: &[(&str, &str)]) {
    let _: () = conn.hset_multiple(keys.category(cid), fields).await.expect("seed hash");
    let _: () = conn.zadd(keys.set("categories:cid"), cid, cid).await.expect("seed id set");
}

#[tokio::test]
#[ignore = "requires a running Redis at 127.0.0.1"]
async fn reads_and_normalizes_hashes() {
    let mut conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let keys = ns.keys();
    seed_category(
        &mut conn,
        &keys,
        1,
        &[("cid", "1"), ("name", "A & B"), ("post_count", "5"), ("icon", "")],
    )
    .await;
    let categories = ns.categories(&conn);

    let result = categories.get_categories_data(&[1, 2]).await.expect("read");

    assert_eq!(result.len(), 2);
    let first = result[0].as_ref().expect("cid 1");
    assert_eq!(first["cid"], json!(1));
    assert_eq!(first["name"], json!("A &amp; B"));
    assert_eq!(first["totalPostCount"], json!(5));
    assert_eq!(first["icon"], json!("hidden"));
    assert_eq!(first["maxTags"], json!(5));
    assert!(result[1].is_none());

    ns.cleanup(&mut conn).await;
}

#[tokio::test]
#[ignore = "requires a running Redis at 127.0.0.1"]
async fn field_reads_use_hmget() {
    let mut conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let keys = ns.keys();
    seed_category(&mut conn, &keys, 3, &[("name", "Q&A"), ("order", "4")]).await;
    let store = RedisStore::new(conn.clone());

    let raw = store
        .get_objects(&[keys.category(3), keys.category(4)], &["name".to_string(), "color".to_string()])
        .await
        .expect("read");

    let first = raw[0].as_ref().expect("cid 3");
    assert_eq!(first["name"], json!("Q&A"));
    assert_eq!(first["color"], Value::Null);
    assert!(!first.contains_key("order"));
    assert!(raw[1].is_none());

    ns.cleanup(&mut conn).await;
}

#[tokio::test]
#[ignore = "requires a running Redis at 127.0.0.1"]
async fn unset_fields_of_an_existing_category_take_defaults() {
    let mut conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let keys = ns.keys();
    seed_category(&mut conn, &keys, 5, &[("name", "General")]).await;
    let categories = ns.categories(&conn);
    let config = ForumConfig::default();

    let min_tags = categories.get_category_field(5, "minTags").await.expect("read minTags");
    let max_tags = categories.get_category_fields(5, &["maxTags"]).await.expect("read maxTags");
    let icon = categories.get_category_field(5, "icon").await.expect("read icon");

    assert_eq!(min_tags, Some(json!(config.meta.minimum_tags_per_topic)));
    assert_eq!(max_tags.expect("cid 5")["maxTags"], json!(config.meta.maximum_tags_per_topic));
    assert_eq!(icon, Some(json!("hidden")));
    assert_eq!(categories.get_category_field(6, "minTags").await.expect("read missing"), None);

    ns.cleanup(&mut conn).await;
}

#[tokio::test]
#[ignore = "requires a running Redis at 127.0.0.1"]
async fn writes_and_increments_go_straight_to_the_hash() {
    let mut conn = redis_conn().await;
    let ns = TestNamespace::unique();
    let keys = ns.keys();
    seed_category(&mut conn, &keys, 7, &[("post_count", "10")]).await;
    let categories = ns.categories(&conn);

    categories.set_category_field(7, "name", "<raw>").await.expect("set");
    let updated = categories.increment_category_field_by(7, "post_count", -3).await.expect("incr");

    assert_eq!(updated, 7);
    let stored_name: String = conn.hget(keys.category(7), "name").await.expect("hget");
    assert_eq!(stored_name, "<raw>");
    let all = categories.get_all_category_fields(&["name"]).await.expect("read all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].as_ref().expect("cid 7")["name"], json!("&lt;raw&gt;"));

    ns.cleanup(&mut conn).await;
}
