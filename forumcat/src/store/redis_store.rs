use std::collections::HashMap;

use redis::{
    aio::{ConnectionLike, ConnectionManager},
    cmd, pipe,
};
use serde_json::Value;

use crate::{errors::CategoryError, store::ObjectStore, types::CategoryRecord, values::to_loose_string};

/// [`ObjectStore`] over a Redis connection.
///
/// Each call works on its own clone of the connection, so a `ConnectionManager`
/// (multiplexed and cheap to clone) can serve concurrent callers.
#[derive(Clone)]
pub struct RedisStore<C = ConnectionManager>
where
    C: ConnectionLike + Clone + Send,
{
    connection: C,
}

impl<C> RedisStore<C>
where
    C: ConnectionLike + Clone + Send,
{
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> C {
        self.connection.clone()
    }
}

impl RedisStore<ConnectionManager> {
    /// Open a managed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self, CategoryError> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self::new(connection))
    }
}

impl<C> ObjectStore for RedisStore<C>
where
    C: ConnectionLike + Clone + Send,
{
    async fn get_objects(
        &self,
        keys: &[String],
        fields: &[String],
    ) -> Result<Vec<Option<CategoryRecord>>, CategoryError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.connection.clone();
        let mut batch = pipe();

        if fields.is_empty() {
            for key in keys {
                batch.cmd("HGETALL").arg(key);
            }
            let hashes: Vec<HashMap<String, String>> = batch.query_async(&mut conn).await?;
            log::debug!("read {} category hashes", hashes.len());
            return Ok(hashes.into_iter().map(whole_hash).collect());
        }

        // HMGET cannot tell a missing key from a hash lacking every requested field.
        for key in keys {
            batch.cmd("EXISTS").arg(key);
            batch.cmd("HMGET").arg(key).arg(fields);
        }
        let replies: Vec<redis::Value> = batch.query_async(&mut conn).await?;
        log::debug!("read {} category hashes ({} fields each)", replies.len() / 2, fields.len());
        replies
            .chunks(2)
            .map(|pair| match pair {
                [exists, values] => Ok(selected_fields(
                    fields,
                    redis::from_redis_value(exists)?,
                    redis::from_redis_value(values)?,
                )),
                _ => Err(CategoryError::Other {
                    message: "truncated EXISTS/HMGET pipeline reply".into(),
                }),
            })
            .collect()
    }

    async fn set_object_field(&self, key: &str, field: &str, value: &Value) -> Result<(), CategoryError> {
        let mut conn = self.connection.clone();
        let _: () = cmd("HSET")
            .arg(key)
            .arg(field)
            .arg(to_loose_string(value))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn incr_object_field_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, CategoryError> {
        let mut conn = self.connection.clone();
        let value: i64 = cmd("HINCRBY").arg(key).arg(field).arg(delta).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn get_sorted_set_range(&self, key: &str) -> Result<Vec<String>, CategoryError> {
        let mut conn = self.connection.clone();
        let members: Vec<String> = cmd("ZRANGE").arg(key).arg(0).arg(-1).query_async(&mut conn).await?;
        Ok(members)
    }
}

// HGETALL on a missing key returns an empty hash.
fn whole_hash(hash: HashMap<String, String>) -> Option<CategoryRecord> {
    if hash.is_empty() {
        return None;
    }
    Some(hash.into_iter().map(|(field, value)| (field, Value::String(value))).collect())
}

fn selected_fields(fields: &[String], exists: bool, values: Vec<Option<String>>) -> Option<CategoryRecord> {
    if !exists {
        return None;
    }
    Some(
        fields
            .iter()
            .cloned()
            .zip(values)
            .map(|(field, value)| (field, value.map_or(Value::Null, Value::String)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ForumConfig, normalize::normalize_categories};
    use serde_json::json;

    #[test]
    fn empty_hash_is_missing() {
        assert!(whole_hash(HashMap::new()).is_none());
        let hash = HashMap::from([("name".to_string(), "General".to_string())]);
        assert_eq!(whole_hash(hash).expect("present")["name"], json!("General"));
    }

    #[test]
    fn selected_fields_fill_gaps_with_null() {
        let fields = vec!["name".to_string(), "icon".to_string()];
        let record = selected_fields(&fields, true, vec![Some("News".to_string()), None]).expect("present");
        assert_eq!(record["name"], json!("News"));
        assert_eq!(record["icon"], Value::Null);
        assert!(selected_fields(&fields, false, vec![None, None]).is_none());
    }

    #[test]
    fn existing_hash_without_requested_fields_is_still_present() {
        let fields = vec!["minTags".to_string()];
        let record = selected_fields(&fields, true, vec![None]).expect("hash exists");
        assert_eq!(record["minTags"], Value::Null);

        let config = ForumConfig::default();
        let mut normalized = vec![Some(record)];
        normalize_categories(&mut normalized, &fields, &config);
        assert_eq!(normalized[0].as_ref().expect("present")["minTags"], json!(0));
    }
}
