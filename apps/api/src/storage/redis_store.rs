use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use crate::storage::{KeyValueStore, StorageError};

/// Upper bound on any single Redis round trip, connect included.
const REDIS_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis-backed storage over a multiplexed tokio connection.
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        let conn = with_timeout("connect", client.get_multiplexed_tokio_connection()).await?;
        info!("Redis storage connection established");
        Ok(Self { conn })
    }
}

async fn with_timeout<T>(
    operation: &str,
    fut: impl std::future::Future<Output = redis::RedisResult<T>>,
) -> Result<T, StorageError> {
    match tokio::time::timeout(REDIS_TIMEOUT, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(StorageError::Unavailable(format!(
            "Redis {operation} timed out after {}s",
            REDIS_TIMEOUT.as_secs()
        ))),
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        with_timeout("GET", self.conn.get::<_, Option<String>>(key)).await
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        with_timeout("SET", self.conn.set::<_, _, ()>(key, value)).await
    }
}
