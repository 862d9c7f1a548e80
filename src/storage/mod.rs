use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{InsertOutcome, IpRecord};

/// Persisted set of checked addresses.
///
/// The uniqueness of `address` is enforced by the store itself, so
/// `insert_if_absent` stays correct under concurrent callers without any
/// application-level locking.
#[async_trait]
pub trait IpRecordStore: Send + Sync {
    /// Exact-match lookup on the canonical address
    async fn find_by_address(&self, address: &str) -> Result<Option<IpRecord>>;

    /// Atomically insert a new record. A concurrent or earlier insert of the
    /// same address yields `AlreadyExists`, never an error.
    async fn insert_if_absent(&self, address: &str) -> Result<InsertOutcome>;

    async fn count_all(&self) -> Result<u64>;

    /// 删除 first_seen 早于 `now - max_age` 的记录，返回删除数量
    async fn delete_older_than(&self, max_age: Duration) -> Result<u64>;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;

        let storage = SeaOrmStorage::new(config, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
