//! 过期记录清理任务
//!
//! 删除 first_seen 超过保留期的记录，防止数据库无限增长。
//! 过期后同一地址会被当作新地址重新查询。

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tracing::{error, info};

use crate::config::RetentionConfig;
use crate::errors::{IpCheckerError, Result};
use crate::storage::IpRecordStore;

/// 后台任务首次运行前的延迟
const INITIAL_DELAY_SECS: u64 = 300;

/// 清理报告
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: u64,
    pub remaining: u64,
}

pub struct RetentionTask {
    store: Arc<dyn IpRecordStore>,
    max_age_days: u64,
    interval_hours: u64,
}

impl RetentionTask {
    pub fn new(store: Arc<dyn IpRecordStore>, config: &RetentionConfig) -> Self {
        Self {
            store,
            max_age_days: config.max_age_days,
            interval_hours: config.interval_hours,
        }
    }

    pub fn max_age_days(&self) -> u64 {
        self.max_age_days
    }

    /// 运行一次清理
    pub async fn run_cleanup(&self) -> Result<CleanupReport> {
        let max_age = i64::try_from(self.max_age_days)
            .ok()
            .and_then(Duration::try_days)
            .ok_or_else(|| {
                IpCheckerError::config(format!(
                    "retention.max_age_days {} is out of range",
                    self.max_age_days
                ))
            })?;

        let deleted = self.store.delete_older_than(max_age).await?;
        let remaining = self.store.count_all().await?;

        info!(
            "Retention cleanup completed: deleted {} records older than {} days, {} remaining",
            deleted, self.max_age_days, remaining
        );

        Ok(CleanupReport { deleted, remaining })
    }

    /// 启动后台清理任务
    ///
    /// 首次运行延迟 5 分钟，之后每隔 `interval_hours` 运行一次；
    /// 单次失败只记录日志，不会终止任务。
    pub fn spawn_background_task(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let interval =
            StdDuration::from_secs(self.interval_hours.max(1).saturating_mul(60 * 60));

        info!(
            "Retention background task started (interval: {} hours, max age: {} days)",
            self.interval_hours, self.max_age_days
        );

        tokio::spawn(async move {
            tokio::time::sleep(StdDuration::from_secs(INITIAL_DELAY_SECS)).await;

            loop {
                if let Err(e) = self.run_cleanup().await {
                    error!("Retention cleanup task failed: {}", e);
                }

                tokio::time::sleep(interval).await;
            }
        })
    }
}
