use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::services::{ExternalApiProvider, GeoLookup, IpCheckService, RetentionTask};
use crate::storage::{IpRecordStore, SeaOrmStorage, StorageFactory};

/// 服务启动所需的共享组件
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub store: Arc<dyn IpRecordStore>,
    pub check_service: Arc<IpCheckService>,
    pub retention: Arc<RetentionTask>,
}

/// 连接存储（含迁移）并组装服务
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let store: Arc<dyn IpRecordStore> = storage.clone();

    let lookup: Arc<dyn GeoLookup> = Arc::new(ExternalApiProvider::new(&config.lookup));
    info!(
        "Lookup provider: {} ({}, timeout {}s)",
        lookup.name(),
        config.lookup.api_url,
        config.lookup.timeout_secs
    );

    let check_service = Arc::new(IpCheckService::new(store.clone(), lookup));
    let retention = Arc::new(RetentionTask::new(store.clone(), &config.retention));

    debug!("Pre-startup completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        storage,
        store,
        check_service,
        retention,
    })
}
