//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ipchecker::config::DatabaseConfig;
use ipchecker::services::{GeoDetails, GeoLookup, LookupError};
use ipchecker::storage::SeaOrmStorage;
use tempfile::TempDir;

/// 创建临时 SQLite 数据库的存储实例
pub async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };

    let storage = SeaOrmStorage::new(&config, "sqlite")
        .await
        .expect("Failed to create storage");

    (Arc::new(storage), temp_dir)
}

/// ip-api.com 对 8.8.8.8 的典型返回
pub fn google_dns_details() -> GeoDetails {
    GeoDetails {
        country: "United States".to_string(),
        country_code: "US".to_string(),
        region: "VA".to_string(),
        region_name: "Virginia".to_string(),
        city: "Ashburn".to_string(),
        zip: "20149".to_string(),
        lat: 39.03,
        lon: -77.5,
        timezone: "America/New_York".to_string(),
        isp: "Google LLC".to_string(),
        org: "Google Public DNS".to_string(),
        as_name: "AS15169 Google LLC".to_string(),
    }
}

/// Lookup stub that returns a fixed result and counts calls
pub struct MockLookup {
    result: Result<GeoDetails, LookupError>,
    calls: AtomicUsize,
}

impl MockLookup {
    pub fn succeeding(details: GeoDetails) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(details),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(err: LookupError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(err),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLookup for MockLookup {
    async fn lookup(&self, _address: &str) -> Result<GeoDetails, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}
