//! Check orchestration tests
//!
//! IpCheckService against a temporary SQLite store and a stub lookup, plus
//! hand-written stores for the race and failure paths.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use common::{MockLookup, create_temp_storage, google_dns_details};
use ipchecker::errors::{IpCheckerError, Result};
use ipchecker::services::{CheckOutcome, InputError, IpCheckService, LookupError};
use ipchecker::storage::{InsertOutcome, IpRecord, IpRecordStore};

// =============================================================================
// Test stores
// =============================================================================

/// Simulates losing the insert race: the first lookup sees nothing, the
/// insert finds the row already there, the read-back sees the winner.
struct RacingStore {
    finds: AtomicUsize,
    winner_seen: chrono::DateTime<Utc>,
}

#[async_trait]
impl IpRecordStore for RacingStore {
    async fn find_by_address(&self, address: &str) -> Result<Option<IpRecord>> {
        if self.finds.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(None);
        }
        Ok(Some(IpRecord {
            id: 1,
            address: address.to_string(),
            first_seen: self.winner_seen,
        }))
    }

    async fn insert_if_absent(&self, _address: &str) -> Result<InsertOutcome> {
        Ok(InsertOutcome::AlreadyExists)
    }

    async fn count_all(&self) -> Result<u64> {
        Ok(1)
    }

    async fn delete_older_than(&self, _max_age: Duration) -> Result<u64> {
        Ok(0)
    }
}

/// Store whose every operation fails
struct BrokenStore;

#[async_trait]
impl IpRecordStore for BrokenStore {
    async fn find_by_address(&self, _address: &str) -> Result<Option<IpRecord>> {
        Err(IpCheckerError::store_unavailable("connection refused"))
    }

    async fn insert_if_absent(&self, _address: &str) -> Result<InsertOutcome> {
        Err(IpCheckerError::store_unavailable("connection refused"))
    }

    async fn count_all(&self) -> Result<u64> {
        Err(IpCheckerError::store_unavailable("connection refused"))
    }

    async fn delete_older_than(&self, _max_age: Duration) -> Result<u64> {
        Err(IpCheckerError::store_unavailable("connection refused"))
    }
}

/// Reads succeed (always empty) but writes fail
struct ReadOnlyStore;

#[async_trait]
impl IpRecordStore for ReadOnlyStore {
    async fn find_by_address(&self, _address: &str) -> Result<Option<IpRecord>> {
        Ok(None)
    }

    async fn insert_if_absent(&self, _address: &str) -> Result<InsertOutcome> {
        Err(IpCheckerError::store_unavailable("disk I/O error"))
    }

    async fn count_all(&self) -> Result<u64> {
        Ok(0)
    }

    async fn delete_older_than(&self, _max_age: Duration) -> Result<u64> {
        Ok(0)
    }
}

// =============================================================================
// 输入校验
// =============================================================================

#[tokio::test]
async fn test_empty_input_is_missing() {
    let lookup = MockLookup::succeeding(google_dns_details());
    let service = IpCheckService::new(Arc::new(BrokenStore), lookup.clone());

    for input in ["", "   ", "\t\n"] {
        let outcome = service.check_ip(input).await.unwrap();
        assert_eq!(outcome, CheckOutcome::Rejected(InputError::Missing));
    }
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_malformed_input_touches_nothing() {
    // BrokenStore 会让任何存储访问失败，所以 Ok 说明没有访问存储
    let lookup = MockLookup::succeeding(google_dns_details());
    let service = IpCheckService::new(Arc::new(BrokenStore), lookup.clone());

    for input in ["not-an-ip", "256.1.1.1", "1.2.3", "1.2.3.4.5", "::1", "a.b.c.d"] {
        let outcome = service.check_ip(input).await.unwrap();
        assert_eq!(
            outcome,
            CheckOutcome::Rejected(InputError::Malformed),
            "input {:?}",
            input
        );
    }
    assert_eq!(lookup.calls(), 0);
}

// =============================================================================
// 正常流程
// =============================================================================

#[tokio::test]
async fn test_new_address_is_looked_up_and_recorded() {
    let (storage, _dir) = create_temp_storage().await;
    let lookup = MockLookup::succeeding(google_dns_details());
    let service = IpCheckService::new(storage.clone(), lookup.clone());

    let outcome = service.check_ip("8.8.8.8").await.unwrap();
    let CheckOutcome::Checked(checked) = outcome else {
        panic!("expected Checked, got {:?}", outcome);
    };
    assert_eq!(checked.address, "8.8.8.8");
    assert_eq!(checked.details.country, "United States");
    assert_eq!(lookup.calls(), 1);

    assert!(storage.find_by_address("8.8.8.8").await.unwrap().is_some());
}

#[tokio::test]
async fn test_second_check_is_duplicate_without_lookup() {
    let (storage, _dir) = create_temp_storage().await;
    let lookup = MockLookup::succeeding(google_dns_details());
    let service = IpCheckService::new(storage.clone(), lookup.clone());

    service.check_ip("8.8.8.8").await.unwrap();
    let stored = storage.find_by_address("8.8.8.8").await.unwrap().unwrap();

    let outcome = service.check_ip(" 8.8.8.8 ").await.unwrap();
    let CheckOutcome::Duplicate(info) = outcome else {
        panic!("expected Duplicate, got {:?}", outcome);
    };
    assert!(!info.race);
    assert_eq!(info.first_checked, Some(stored.first_seen));
    assert_eq!(info.message(), "IP address already checked");
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_leading_zeros_map_to_same_record() {
    let (storage, _dir) = create_temp_storage().await;
    let lookup = MockLookup::succeeding(google_dns_details());
    let service = IpCheckService::new(storage.clone(), lookup.clone());

    let first = service.check_ip("010.0.0.1").await.unwrap();
    assert!(matches!(first, CheckOutcome::Checked(ref c) if c.address == "10.0.0.1"));

    let second = service.check_ip("10.0.0.1").await.unwrap();
    assert!(matches!(second, CheckOutcome::Duplicate(_)));
    assert_eq!(storage.count_all().await.unwrap(), 1);
}

// =============================================================================
// 失败与竞争
// =============================================================================

#[tokio::test]
async fn test_lookup_failure_writes_nothing() {
    let (storage, _dir) = create_temp_storage().await;
    let lookup = MockLookup::failing(LookupError::Unavailable("timed out".into()));
    let service = IpCheckService::new(storage.clone(), lookup.clone());

    let err = service.check_ip("8.8.8.8").await.unwrap_err();
    assert!(matches!(err, IpCheckerError::UpstreamUnavailable(_)));
    assert_eq!(storage.count_all().await.unwrap(), 0);

    // 失败不会被记住，下次还会重新查询
    let _ = service.check_ip("8.8.8.8").await;
    assert_eq!(lookup.calls(), 2);
}

#[tokio::test]
async fn test_upstream_rejection_message_passes_through() {
    let (storage, _dir) = create_temp_storage().await;
    let lookup = MockLookup::failing(LookupError::Rejected("reserved range".into()));
    let service = IpCheckService::new(storage.clone(), lookup);

    let err = service.check_ip("0.0.0.0").await.unwrap_err();
    assert!(matches!(err, IpCheckerError::UpstreamRejected(_)));
    assert_eq!(err.message(), "IP service error: reserved range");
    assert_eq!(storage.count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_lost_race_reports_duplicate_with_winner_time() {
    let winner_seen = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let store = Arc::new(RacingStore {
        finds: AtomicUsize::new(0),
        winner_seen,
    });
    let lookup = MockLookup::succeeding(google_dns_details());
    let service = IpCheckService::new(store, lookup.clone());

    let outcome = service.check_ip("8.8.8.8").await.unwrap();
    let CheckOutcome::Duplicate(info) = outcome else {
        panic!("expected Duplicate, got {:?}", outcome);
    };
    assert!(info.race);
    assert_eq!(info.first_checked, Some(winner_seen));
    assert_eq!(
        info.message(),
        "IP address was just checked by another request"
    );
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_store_read_failure_is_error() {
    let lookup = MockLookup::succeeding(google_dns_details());
    let service = IpCheckService::new(Arc::new(BrokenStore), lookup.clone());

    let err = service.check_ip("8.8.8.8").await.unwrap_err();
    assert!(matches!(err, IpCheckerError::StoreUnavailable(_)));
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_insert_failure_is_not_reported_as_success() {
    let lookup = MockLookup::succeeding(google_dns_details());
    let service = IpCheckService::new(Arc::new(ReadOnlyStore), lookup.clone());

    let err = service.check_ip("8.8.8.8").await.unwrap_err();
    assert!(matches!(err, IpCheckerError::StoreUnavailable(_)));
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checks_record_once() {
    let (storage, _dir) = create_temp_storage().await;
    let lookup = MockLookup::succeeding(google_dns_details());
    let service = Arc::new(IpCheckService::new(storage.clone(), lookup));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move { service.check_ip("1.1.1.1").await }));
    }

    let mut checked = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            CheckOutcome::Checked(_) => checked += 1,
            CheckOutcome::Duplicate(_) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    assert_eq!(checked, 1);
    assert_eq!(storage.count_all().await.unwrap(), 1);
}
