//! IP check orchestration
//!
//! validate → existence check → lookup → atomic insert → outcome.
//! Shared by the HTTP handler; holds no per-request state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::errors::Result;
use crate::services::geoip::{GeoDetails, GeoLookup};
use crate::storage::{InsertOutcome, IpRecordStore};
use crate::utils::ip_validator;

// ============ Outcomes ============

/// 输入被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    Missing,
    Malformed,
}

impl InputError {
    pub fn message(&self) -> &'static str {
        match self {
            InputError::Missing => "IP address is required",
            InputError::Malformed => "Invalid IP address format",
        }
    }
}

/// 地址已经检查过
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateInfo {
    pub address: String,
    /// None when the winning record could not be read back after a lost race
    pub first_checked: Option<DateTime<Utc>>,
    /// 并发插入时被其他请求抢先
    pub race: bool,
}

impl DuplicateInfo {
    pub fn message(&self) -> &'static str {
        if self.race {
            "IP address was just checked by another request"
        } else {
            "IP address already checked"
        }
    }
}

/// 首次检查成功
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedIp {
    pub address: String,
    pub details: GeoDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Rejected(InputError),
    Duplicate(DuplicateInfo),
    Checked(CheckedIp),
}

// ============ Service ============

pub struct IpCheckService {
    store: Arc<dyn IpRecordStore>,
    lookup: Arc<dyn GeoLookup>,
}

impl IpCheckService {
    pub fn new(store: Arc<dyn IpRecordStore>, lookup: Arc<dyn GeoLookup>) -> Self {
        Self { store, lookup }
    }

    /// Check one raw address.
    ///
    /// Invalid input never touches the store or the network. A known address
    /// never triggers a lookup. A failed lookup writes nothing.
    pub async fn check_ip(&self, raw_input: &str) -> Result<CheckOutcome> {
        let trimmed = raw_input.trim();
        if trimmed.is_empty() {
            info!("Rejected check: empty address");
            return Ok(CheckOutcome::Rejected(InputError::Missing));
        }

        let Some(address) = ip_validator::canonicalize(trimmed) else {
            info!("Rejected check: malformed address {:?}", trimmed);
            return Ok(CheckOutcome::Rejected(InputError::Malformed));
        };

        if let Some(record) = self.store.find_by_address(&address).await? {
            info!(
                "Duplicate check for {} (first seen {})",
                address, record.first_seen
            );
            return Ok(CheckOutcome::Duplicate(DuplicateInfo {
                address,
                first_checked: Some(record.first_seen),
                race: false,
            }));
        }

        let details = match self.lookup.lookup(&address).await {
            Ok(details) => details,
            Err(e) => {
                error!(
                    "Lookup via {} failed for {}: {:?}",
                    self.lookup.name(),
                    address,
                    e
                );
                return Err(e.into());
            }
        };

        match self.store.insert_if_absent(&address).await? {
            InsertOutcome::Inserted(record) => {
                info!("Checked new address {} (id {})", address, record.id);
                Ok(CheckOutcome::Checked(CheckedIp { address, details }))
            }
            InsertOutcome::AlreadyExists => {
                // 另一个请求在 lookup 期间抢先写入
                let first_checked = match self.store.find_by_address(&address).await {
                    Ok(record) => record.map(|r| r.first_seen),
                    Err(e) => {
                        warn!("Could not read back winning record for {}: {}", address, e);
                        None
                    }
                };
                info!("Lost insert race for {}, reporting duplicate", address);
                Ok(CheckOutcome::Duplicate(DuplicateInfo {
                    address,
                    first_checked,
                    race: true,
                }))
            }
        }
    }
}
