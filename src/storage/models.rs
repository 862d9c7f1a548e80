use chrono::{DateTime, Utc};

/// A previously checked address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpRecord {
    pub id: i64,
    /// Canonical dotted-quad
    pub address: String,
    /// 首次检查成功的时间（秒级精度，写入后不再变化）
    pub first_seen: DateTime<Utc>,
}

/// Result of [`IpRecordStore::insert_if_absent`](super::IpRecordStore::insert_if_absent)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(IpRecord),
    /// Another caller already holds this address
    AlreadyExists,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

impl From<migration::entities::ip_log::Model> for IpRecord {
    fn from(model: migration::entities::ip_log::Model) -> Self {
        Self {
            id: model.id,
            address: model.ip,
            first_seen: model.created_at,
        }
    }
}
