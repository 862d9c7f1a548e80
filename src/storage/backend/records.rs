//! IpRecordStore implementation for SeaOrmStorage

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, Insert, PaginatorTrait,
    QueryFilter, SqlErr,
    sea_query::OnConflict,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use crate::errors::{IpCheckerError, Result};
use crate::storage::{InsertOutcome, IpRecord, IpRecordStore};

use migration::entities::ip_log;

/// ON CONFLICT DO NOTHING 命中冲突时各后端的表现不同：
/// PostgreSQL/SQLite 返回 RecordNotInserted，MySQL 可能只报告 0 行，
/// 未走 ON CONFLICT 的路径则是唯一约束冲突。
fn is_conflict(err: &DbErr) -> bool {
    if matches!(err, DbErr::RecordNotInserted) {
        return true;
    }
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    let err_str = err.to_string().to_lowercase();
    err_str.contains("no rows") || err_str.contains("record not inserted")
}

/// 构造“不存在才插入”的语句
///
/// PostgreSQL/SQLite 使用 ON CONFLICT DO NOTHING。
/// MySQL 没有对应语法，ON DUPLICATE KEY UPDATE 在 FOUND_ROWS 下
/// 冲突也报告 1 行，所以直接插入，由唯一索引报 1062。
fn build_insert(
    backend: DbBackend,
    address: &str,
    now: DateTime<Utc>,
) -> Insert<ip_log::ActiveModel> {
    let insert = ip_log::Entity::insert(ip_log::ActiveModel {
        id: NotSet,
        ip: Set(address.to_string()),
        created_at: Set(now),
    });

    match backend {
        DbBackend::MySql => insert,
        _ => insert.on_conflict(
            OnConflict::column(ip_log::Column::Ip)
                .do_nothing()
                .to_owned(),
        ),
    }
}

#[async_trait]
impl IpRecordStore for SeaOrmStorage {
    async fn find_by_address(&self, address: &str) -> Result<Option<IpRecord>> {
        let model = ip_log::Entity::find()
            .filter(ip_log::Column::Ip.eq(address))
            .one(&self.db)
            .await
            .map_err(|e| {
                IpCheckerError::store_unavailable(format!("Failed to query {}: {}", address, e))
            })?;

        Ok(model.map(IpRecord::from))
    }

    async fn insert_if_absent(&self, address: &str) -> Result<InsertOutcome> {
        // TIMESTAMP 列在 MySQL 上只有秒级精度，统一截断避免读回不一致
        let now = Utc::now().trunc_subsecs(0);

        // 单条语句，由唯一索引保证原子性
        let result = build_insert(self.db.get_database_backend(), address, now)
            .exec(&self.db)
            .await;

        match result {
            Ok(res) => {
                info!("Recorded new address {} (id {})", address, res.last_insert_id);
                Ok(InsertOutcome::Inserted(IpRecord {
                    id: res.last_insert_id,
                    address: address.to_string(),
                    first_seen: now,
                }))
            }
            Err(e) if is_conflict(&e) => {
                debug!("Address {} already recorded: {}", address, e);
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(e) => Err(IpCheckerError::store_unavailable(format!(
                "Failed to record {}: {}",
                address, e
            ))),
        }
    }

    async fn count_all(&self) -> Result<u64> {
        ip_log::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| IpCheckerError::store_unavailable(format!("Failed to count records: {}", e)))
    }

    async fn delete_older_than(&self, max_age: Duration) -> Result<u64> {
        let cutoff = Utc::now().checked_sub_signed(max_age).ok_or_else(|| {
            IpCheckerError::config(format!(
                "Retention window of {} days is out of range",
                max_age.num_days()
            ))
        })?;

        let result = ip_log::Entity::delete_many()
            .filter(ip_log::Column::CreatedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| {
                IpCheckerError::store_unavailable(format!("Failed to delete old records: {}", e))
            })?;

        debug!(
            "Deleted {} records first seen before {}",
            result.rows_affected, cutoff
        );
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    fn insert_sql(backend: DbBackend) -> String {
        let now = Utc::now().trunc_subsecs(0);
        build_insert(backend, "192.0.2.1", now)
            .build(backend)
            .to_string()
    }

    #[test]
    fn test_mysql_insert_is_plain() {
        let sql = insert_sql(DbBackend::MySql);
        assert!(sql.starts_with("INSERT INTO `ip_logs`"), "{}", sql);
        assert!(!sql.contains("ON DUPLICATE KEY"), "{}", sql);
        assert!(!sql.contains("IGNORE"), "{}", sql);
    }

    #[test]
    fn test_postgres_and_sqlite_insert_do_nothing_on_conflict() {
        let sql = insert_sql(DbBackend::Postgres);
        assert!(sql.contains(r#"ON CONFLICT ("ip") DO NOTHING"#), "{}", sql);

        let sql = insert_sql(DbBackend::Sqlite);
        assert!(sql.contains(r#"ON CONFLICT ("ip") DO NOTHING"#), "{}", sql);
    }

    #[test]
    fn test_record_not_inserted_is_conflict() {
        assert!(is_conflict(&DbErr::RecordNotInserted));
    }

    #[test]
    fn test_other_errors_are_not_conflicts() {
        assert!(!is_conflict(&DbErr::Custom("connection reset".into())));
        assert!(!is_conflict(&DbErr::RecordNotFound("x".into())));
    }
}
