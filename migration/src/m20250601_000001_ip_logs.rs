//! ip_logs 表迁移
//!
//! 每个地址只保留一行，唯一性由 `idx_ip_logs_ip` 唯一索引在数据库层保证，
//! 并发插入同一地址时只有一个能成功。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 ip_logs 表
        manager
            .create_table(
                Table::create()
                    .table(IpLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IpLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IpLogs::Ip).string_len(45).not_null())
                    .col(
                        ColumnDef::new(IpLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引：ip（ON CONFLICT 的目标）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ip_logs_ip")
                    .table(IpLogs::Table)
                    .col(IpLogs::Ip)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建时间索引（用于过期清理）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ip_logs_created_at")
                    .table(IpLogs::Table)
                    .col(IpLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ip_logs_created_at")
                    .table(IpLogs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_ip_logs_ip")
                    .table(IpLogs::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(IpLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IpLogs {
    Table,
    Id,
    Ip,
    CreatedAt,
}
