//! Entity for the dedup log of checked addresses

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "ip_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Canonical dotted-quad, unique
    #[sea_orm(unique)]
    pub ip: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
