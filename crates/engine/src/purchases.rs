//! Immutable per-unit purchase records.
//!
//! A quantity-N purchase yields N rows, each carrying the unit price at time
//! of sale plus the pharmacy and mask *names* (not ids), so the audit trail
//! stays readable even if the catalog changes later. Rows are created by
//! exactly one engine invocation per purchased unit and never updated or
//! deleted.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub pharmacy_name: String,
    pub mask_name: String,
    pub amount_cents: i64,
    pub transaction_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
