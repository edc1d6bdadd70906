//! Priced catalog entries, each owned by exactly one pharmacy.
//!
//! Masks are read-only to the purchase engine: the price is captured into the
//! per-unit purchase records at transaction time and never re-read.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "masks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub pharmacy_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pharmacies::Entity",
        from = "Column::PharmacyId",
        to = "super::pharmacies::Column::Id"
    )]
    Pharmacies,
}

impl Related<super::pharmacies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pharmacies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
