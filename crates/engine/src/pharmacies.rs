//! Seller accounts.
//!
//! A pharmacy holds a cash balance in integer cents, a mask catalog and a set
//! of opening windows. The balance is credited only by the purchase engine,
//! while holding an exclusive row lock.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "pharmacies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub cash_balance_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::masks::Entity")]
    Masks,
    #[sea_orm(has_many = "super::opening_hours::Entity")]
    OpeningHours,
}

impl Related<super::masks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Masks.def()
    }
}

impl Related<super::opening_hours::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpeningHours.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
