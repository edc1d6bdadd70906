//! Per-day opening windows for a pharmacy.
//!
//! `day_of_week` is stored as the canonical full English day name and
//! `open_time`/`close_time` as zero-padded `"HH:MM"` strings, so lexicographic
//! comparison is chronological and the open-pharmacies query can run entirely
//! in SQL.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "opening_hours")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub pharmacy_id: i64,
    pub day_of_week: String,
    pub open_time: String,
    pub close_time: String,
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

/// Canonical day names, Monday-first. Ranges in import data ("Fri - Mon")
/// wrap around the end of this array.
pub const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Resolves a full day name (any casing) to its canonical form.
pub fn canonical_day(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    DAYS.iter().find(|day| day.eq_ignore_ascii_case(trimmed)).copied()
}

/// Resolves a short or full day name ("Mon", "thur", "Sunday") to its
/// canonical form.
pub(crate) fn day_from_abbrev(raw: &str) -> Option<&'static str> {
    let index = match raw.trim().to_ascii_lowercase().as_str() {
        "mon" | "monday" => 0,
        "tue" | "tues" | "tuesday" => 1,
        "wed" | "wednesday" => 2,
        "thu" | "thur" | "thurs" | "thursday" => 3,
        "fri" | "friday" => 4,
        "sat" | "saturday" => 5,
        "sun" | "sunday" => 6,
        _ => return None,
    };
    Some(DAYS[index])
}
