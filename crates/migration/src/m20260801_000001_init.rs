//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Mascherina:
//!
//! - `users`: buyer accounts with a cash balance
//! - `pharmacies`: seller accounts with a cash balance and a mask catalog
//! - `masks`: priced catalog entries, each owned by one pharmacy
//! - `opening_hours`: per-day opening windows for a pharmacy
//! - `purchases`: immutable per-unit purchase records

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    CashBalanceCents,
}

#[derive(Iden)]
enum Pharmacies {
    Table,
    Id,
    Name,
    CashBalanceCents,
}

#[derive(Iden)]
enum Masks {
    Table,
    Id,
    Name,
    PriceCents,
    PharmacyId,
}

#[derive(Iden)]
enum OpeningHours {
    Table,
    Id,
    PharmacyId,
    DayOfWeek,
    OpenTime,
    CloseTime,
}

#[derive(Iden)]
enum Purchases {
    Table,
    Id,
    UserId,
    PharmacyName,
    MaskName,
    AmountCents,
    TransactionDate,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::CashBalanceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-name")
                    .table(Users::Table)
                    .col(Users::Name)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Pharmacies
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Pharmacies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pharmacies::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pharmacies::Name).string().not_null())
                    .col(
                        ColumnDef::new(Pharmacies::CashBalanceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-pharmacies-name")
                    .table(Pharmacies::Table)
                    .col(Pharmacies::Name)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Masks
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Masks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Masks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Masks::Name).string().not_null())
                    .col(ColumnDef::new(Masks::PriceCents).big_integer().not_null())
                    .col(ColumnDef::new(Masks::PharmacyId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-masks-pharmacy_id")
                            .from(Masks::Table, Masks::PharmacyId)
                            .to(Pharmacies::Table, Pharmacies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-masks-pharmacy_id")
                    .table(Masks::Table)
                    .col(Masks::PharmacyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-masks-name")
                    .table(Masks::Table)
                    .col(Masks::Name)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Opening hours
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(OpeningHours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OpeningHours::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OpeningHours::PharmacyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OpeningHours::DayOfWeek).string().not_null())
                    .col(ColumnDef::new(OpeningHours::OpenTime).string().not_null())
                    .col(ColumnDef::new(OpeningHours::CloseTime).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-opening_hours-pharmacy_id")
                            .from(OpeningHours::Table, OpeningHours::PharmacyId)
                            .to(Pharmacies::Table, Pharmacies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-opening_hours-pharmacy_id")
                    .table(OpeningHours::Table)
                    .col(OpeningHours::PharmacyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-opening_hours-day_of_week")
                    .table(OpeningHours::Table)
                    .col(OpeningHours::DayOfWeek)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Purchases (insert-only audit records, one row per unit)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Purchases::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Purchases::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Purchases::PharmacyName).string().not_null())
                    .col(ColumnDef::new(Purchases::MaskName).string().not_null())
                    .col(
                        ColumnDef::new(Purchases::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Purchases::TransactionDate)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchases-user_id")
                            .from(Purchases::Table, Purchases::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchases-user_id")
                    .table(Purchases::Table)
                    .col(Purchases::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchases-transaction_date")
                    .table(Purchases::Table)
                    .col(Purchases::TransactionDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Purchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OpeningHours::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Masks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pharmacies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
