//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for the drinks ledger:
//!
//! - `users`: authentication plus the prepaid balance and drink counter
//! - `drinks`: the catalog (price and stock)
//! - `transactions`: immutable purchase records
//! - `restockings`: immutable shelf refills
//! - `restocking_contributors`: per-user shares of a restocking

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Name,
    Password,
    Roles,
    Balance,
    Drinks,
}

#[derive(Iden)]
enum Drinks {
    Table,
    Id,
    Name,
    PriceMinor,
    Stock,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Drink,
    Description,
    AmountMinor,
    CreatedAt,
}

#[derive(Iden)]
enum Restockings {
    Table,
    Id,
    DrinkId,
    Quantity,
    TotalMinor,
    CreatedAt,
}

#[derive(Iden)]
enum RestockingContributors {
    Table,
    RestockingId,
    UserId,
    ShareMinor,
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
                        ColumnDef::new(Users::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Roles)
                            .string()
                            .not_null()
                            .default("staff"),
                    )
                    .col(
                        ColumnDef::new(Users::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::Drinks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Drinks
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Drinks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Drinks::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Drinks::Name).string().not_null())
                    .col(ColumnDef::new(Drinks::PriceMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Drinks::Stock)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-drinks-name-unique")
                    .table(Drinks::Table)
                    .col(Drinks::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).string().not_null())
                    .col(ColumnDef::new(Transactions::Drink).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Name),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-created_at")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Restockings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Restockings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restockings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restockings::DrinkId).string().not_null())
                    .col(ColumnDef::new(Restockings::Quantity).big_integer().not_null())
                    .col(
                        ColumnDef::new(Restockings::TotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Restockings::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-restockings-drink_id")
                            .from(Restockings::Table, Restockings::DrinkId)
                            .to(Drinks::Table, Drinks::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-restockings-created_at")
                    .table(Restockings::Table)
                    .col(Restockings::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Restocking contributors
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RestockingContributors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RestockingContributors::RestockingId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestockingContributors::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RestockingContributors::ShareMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(RestockingContributors::RestockingId)
                            .col(RestockingContributors::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-restocking_contributors-restocking_id")
                            .from(
                                RestockingContributors::Table,
                                RestockingContributors::RestockingId,
                            )
                            .to(Restockings::Table, Restockings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-restocking_contributors-user_id")
                            .from(
                                RestockingContributors::Table,
                                RestockingContributors::UserId,
                            )
                            .to(Users::Table, Users::Name),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-restocking_contributors-user_id")
                    .table(RestockingContributors::Table)
                    .col(RestockingContributors::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(
                Table::drop()
                    .table(RestockingContributors::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Restockings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
