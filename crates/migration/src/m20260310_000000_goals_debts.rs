//! Savings goals, their contributions, and debts.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Goals {
    Table,
    Id,
    UserId,
    Name,
    TargetAmountMinor,
    CurrentAmountMinor,
    Deadline,
    Icon,
    Color,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum GoalContributions {
    Table,
    Id,
    GoalId,
    UserId,
    AmountMinor,
    Note,
    Date,
    CreatedAt,
}

#[derive(Iden)]
enum Debts {
    Table,
    Id,
    UserId,
    Kind,
    PersonName,
    AmountMinor,
    Description,
    DueDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Goals::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Goals::UserId).string().not_null())
                    .col(ColumnDef::new(Goals::Name).string().not_null())
                    .col(
                        ColumnDef::new(Goals::TargetAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Goals::CurrentAmountMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Goals::Deadline).date())
                    .col(ColumnDef::new(Goals::Icon).string())
                    .col(ColumnDef::new(Goals::Color).string())
                    .col(
                        ColumnDef::new(Goals::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Goals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goals-user_id")
                            .from(Goals::Table, Goals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoalContributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GoalContributions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GoalContributions::GoalId).string().not_null())
                    .col(ColumnDef::new(GoalContributions::UserId).string().not_null())
                    .col(
                        ColumnDef::new(GoalContributions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GoalContributions::Note).string())
                    .col(ColumnDef::new(GoalContributions::Date).date().not_null())
                    .col(
                        ColumnDef::new(GoalContributions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goal_contributions-goal_id")
                            .from(GoalContributions::Table, GoalContributions::GoalId)
                            .to(Goals::Table, Goals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-goal_contributions-goal_id")
                    .table(GoalContributions::Table)
                    .col(GoalContributions::GoalId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Debts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Debts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Debts::UserId).string().not_null())
                    .col(ColumnDef::new(Debts::Kind).string().not_null())
                    .col(ColumnDef::new(Debts::PersonName).string().not_null())
                    .col(ColumnDef::new(Debts::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Debts::Description).string())
                    .col(ColumnDef::new(Debts::DueDate).date())
                    .col(
                        ColumnDef::new(Debts::Status)
                            .string()
                            .not_null()
                            .default("unpaid"),
                    )
                    .col(
                        ColumnDef::new(Debts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Debts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debts-user_id")
                            .from(Debts::Table, Debts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-debts-user_id-status")
                    .table(Debts::Table)
                    .col(Debts::UserId)
                    .col(Debts::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Debts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GoalContributions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        Ok(())
    }
}
