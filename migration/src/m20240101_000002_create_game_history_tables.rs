use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameHistory::Outcome).string().not_null())
                    .col(ColumnDef::new(GameHistory::Pattern).string().not_null())
                    .col(ColumnDef::new(GameHistory::Wager).integer().not_null())
                    .col(ColumnDef::new(GameHistory::Winnings).integer().not_null())
                    .col(ColumnDef::new(GameHistory::DrawCount).integer().not_null())
                    .col(
                        ColumnDef::new(GameHistory::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameHistory::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Newest-first reads drive every history query
        manager
            .create_index(
                Index::create()
                    .name("idx_game_history_timestamp")
                    .table(GameHistory::Table)
                    .col(GameHistory::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Winners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Winners::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Winners::Player).string().not_null())
                    .col(ColumnDef::new(Winners::Number).integer())
                    .col(ColumnDef::new(Winners::Pattern).string().not_null())
                    .col(ColumnDef::new(Winners::Winnings).integer().not_null())
                    .col(ColumnDef::new(Winners::Draws).integer().not_null())
                    .col(ColumnDef::new(Winners::SessionId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Winners::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_winners_timestamp")
                    .table(Winners::Table)
                    .col(Winners::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Winners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameHistory {
    Table,
    Id,
    Outcome,
    Pattern,
    Wager,
    Winnings,
    DrawCount,
    SessionId,
    Timestamp,
}

#[derive(DeriveIden)]
enum Winners {
    Table,
    Id,
    Player,
    Number,
    Pattern,
    Winnings,
    Draws,
    SessionId,
    Timestamp,
}
