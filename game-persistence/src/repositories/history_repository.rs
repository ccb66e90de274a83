use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};

use crate::entities::{game_history, prelude::*, winners};
use game_types::{GameOutcome, GameRecord, Pattern, WinnerEntry};

pub struct HistoryRepository {
    db: DatabaseConnection,
}

fn outcome_to_str(outcome: GameOutcome) -> &'static str {
    match outcome {
        GameOutcome::Win => "win",
        GameOutcome::Loss => "loss",
    }
}

fn outcome_from_str(s: &str) -> GameOutcome {
    if s == "win" {
        GameOutcome::Win
    } else {
        GameOutcome::Loss
    }
}

fn parse_timestamp(s: &str) -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::DateTime::parse_from_rfc3339(s).unwrap_or_else(|_| chrono::Utc::now().into())
}

impl HistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_record(model: game_history::Model) -> GameRecord {
        GameRecord {
            id: model.id,
            outcome: outcome_from_str(&model.outcome),
            pattern: model.pattern.parse::<Pattern>().unwrap_or(Pattern::Line),
            wager: model.wager.max(0) as u32,
            winnings: model.winnings.max(0) as u32,
            draw_count: model.draw_count.max(0) as u32,
            session_id: model.session_id.max(0) as u64,
            timestamp: model.timestamp.to_rfc3339(),
        }
    }

    fn model_to_winner(model: winners::Model) -> WinnerEntry {
        WinnerEntry {
            id: model.id,
            player: model.player,
            number: model.number.map(|n| n as u16),
            pattern: model.pattern.parse::<Pattern>().unwrap_or(Pattern::Line),
            winnings: model.winnings.max(0) as u32,
            draws: model.draws.max(0) as u32,
            session_id: model.session_id.max(0) as u64,
            timestamp: model.timestamp.to_rfc3339(),
        }
    }

    pub async fn record_game(&self, record: &GameRecord) -> Result<()> {
        let model = game_history::ActiveModel {
            id: sea_orm::ActiveValue::Set(record.id),
            outcome: sea_orm::ActiveValue::Set(outcome_to_str(record.outcome).to_string()),
            pattern: sea_orm::ActiveValue::Set(record.pattern.id().to_string()),
            wager: sea_orm::ActiveValue::Set(record.wager as i32),
            winnings: sea_orm::ActiveValue::Set(record.winnings as i32),
            draw_count: sea_orm::ActiveValue::Set(record.draw_count as i32),
            session_id: sea_orm::ActiveValue::Set(record.session_id as i64),
            timestamp: sea_orm::ActiveValue::Set(parse_timestamp(&record.timestamp)),
        };

        GameHistory::insert(model).exec(&self.db).await?;
        Ok(())
    }

    pub async fn record_winner(&self, entry: &WinnerEntry) -> Result<()> {
        let model = winners::ActiveModel {
            id: sea_orm::ActiveValue::Set(entry.id),
            player: sea_orm::ActiveValue::Set(entry.player.clone()),
            number: sea_orm::ActiveValue::Set(entry.number.map(|n| n as i32)),
            pattern: sea_orm::ActiveValue::Set(entry.pattern.id().to_string()),
            winnings: sea_orm::ActiveValue::Set(entry.winnings as i32),
            draws: sea_orm::ActiveValue::Set(entry.draws as i32),
            session_id: sea_orm::ActiveValue::Set(entry.session_id as i64),
            timestamp: sea_orm::ActiveValue::Set(parse_timestamp(&entry.timestamp)),
        };

        Winners::insert(model).exec(&self.db).await?;
        Ok(())
    }

    /// Newest first, for hydrating the in-memory ledger the caller reverses
    /// back to oldest-first.
    pub async fn recent_games(&self, limit: u64) -> Result<Vec<GameRecord>> {
        let models = GameHistory::find()
            .order_by_desc(game_history::Column::Timestamp)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Self::model_to_record).collect())
    }

    pub async fn recent_winners(&self, limit: u64) -> Result<Vec<WinnerEntry>> {
        let models = Winners::find()
            .order_by_desc(winners::Column::Timestamp)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Self::model_to_winner).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};
    use uuid::Uuid;

    async fn setup_test_db() -> HistoryRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        HistoryRepository::new(db)
    }

    fn record_at(outcome: GameOutcome, winnings: u32, timestamp: &str) -> GameRecord {
        GameRecord {
            id: Uuid::new_v4(),
            outcome,
            pattern: Pattern::Line,
            wager: 100,
            winnings,
            draw_count: 30,
            session_id: 7,
            timestamp: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_and_read_games_newest_first() {
        let repo = setup_test_db().await;
        repo.record_game(&record_at(
            GameOutcome::Loss,
            0,
            "2026-08-01T10:00:00+00:00",
        ))
        .await
        .unwrap();
        repo.record_game(&record_at(
            GameOutcome::Win,
            500,
            "2026-08-02T10:00:00+00:00",
        ))
        .await
        .unwrap();

        let games = repo.recent_games(10).await.unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].outcome, GameOutcome::Win);
        assert_eq!(games[0].winnings, 500);
        assert_eq!(games[1].outcome, GameOutcome::Loss);
    }

    #[tokio::test]
    async fn test_winner_round_trip_keeps_fields() {
        let repo = setup_test_db().await;
        let entry = WinnerEntry {
            id: Uuid::new_v4(),
            player: "DaubQueen".to_string(),
            number: Some(142),
            pattern: Pattern::FourCorners,
            winnings: 300,
            draws: 44,
            session_id: 3,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        repo.record_winner(&entry).await.unwrap();

        let winners = repo.recent_winners(5).await.unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].player, "DaubQueen");
        assert_eq!(winners[0].number, Some(142));
        assert_eq!(winners[0].pattern, Pattern::FourCorners);
    }

    #[tokio::test]
    async fn test_limit_applies() {
        let repo = setup_test_db().await;
        for day in 10..20 {
            let ts = format!("2026-08-{:02}T10:00:00+00:00", day);
            repo.record_game(&record_at(GameOutcome::Loss, 0, &ts))
                .await
                .unwrap();
        }

        let games = repo.recent_games(3).await.unwrap();
        assert_eq!(games.len(), 3);
        assert!(games[0].timestamp.starts_with("2026-08-19"));
    }
}
