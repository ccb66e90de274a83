use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::entities::{player_profiles, prelude::*};
use game_types::{Pattern, PlayerProfile};

/// Single-profile install: every row operation targets this id.
const LOCAL_PROFILE_ID: &str = "local";

pub struct ProfileRepository {
    db: DatabaseConnection,
}

impl ProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_profile(model: player_profiles::Model) -> PlayerProfile {
        PlayerProfile {
            balance: model.balance.max(0) as u32,
            games_played: model.games_played.max(0) as u32,
            games_won: model.games_won.max(0) as u32,
            total_wagered: model.total_wagered.max(0) as u64,
            total_won: model.total_won.max(0) as u64,
            best_win: model.best_win.max(0) as u32,
            favorite_pattern: model
                .favorite_pattern
                .and_then(|s| s.parse::<Pattern>().ok()),
            created_at: model.created_at.to_rfc3339(),
        }
    }

    pub async fn load(&self) -> Result<Option<PlayerProfile>> {
        let model = PlayerProfiles::find_by_id(LOCAL_PROFILE_ID.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(Self::model_to_profile))
    }

    /// Upserts the whole profile. Last write wins; there is only one writer.
    pub async fn save(&self, profile: &PlayerProfile) -> Result<()> {
        let now = chrono::Utc::now().into();
        let created_at = chrono::DateTime::parse_from_rfc3339(&profile.created_at)
            .unwrap_or_else(|_| chrono::Utc::now().into());

        let model = player_profiles::ActiveModel {
            id: sea_orm::ActiveValue::Set(LOCAL_PROFILE_ID.to_string()),
            balance: sea_orm::ActiveValue::Set(profile.balance as i32),
            games_played: sea_orm::ActiveValue::Set(profile.games_played as i32),
            games_won: sea_orm::ActiveValue::Set(profile.games_won as i32),
            total_wagered: sea_orm::ActiveValue::Set(profile.total_wagered as i64),
            total_won: sea_orm::ActiveValue::Set(profile.total_won as i64),
            best_win: sea_orm::ActiveValue::Set(profile.best_win as i32),
            favorite_pattern: sea_orm::ActiveValue::Set(
                profile.favorite_pattern.map(|p| p.id().to_string()),
            ),
            created_at: sea_orm::ActiveValue::Set(created_at),
            updated_at: sea_orm::ActiveValue::Set(now),
        };

        let existing = PlayerProfiles::find_by_id(LOCAL_PROFILE_ID.to_string())
            .one(&self.db)
            .await?;
        if existing.is_some() {
            PlayerProfiles::update(model).exec(&self.db).await?;
        } else {
            PlayerProfiles::insert(model).exec(&self.db).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> ProfileRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        ProfileRepository::new(db)
    }

    fn sample_profile() -> PlayerProfile {
        PlayerProfile {
            balance: 1350,
            games_played: 12,
            games_won: 4,
            total_wagered: 900,
            total_won: 1250,
            best_win: 500,
            favorite_pattern: Some(Pattern::Line),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_load_before_save_is_none() {
        let repo = setup_test_db().await;
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let repo = setup_test_db().await;
        repo.save(&sample_profile()).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded.balance, 1350);
        assert_eq!(loaded.games_won, 4);
        assert_eq!(loaded.favorite_pattern, Some(Pattern::Line));
    }

    #[tokio::test]
    async fn test_save_twice_updates_in_place() {
        let repo = setup_test_db().await;
        repo.save(&sample_profile()).await.unwrap();

        let mut updated = sample_profile();
        updated.balance = 200;
        updated.favorite_pattern = Some(Pattern::Blackout);
        repo.save(&updated).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded.balance, 200);
        assert_eq!(loaded.favorite_pattern, Some(Pattern::Blackout));
    }
}
