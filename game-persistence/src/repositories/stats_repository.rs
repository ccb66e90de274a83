use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::entities::{draw_frequency, prelude::*};

/// Lifetime draw-frequency counts, one row per number that has ever been
/// drawn. The in-memory counters are authoritative; saves overwrite.
pub struct StatsRepository {
    db: DatabaseConnection,
}

impl StatsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn load_counts(&self) -> Result<Vec<(u16, u32)>> {
        let models = DrawFrequency::find().all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(|m| (m.number.max(0) as u16, m.count.max(0) as u32))
            .collect())
    }

    pub async fn save_counts(&self, counts: &[(u16, u32)]) -> Result<()> {
        for &(number, count) in counts {
            let model = draw_frequency::ActiveModel {
                number: sea_orm::ActiveValue::Set(number as i32),
                count: sea_orm::ActiveValue::Set(count as i32),
            };

            let existing = DrawFrequency::find_by_id(number as i32).one(&self.db).await?;
            if existing.is_some() {
                DrawFrequency::update(model).exec(&self.db).await?;
            } else {
                DrawFrequency::insert(model).exec(&self.db).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> StatsRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        StatsRepository::new(db)
    }

    #[tokio::test]
    async fn test_empty_load() {
        let repo = setup_test_db().await;
        assert!(repo.load_counts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_counts() {
        let repo = setup_test_db().await;
        repo.save_counts(&[(42, 3), (7, 1)]).await.unwrap();
        repo.save_counts(&[(42, 5)]).await.unwrap();

        let mut counts = repo.load_counts().await.unwrap();
        counts.sort_unstable();
        assert_eq!(counts, vec![(7, 1), (42, 5)]);
    }
}
