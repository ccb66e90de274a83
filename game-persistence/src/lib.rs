pub mod connection;
pub mod entities;
pub mod repositories;

use sea_orm::DatabaseConnection;

use repositories::history_repository::HistoryRepository;
use repositories::profile_repository::ProfileRepository;
use repositories::stats_repository::StatsRepository;

/// One handle bundling every repository over a shared connection. The
/// server's autosave task owns one of these; gameplay never waits on it.
pub struct Persistence {
    pub profiles: ProfileRepository,
    pub history: HistoryRepository,
    pub stats: StatsRepository,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            profiles: ProfileRepository::new(db.clone()),
            history: HistoryRepository::new(db.clone()),
            stats: StatsRepository::new(db),
        }
    }
}
