pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_player_profile_table;
mod m20240101_000002_create_game_history_tables;
mod m20240101_000003_create_draw_frequency_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_player_profile_table::Migration),
            Box::new(m20240101_000002_create_game_history_tables::Migration),
            Box::new(m20240101_000003_create_draw_frequency_table::Migration),
        ]
    }
}
