pub mod history_repository;
pub mod profile_repository;
pub mod stats_repository;
