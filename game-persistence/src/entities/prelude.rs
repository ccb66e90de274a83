pub use super::draw_frequency::Entity as DrawFrequency;
pub use super::game_history::Entity as GameHistory;
pub use super::player_profiles::Entity as PlayerProfiles;
pub use super::winners::Entity as Winners;
