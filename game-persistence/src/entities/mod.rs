pub mod draw_frequency;
pub mod game_history;
pub mod player_profiles;
pub mod prelude;
pub mod winners;
