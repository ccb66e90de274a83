use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::game::Pattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameOutcome {
    Win,
    Loss,
}

/// Immutable record of one completed game.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameRecord {
    pub id: Uuid,
    pub outcome: GameOutcome,
    pub pattern: Pattern,
    pub wager: u32,
    pub winnings: u32,
    pub draw_count: u32,
    pub session_id: u64,
    pub timestamp: String, // ISO 8601 string
}

/// Entry on the recent-winners board. `player` is a display name; synthetic
/// opponents appear here alongside the local player.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WinnerEntry {
    pub id: Uuid,
    pub player: String,
    pub number: Option<u16>,
    pub pattern: Pattern,
    pub winnings: u32,
    pub draws: u32,
    pub session_id: u64,
    pub timestamp: String, // ISO 8601 string
}

/// Aggregate win/loss figures over a set of game records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WinStats {
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub total_wagered: u64,
    pub total_won: u64,
    pub net_profit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HotNumber {
    pub number: u16,
    pub count: u32,
    pub frequency: f64,
}

/// Per-pattern win statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatternStats {
    pub pattern: Pattern,
    pub count: u32,
    pub total_winnings: u64,
    pub avg_draws: u32,
}
