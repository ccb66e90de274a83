use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::game::Pattern;

/// Long-lived player aggregates. The balance survives sessions; everything
/// else is bookkeeping for the stats panel.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerProfile {
    pub balance: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub total_wagered: u64,
    pub total_won: u64,
    pub best_win: u32,
    pub favorite_pattern: Option<Pattern>,
    pub created_at: String, // ISO 8601 string
}

impl PlayerProfile {
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64 * 100.0
        }
    }

    pub fn net_profit(&self) -> i64 {
        self.total_won as i64 - self.total_wagered as i64
    }
}

/// Per-session view of the player's account, safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AccountSnapshot {
    pub balance: u32,
    pub wager: u32,
    pub pattern: Pattern,
    pub selected_number: Option<u16>,
    pub is_playing: bool,
    pub has_card: bool,
    pub marked_numbers: Vec<u16>,
}
