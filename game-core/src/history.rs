use std::collections::{HashMap, VecDeque};

use uuid::Uuid;

use game_types::{GameOutcome, GameRecord, Pattern, PatternStats, WinStats, WinnerEntry};

/// Most recent completed games kept in memory.
pub const HISTORY_LIMIT: usize = 50;
/// Most recent winner-board entries kept in memory.
pub const WINNERS_LIMIT: usize = 20;

/// In-memory ledger of completed games and the winner board, newest first,
/// both capped. Persistence hydrates it on startup and drains nothing; the
/// caps only bound what lives in memory.
#[derive(Debug, Default)]
pub struct GameHistory {
    games: VecDeque<GameRecord>,
    winners: VecDeque<WinnerEntry>,
}

impl GameHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, record: GameRecord) {
        self.games.push_front(record);
        self.games.truncate(HISTORY_LIMIT);
    }

    pub fn record_winner(&mut self, entry: WinnerEntry) {
        self.winners.push_front(entry);
        self.winners.truncate(WINNERS_LIMIT);
    }

    /// Loads persisted records, oldest first, preserving newest-first order
    /// in the ledger.
    pub fn hydrate(&mut self, games: Vec<GameRecord>, winners: Vec<WinnerEntry>) {
        for record in games {
            self.record_game(record);
        }
        for entry in winners {
            self.record_winner(entry);
        }
    }

    pub fn recent_games(&self, limit: usize) -> Vec<GameRecord> {
        self.games.iter().take(limit).cloned().collect()
    }

    pub fn recent_winners(&self, limit: usize) -> Vec<WinnerEntry> {
        self.winners.iter().take(limit).cloned().collect()
    }

    pub fn games_len(&self) -> usize {
        self.games.len()
    }

    pub fn win_stats(&self) -> WinStats {
        let total_games = self.games.len() as u32;
        let wins = self
            .games
            .iter()
            .filter(|g| g.outcome == GameOutcome::Win)
            .count() as u32;
        let total_wagered: u64 = self.games.iter().map(|g| g.wager as u64).sum();
        let total_won: u64 = self.games.iter().map(|g| g.winnings as u64).sum();

        WinStats {
            total_games,
            wins,
            losses: total_games - wins,
            win_rate: if total_games == 0 {
                0.0
            } else {
                wins as f64 / total_games as f64 * 100.0
            },
            total_wagered,
            total_won,
            net_profit: total_won as i64 - total_wagered as i64,
        }
    }

    /// Win counts and winnings per pattern, across the winner board.
    pub fn pattern_stats(&self) -> Vec<PatternStats> {
        let mut by_pattern: HashMap<Pattern, (u32, u64, u64)> = HashMap::new();
        for entry in &self.winners {
            let slot = by_pattern.entry(entry.pattern).or_default();
            slot.0 += 1;
            slot.1 += entry.winnings as u64;
            slot.2 += entry.draws as u64;
        }

        let mut stats: Vec<PatternStats> = by_pattern
            .into_iter()
            .map(|(pattern, (count, total_winnings, draws))| PatternStats {
                pattern,
                count,
                total_winnings,
                avg_draws: (draws / count as u64) as u32,
            })
            .collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count));
        stats
    }
}

pub fn make_record(
    outcome: GameOutcome,
    pattern: Pattern,
    wager: u32,
    winnings: u32,
    draw_count: u32,
    session_id: u64,
) -> GameRecord {
    GameRecord {
        id: Uuid::new_v4(),
        outcome,
        pattern,
        wager,
        winnings,
        draw_count,
        session_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

pub fn make_winner(
    player: String,
    number: Option<u16>,
    pattern: Pattern,
    winnings: u32,
    draws: u32,
    session_id: u64,
) -> WinnerEntry {
    WinnerEntry {
        id: Uuid::new_v4(),
        player,
        number,
        pattern,
        winnings,
        draws,
        session_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn win(wager: u32, winnings: u32) -> GameRecord {
        make_record(GameOutcome::Win, Pattern::Line, wager, winnings, 30, 1)
    }

    fn loss(wager: u32) -> GameRecord {
        make_record(GameOutcome::Loss, Pattern::Line, wager, 0, 75, 1)
    }

    #[test]
    fn test_history_caps_at_fifty() {
        let mut history = GameHistory::new();
        for i in 0..60 {
            history.record_game(win(10 + i, 50));
        }

        assert_eq!(history.games_len(), HISTORY_LIMIT);
        // Newest first.
        assert_eq!(history.recent_games(1)[0].wager, 69);
    }

    #[test]
    fn test_winners_cap_at_twenty() {
        let mut history = GameHistory::new();
        for i in 0..25 {
            history.record_winner(make_winner(
                format!("Player {}", i),
                None,
                Pattern::X,
                100,
                20,
                1,
            ));
        }

        assert_eq!(history.recent_winners(100).len(), WINNERS_LIMIT);
        assert_eq!(history.recent_winners(1)[0].player, "Player 24");
    }

    #[test]
    fn test_win_stats() {
        let mut history = GameHistory::new();
        history.record_game(win(100, 500));
        history.record_game(loss(50));
        history.record_game(loss(50));
        history.record_game(win(100, 500));

        let stats = history.win_stats();
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 2);
        assert!((stats.win_rate - 50.0).abs() < f64::EPSILON);
        assert_eq!(stats.total_wagered, 300);
        assert_eq!(stats.total_won, 1000);
        assert_eq!(stats.net_profit, 700);
    }

    #[test]
    fn test_pattern_stats_sorted_by_count() {
        let mut history = GameHistory::new();
        for _ in 0..3 {
            history.record_winner(make_winner("A".into(), None, Pattern::Line, 250, 20, 1));
        }
        history.record_winner(make_winner("B".into(), None, Pattern::X, 700, 40, 1));

        let stats = history.pattern_stats();
        assert_eq!(stats[0].pattern, Pattern::Line);
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[0].total_winnings, 750);
        assert_eq!(stats[1].pattern, Pattern::X);
        assert_eq!(stats[1].avg_draws, 40);
    }
}
