use std::collections::HashSet;

use game_types::{
    AccountSnapshot, Card, GameError, Pattern, PlayerProfile, FREE_SENTINEL, WAGER_MAX, WAGER_MIN,
};

pub const DEFAULT_STARTING_BALANCE: u32 = 1000;
pub const DEFAULT_WAGER: u32 = 50;

/// The local player's money and in-session state.
///
/// The balance only moves through `join` (debit) and `process_win` (credit);
/// a loss forfeits the wager already taken at join time, so nothing is
/// deducted twice. The balance floors at zero and never overflows downward.
#[derive(Debug, Clone)]
pub struct PlayerAccount {
    pub balance: u32,
    pub wager: u32,
    pub pattern: Pattern,
    pub selected_number: Option<u16>,
    pub card: Option<Card>,
    pub marked_numbers: HashSet<u16>,
    pub is_playing: bool,
    pub has_card: bool,
    pub session_won: bool,
    // Wager snapshotted at join so a mid-game SetWager cannot change the
    // stake of the game in flight.
    active_wager: Option<u32>,

    // Lifetime aggregates, persisted across restarts.
    pub games_played: u32,
    pub games_won: u32,
    pub total_wagered: u64,
    pub total_won: u64,
    pub best_win: u32,
    pub favorite_pattern: Option<Pattern>,
    pub created_at: String,
}

impl PlayerAccount {
    pub fn new(starting_balance: u32) -> Self {
        Self {
            balance: starting_balance,
            wager: DEFAULT_WAGER,
            pattern: Pattern::Line,
            selected_number: None,
            card: None,
            marked_numbers: HashSet::new(),
            is_playing: false,
            has_card: false,
            session_won: false,
            active_wager: None,
            games_played: 0,
            games_won: 0,
            total_wagered: 0,
            total_won: 0,
            best_win: 0,
            favorite_pattern: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Restores the durable parts of a persisted profile onto a fresh
    /// account. Session state stays at its defaults.
    pub fn apply_profile(&mut self, profile: &PlayerProfile) {
        self.balance = profile.balance;
        self.games_played = profile.games_played;
        self.games_won = profile.games_won;
        self.total_wagered = profile.total_wagered;
        self.total_won = profile.total_won;
        self.best_win = profile.best_win;
        self.favorite_pattern = profile.favorite_pattern;
        self.created_at = profile.created_at.clone();
    }

    pub fn to_profile(&self) -> PlayerProfile {
        PlayerProfile {
            balance: self.balance,
            games_played: self.games_played,
            games_won: self.games_won,
            total_wagered: self.total_wagered,
            total_won: self.total_won,
            best_win: self.best_win,
            favorite_pattern: self.favorite_pattern,
            created_at: self.created_at.clone(),
        }
    }

    pub fn set_wager(&mut self, amount: u32) -> Result<(), GameError> {
        if !(WAGER_MIN..=WAGER_MAX).contains(&amount) || amount > self.balance {
            return Err(GameError::InvalidWager { amount });
        }
        self.wager = amount;
        Ok(())
    }

    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
    }

    /// Records a (possibly replacing) number selection and its card. The
    /// card exists from selection on, but only counts once the player joins.
    pub fn select(&mut self, number: u16, card: Card) {
        self.selected_number = Some(number);
        self.card = Some(card);
    }

    /// Commits the current selection and wager to the upcoming game. All
    /// checks pass before any state changes, so a rejected join leaves the
    /// account untouched. Returns the wager actually staked.
    pub fn join(&mut self) -> Result<u32, GameError> {
        if self.is_playing {
            return Err(GameError::InvalidSelection {
                reason: "already joined this game".to_string(),
            });
        }
        if self.selected_number.is_none() || self.card.is_none() {
            return Err(GameError::InvalidSelection {
                reason: "no number selected".to_string(),
            });
        }
        if self.balance < self.wager {
            return Err(GameError::InsufficientBalance {
                wager: self.wager,
                balance: self.balance,
            });
        }

        self.balance -= self.wager;
        self.active_wager = Some(self.wager);
        self.is_playing = true;
        self.has_card = true;
        self.session_won = false;
        self.marked_numbers.clear();
        self.marked_numbers.insert(FREE_SENTINEL);
        Ok(self.wager)
    }

    /// The wager staked on the game in flight, if one is running.
    pub fn active_wager(&self) -> Option<u32> {
        self.active_wager
    }

    /// Marks a drawn number if it appears on the active card. Returns true
    /// only for a fresh mark.
    pub fn mark(&mut self, number: u16) -> bool {
        if !self.is_playing {
            return false;
        }
        match &self.card {
            Some(card) if card.contains(number) => self.marked_numbers.insert(number),
            _ => false,
        }
    }

    /// Credits the win and settles the game. Returns the winnings.
    pub fn process_win(&mut self) -> u32 {
        let wager = self.active_wager.take().unwrap_or(self.wager);
        let winnings = wager * self.pattern.multiplier();

        self.balance = self.balance.saturating_add(winnings);
        self.games_played += 1;
        self.games_won += 1;
        self.total_wagered += wager as u64;
        self.total_won += winnings as u64;
        if winnings > self.best_win {
            self.best_win = winnings;
        }
        self.favorite_pattern = Some(self.pattern);

        self.session_won = true;
        self.settle();
        winnings
    }

    /// Settles a losing game. The wager was already debited at join, so this
    /// only updates aggregates and clears the in-game state. Returns the
    /// forfeited wager.
    pub fn process_loss(&mut self) -> u32 {
        let wager = self.active_wager.take().unwrap_or(self.wager);

        self.games_played += 1;
        self.total_wagered += wager as u64;

        self.settle();
        wager
    }

    fn settle(&mut self) {
        self.is_playing = false;
        self.has_card = false;
        self.card = None;
        self.selected_number = None;
        self.marked_numbers.clear();
    }

    /// Rolls transient state for a new session cycle. An unconfirmed
    /// selection from the previous picking window is discarded.
    pub fn reset_for_new_session(&mut self) {
        self.session_won = false;
        if !self.is_playing {
            self.selected_number = None;
            self.card = None;
            self.marked_numbers.clear();
        }
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        let mut marked: Vec<u16> = self.marked_numbers.iter().copied().collect();
        marked.sort_unstable();

        AccountSnapshot {
            balance: self.balance,
            wager: self.wager,
            pattern: self.pattern,
            selected_number: self.selected_number,
            is_playing: self.is_playing,
            has_card: self.has_card,
            marked_numbers: marked,
        }
    }
}

impl Default for PlayerAccount {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_BALANCE)
    }
}
