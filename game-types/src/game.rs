use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::errors::GameError;

/// Lowest number that can be drawn or picked.
pub const NUMBER_MIN: u16 = 1;
/// Highest number that can be drawn or picked.
pub const NUMBER_MAX: u16 = 200;
/// Cells on a card, laid out 5x5 row-major.
pub const CARD_SIZE: usize = 25;
/// Row 2, col 2 - the FREE cell.
pub const FREE_INDEX: usize = 12;
/// Sentinel stored in the FREE cell; never a drawable number.
pub const FREE_SENTINEL: u16 = 0;
/// Draws per drawing phase before the session rolls over.
pub const DEFAULT_MAX_DRAWS: u32 = 75;
/// Length of the picking window in seconds.
pub const DEFAULT_PICKING_SECONDS: u32 = 60;
/// Rolling call history kept on the session.
pub const CALL_HISTORY_LIMIT: usize = 20;
/// Wager bounds, inclusive.
pub const WAGER_MIN: u32 = 10;
pub const WAGER_MAX: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Phase {
    Drawing,
    Picking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    Line,
    FourCorners,
    FullHouse,
    X,
    Blackout,
}

impl Pattern {
    pub const ALL: [Pattern; 5] = [
        Pattern::Line,
        Pattern::FourCorners,
        Pattern::FullHouse,
        Pattern::X,
        Pattern::Blackout,
    ];

    /// Fixed payout multiplier applied to the wager on a win.
    pub fn multiplier(&self) -> u32 {
        match self {
            Pattern::Line => 5,
            Pattern::FourCorners => 3,
            Pattern::FullHouse => 10,
            Pattern::X => 7,
            Pattern::Blackout => 15,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Pattern::Line => "line",
            Pattern::FourCorners => "four-corners",
            Pattern::FullHouse => "full-house",
            Pattern::X => "x",
            Pattern::Blackout => "blackout",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Pattern::Line => "Line",
            Pattern::FourCorners => "Four Corners",
            Pattern::FullHouse => "Full House",
            Pattern::X => "X Pattern",
            Pattern::Blackout => "Blackout",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Pattern {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| GameError::UnknownPattern {
                name: s.to_string(),
            })
    }
}

/// Column letter for a drawn number, 40 numbers per column.
pub fn letter_for(number: u16) -> char {
    match number {
        1..=40 => 'B',
        41..=80 => 'I',
        81..=120 => 'N',
        121..=160 => 'G',
        _ => 'O',
    }
}

/// A single announced draw, e.g. "G142".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Call {
    pub letter: char,
    pub number: u16,
}

impl Call {
    pub fn for_number(number: u16) -> Self {
        Self {
            letter: letter_for(number),
            number,
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.number)
    }
}

/// A 5x5 card anchored on the player's chosen number. `cells[FREE_INDEX]`
/// always holds `FREE_SENTINEL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Card {
    pub center_number: u16,
    pub cells: Vec<u16>,
}

impl Card {
    pub fn is_complete(&self) -> bool {
        self.cells.len() == CARD_SIZE && self.cells[FREE_INDEX] == FREE_SENTINEL
    }

    pub fn contains(&self, number: u16) -> bool {
        self.cells.contains(&number)
    }

    pub fn position_of(&self, number: u16) -> Option<usize> {
        self.cells.iter().position(|&cell| cell == number)
    }
}

/// Point-in-time view of the session, safe to hand to any client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSnapshot {
    pub session_id: u64,
    pub phase: Phase,
    pub draws_completed: u32,
    pub max_draws: u32,
    pub drawn_numbers: Vec<u16>,
    pub taken_numbers: Vec<u16>,
    pub time_left: u32,
    pub call_history: Vec<Call>,
    pub active_players: u32,
}
