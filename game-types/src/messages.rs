use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::game::{Card, Pattern, Phase, SessionSnapshot};
use crate::player::AccountSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    SelectNumber { number: u16 },
    SetWager { amount: u32 },
    SetPattern { pattern: Pattern },
    Join,
    QuickJoin,
    Heartbeat,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    SessionState {
        session: SessionSnapshot,
        account: AccountSnapshot,
    },
    DrawCalled {
        number: u16,
        letter: char,
        draws_completed: u32,
    },
    PhaseChanged {
        phase: Phase,
        session_id: u64,
        time_left: u32,
    },
    CardUpdated {
        card: Card,
    },
    PlayerJoined {
        number: u16,
        wager: u32,
        pattern: Pattern,
    },
    PlayerWon {
        winnings: u32,
        pattern: Pattern,
        draws_completed: u32,
    },
    PlayerLost {
        wager: u32,
    },
    OpponentWon {
        player: String,
        pattern: Pattern,
        winnings: u32,
        draws: u32,
    },
    BalanceUpdated {
        balance: u32,
    },
    Error {
        message: String,
    },
}
