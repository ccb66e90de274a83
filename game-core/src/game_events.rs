use game_types::{Card, Pattern, Phase};

/// Everything the session announces to the outside world. The server maps
/// these onto websocket messages; tests collect them directly.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged {
        phase: Phase,
        session_id: u64,
        time_left: u32,
    },
    NumberDrawn {
        number: u16,
        letter: char,
        draws_completed: u32,
    },
    CardGenerated {
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
}

pub trait GameEventHandler: Send + Sync {
    fn handle_event(&mut self, event: &GameEvent);
}

/// Fans session events out to registered handlers.
#[derive(Default)]
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: &GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<GameEvent>>>);

    impl GameEventHandler for Recorder {
        fn handle_event(&mut self, event: &GameEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_bus_fans_out_to_all_handlers() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        let mut bus = GameEventBus::new();
        bus.add_handler(Box::new(Recorder(first.clone())));
        bus.add_handler(Box::new(Recorder(second.clone())));

        bus.publish(&GameEvent::BalanceUpdated { balance: 950 });

        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap().len(), 1);
    }
}
