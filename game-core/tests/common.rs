use std::sync::{Arc, Mutex};

use game_core::{
    BingoSession, GameEvent, GameEventHandler, RandomDrawSource, ScriptedDrawSource, SessionConfig,
};
use game_types::Phase;

/// Creates a session with a seeded draw source and no ambient crowd.
pub fn create_seeded_session(seed: u64) -> BingoSession {
    BingoSession::new(
        SessionConfig::default(),
        Box::new(RandomDrawSource::seeded(seed)),
    )
}

/// Creates a session whose draws follow `script` exactly.
pub fn create_scripted_session(script: Vec<u16>) -> BingoSession {
    BingoSession::new(
        SessionConfig::default(),
        Box::new(ScriptedDrawSource::new(script)),
    )
}

/// Ticks until the current drawing phase ends.
pub fn run_drawing_phase(session: &mut BingoSession) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while session.phase == Phase::Drawing {
        events.extend(session.tick());
    }
    events
}

/// Ticks through the whole picking window into the next drawing phase.
pub fn run_picking_phase(session: &mut BingoSession) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while session.phase == Phase::Picking {
        events.extend(session.tick());
    }
    events
}

/// The numbers of a card's top row, for scripting a line win.
pub fn top_row(session: &BingoSession) -> Vec<u16> {
    let card = session.account.card.as_ref().unwrap();
    card.cells[0..5].to_vec()
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: &GameEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
