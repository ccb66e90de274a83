use std::collections::{HashSet, VecDeque};

use tracing::{debug, info};

use game_types::{
    Call, Card, GameError, GameOutcome, Pattern, Phase, SessionSnapshot, CALL_HISTORY_LIMIT,
    DEFAULT_MAX_DRAWS, DEFAULT_PICKING_SECONDS, NUMBER_MAX, NUMBER_MIN,
};

use crate::account::{PlayerAccount, DEFAULT_STARTING_BALANCE};
use crate::ambient::{AmbientActivity, AmbientEvent};
use crate::card::generate_card;
use crate::draw::DrawSource;
use crate::game_events::{GameEvent, GameEventBus};
use crate::history::{make_record, make_winner, GameHistory};
use crate::patterns;
use crate::quick_join;
use crate::stats::DrawStats;

/// Display name the local player gets on the winner board.
pub const LOCAL_PLAYER_NAME: &str = "You";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_draws: u32,
    pub picking_seconds: u32,
    pub starting_balance: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_draws: DEFAULT_MAX_DRAWS,
            picking_seconds: DEFAULT_PICKING_SECONDS,
            starting_balance: DEFAULT_STARTING_BALANCE,
        }
    }
}

/// The whole game loop as a state machine over two phases.
///
/// `tick` advances exactly one logical second; the caller owns the clock, so
/// there is never more than one timer driving the session and a phase change
/// cannot race a stale tick. Drawing runs until `max_draws` numbers are out
/// (or the source exhausts), then a fixed picking window, then the next
/// session cycle.
pub struct BingoSession {
    config: SessionConfig,
    pub session_id: u64,
    pub phase: Phase,
    pub draws_completed: u32,
    pub drawn_numbers: Vec<u16>,
    drawn_set: HashSet<u16>,
    pub taken_numbers: HashSet<u16>,
    pub time_left: u32,
    call_history: VecDeque<Call>,
    pub active_players: u32,

    pub account: PlayerAccount,
    pub history: GameHistory,
    pub draw_stats: DrawStats,
    pub event_bus: GameEventBus,

    draw_source: Box<dyn DrawSource>,
    ambient: Option<Box<dyn AmbientActivity>>,
    pending_events: Vec<GameEvent>,
}

impl BingoSession {
    pub fn new(config: SessionConfig, draw_source: Box<dyn DrawSource>) -> Self {
        let account = PlayerAccount::new(config.starting_balance);
        Self {
            config,
            session_id: 1,
            phase: Phase::Drawing,
            draws_completed: 0,
            drawn_numbers: Vec::new(),
            drawn_set: HashSet::new(),
            taken_numbers: HashSet::new(),
            time_left: 0,
            call_history: VecDeque::new(),
            active_players: 1,
            account,
            history: GameHistory::new(),
            draw_stats: DrawStats::new(),
            event_bus: GameEventBus::new(),
            draw_source,
            ambient: None,
            pending_events: Vec::new(),
        }
    }

    pub fn with_ambient(mut self, ambient: Box<dyn AmbientActivity>) -> Self {
        self.ambient = Some(ambient);
        self
    }

    /// Announces the opening drawing phase. Call once before ticking.
    pub fn start(&mut self) -> Vec<GameEvent> {
        info!(session_id = self.session_id, "session starting");
        self.emit(GameEvent::PhaseChanged {
            phase: Phase::Drawing,
            session_id: self.session_id,
            time_left: 0,
        });
        self.drain_events()
    }

    /// Advances one logical second and returns everything that happened.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        match self.phase {
            Phase::Drawing => self.drawing_tick(),
            Phase::Picking => self.picking_tick(),
        }
        self.drain_events()
    }

    fn drawing_tick(&mut self) {
        if self.draws_completed >= self.config.max_draws {
            self.end_drawing_phase();
            return;
        }

        match self.draw_source.next_draw(&self.drawn_set) {
            Ok(number) => self.apply_draw(number),
            Err(GameError::DrawExhausted) => {
                debug!(
                    session_id = self.session_id,
                    draws = self.draws_completed,
                    "draw source exhausted, ending phase early"
                );
                self.end_drawing_phase();
            }
            Err(error) => {
                debug!(%error, "draw failed, ending phase early");
                self.end_drawing_phase();
            }
        }
    }

    fn apply_draw(&mut self, number: u16) {
        self.drawn_numbers.push(number);
        self.drawn_set.insert(number);
        self.draws_completed += 1;
        self.draw_stats.record_draw(number);

        let call = Call::for_number(number);
        self.call_history.push_front(call.clone());
        self.call_history.truncate(CALL_HISTORY_LIMIT);

        self.emit(GameEvent::NumberDrawn {
            number,
            letter: call.letter,
            draws_completed: self.draws_completed,
        });

        if self.account.mark(number) && !self.account.session_won {
            if let Some(card) = &self.account.card {
                if patterns::is_satisfied(self.account.pattern, card, &self.account.marked_numbers)
                {
                    self.settle_win();
                }
            }
        }

        self.run_ambient();

        if self.draws_completed >= self.config.max_draws {
            self.end_drawing_phase();
        }
    }

    fn picking_tick(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
        self.run_ambient();
        if self.time_left == 0 {
            self.begin_next_session();
        }
    }

    /// Player won mid-phase; payout happens now but the drawing phase keeps
    /// running for everyone else.
    fn settle_win(&mut self) {
        let pattern = self.account.pattern;
        let number = self.account.selected_number;
        let wager = self.account.active_wager().unwrap_or(self.account.wager);

        let winnings = self.account.process_win();
        if let Some(n) = number {
            self.taken_numbers.remove(&n);
        }

        info!(
            winnings,
            pattern = %pattern,
            draws = self.draws_completed,
            "player won"
        );

        self.history.record_game(make_record(
            GameOutcome::Win,
            pattern,
            wager,
            winnings,
            self.draws_completed,
            self.session_id,
        ));
        self.history.record_winner(make_winner(
            LOCAL_PLAYER_NAME.to_string(),
            number,
            pattern,
            winnings,
            self.draws_completed,
            self.session_id,
        ));

        self.emit(GameEvent::PlayerWon {
            winnings,
            pattern,
            draws_completed: self.draws_completed,
        });
        self.emit(GameEvent::BalanceUpdated {
            balance: self.account.balance,
        });
    }

    fn settle_loss(&mut self) {
        let pattern = self.account.pattern;
        let number = self.account.selected_number;

        let wager = self.account.process_loss();
        if let Some(n) = number {
            self.taken_numbers.remove(&n);
        }

        self.history.record_game(make_record(
            GameOutcome::Loss,
            pattern,
            wager,
            0,
            self.draws_completed,
            self.session_id,
        ));

        self.emit(GameEvent::PlayerLost { wager });
        self.emit(GameEvent::BalanceUpdated {
            balance: self.account.balance,
        });
    }

    fn end_drawing_phase(&mut self) {
        if self.account.is_playing && !self.account.session_won {
            self.settle_loss();
        }

        self.phase = Phase::Picking;
        self.time_left = self.config.picking_seconds;
        info!(
            session_id = self.session_id,
            draws = self.draws_completed,
            "drawing phase over, picking open"
        );
        self.emit(GameEvent::PhaseChanged {
            phase: Phase::Picking,
            session_id: self.session_id,
            time_left: self.time_left,
        });
    }

    fn begin_next_session(&mut self) {
        self.session_id += 1;
        self.taken_numbers.clear();
        self.account.reset_for_new_session();
        if self.account.is_playing {
            // A joined player's reservation carries into the new cycle.
            if let Some(n) = self.account.selected_number {
                self.taken_numbers.insert(n);
            }
        }

        self.drawn_numbers.clear();
        self.drawn_set.clear();
        self.draws_completed = 0;
        self.call_history.clear();
        self.phase = Phase::Drawing;
        self.time_left = 0;

        info!(session_id = self.session_id, "new session cycle");
        self.emit(GameEvent::PhaseChanged {
            phase: Phase::Drawing,
            session_id: self.session_id,
            time_left: 0,
        });
    }

    /// Picks (or re-picks) a number during the picking window and deals the
    /// matching card. Re-selection before joining just replaces the card.
    pub fn select_number(&mut self, number: u16) -> Result<Card, GameError> {
        if self.phase != Phase::Picking {
            return Err(GameError::InvalidSelection {
                reason: "selection is only open during the picking phase".to_string(),
            });
        }
        if !(NUMBER_MIN..=NUMBER_MAX).contains(&number) {
            return Err(GameError::InvalidSelection {
                reason: format!("number {} is out of range", number),
            });
        }
        if self.account.is_playing {
            return Err(GameError::InvalidSelection {
                reason: "already joined this game".to_string(),
            });
        }
        if self.taken_numbers.contains(&number) {
            return Err(GameError::InvalidSelection {
                reason: format!("number {} is already taken", number),
            });
        }

        let card = generate_card(number);
        self.account.select(number, card.clone());
        self.emit(GameEvent::CardGenerated { card: card.clone() });
        Ok(card)
    }

    pub fn set_wager(&mut self, amount: u32) -> Result<(), GameError> {
        self.account.set_wager(amount)
    }

    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.account.set_pattern(pattern);
    }

    /// Commits the selection to the upcoming game. All validation happens
    /// before any state changes.
    pub fn join(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Picking {
            return Err(GameError::InvalidSelection {
                reason: "joining is only open during the picking phase".to_string(),
            });
        }
        if let Some(number) = self.account.selected_number {
            if self.taken_numbers.contains(&number) {
                return Err(GameError::InvalidSelection {
                    reason: format!("number {} is already taken", number),
                });
            }
        }

        let wager = self.account.join()?;
        let number = self
            .account
            .selected_number
            .ok_or_else(|| GameError::InvalidSelection {
                reason: "no number selected".to_string(),
            })?;
        self.taken_numbers.insert(number);

        info!(number, wager, pattern = %self.account.pattern, "player joined");
        self.emit(GameEvent::PlayerJoined {
            number,
            wager,
            pattern: self.account.pattern,
        });
        self.emit(GameEvent::BalanceUpdated {
            balance: self.account.balance,
        });
        Ok(())
    }

    /// Select + wager + pattern + join in one step, choices made by the
    /// quick-join heuristics.
    pub fn quick_join(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Picking {
            return Err(GameError::InvalidSelection {
                reason: "joining is only open during the picking phase".to_string(),
            });
        }

        let hot = self.draw_stats.hot_numbers(10);
        let plan = quick_join::plan(&self.taken_numbers, &hot, self.account.balance).ok_or(
            GameError::InvalidSelection {
                reason: "no numbers left to pick".to_string(),
            },
        )?;

        self.set_pattern(plan.pattern);
        self.set_wager(plan.wager)?;
        self.select_number(plan.number)?;
        self.join()
    }

    fn run_ambient(&mut self) {
        let Some(mut ambient) = self.ambient.take() else {
            return;
        };
        let events = ambient.on_tick(self.phase, self.draws_completed, &self.taken_numbers);
        self.ambient = Some(ambient);

        for event in events {
            match event {
                AmbientEvent::NumberReserved(number) => {
                    self.taken_numbers.insert(number);
                }
                AmbientEvent::PlayersChanged(delta) => {
                    let next = self.active_players as i64 + delta as i64;
                    self.active_players = next.max(1) as u32;
                }
                AmbientEvent::OpponentWon {
                    player,
                    pattern,
                    winnings,
                    draws,
                } => {
                    self.history.record_winner(make_winner(
                        player.clone(),
                        None,
                        pattern,
                        winnings,
                        draws,
                        self.session_id,
                    ));
                    self.active_players = self.active_players.saturating_sub(1).max(1);
                    self.emit(GameEvent::OpponentWon {
                        player,
                        pattern,
                        winnings,
                        draws,
                    });
                }
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut taken: Vec<u16> = self.taken_numbers.iter().copied().collect();
        taken.sort_unstable();

        SessionSnapshot {
            session_id: self.session_id,
            phase: self.phase,
            draws_completed: self.draws_completed,
            max_draws: self.config.max_draws,
            drawn_numbers: self.drawn_numbers.clone(),
            taken_numbers: taken,
            time_left: self.time_left,
            call_history: self.call_history.iter().cloned().collect(),
            active_players: self.active_players,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn emit(&mut self, event: GameEvent) {
        self.event_bus.publish(&event);
        self.pending_events.push(event);
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Events emitted by operations since the last tick or drain.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.drain_events()
    }
}
