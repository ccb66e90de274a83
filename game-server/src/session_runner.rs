use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use game_core::{BingoSession, GameEvent, RandomDrawSource, SessionConfig, SimulatedCrowd};
use game_persistence::Persistence;
use game_types::{ClientMessage, ServerMessage};

use crate::config::Config;

const BROADCAST_CAPACITY: usize = 256;

/// Owns the single session and the only clock that drives it.
///
/// All gameplay goes through the session's write lock; the tick task and the
/// websocket handlers never hold it across an await, so a tick can never
/// interleave with half of a client command. Persistence runs on separate
/// tasks and its failures are logged, never surfaced to gameplay.
pub struct SessionRunner {
    session: Arc<RwLock<BingoSession>>,
    events_tx: broadcast::Sender<ServerMessage>,
    persistence: Option<Arc<Persistence>>,
    tick_interval: Duration,
}

impl SessionRunner {
    pub async fn new(config: &Config, persistence: Option<Arc<Persistence>>) -> Self {
        let session_config = SessionConfig {
            max_draws: config.max_draws,
            picking_seconds: config.picking_seconds,
            starting_balance: config.starting_balance,
        };

        let mut session =
            BingoSession::new(session_config, Box::new(RandomDrawSource::new()));
        if config.ambient_crowd {
            session = session.with_ambient(Box::new(SimulatedCrowd::new()));
        }

        if let Some(store) = &persistence {
            hydrate_session(&mut session, store).await;
        }
        session.start();

        let (events_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            session: Arc::new(RwLock::new(session)),
            events_tx,
            persistence,
            tick_interval: Duration::from_millis(config.draw_interval_ms),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.events_tx.subscribe()
    }

    pub fn session(&self) -> Arc<RwLock<BingoSession>> {
        self.session.clone()
    }

    /// Spawns the one timer in the whole server.
    pub fn spawn_tick_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let runner = self.clone();
        let tick_interval = self.tick_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                runner.run_tick().await;
            }
        })
    }

    async fn run_tick(&self) {
        let events = {
            let mut session = self.session.write().await;
            session.tick()
        };

        self.persist_outcomes(&events).await;
        for event in events {
            let _ = self.events_tx.send(event_to_message(event));
        }
    }

    /// Writes freshly settled games through to storage, fire and forget.
    async fn persist_outcomes(&self, events: &[GameEvent]) {
        let Some(store) = &self.persistence else {
            return;
        };

        let won = events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerWon { .. }));
        let lost = events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerLost { .. }));
        let opponent_wins = events
            .iter()
            .filter(|e| matches!(e, GameEvent::OpponentWon { .. }))
            .count();
        if !won && !lost && opponent_wins == 0 {
            return;
        }

        // The newest ledger entries are exactly what this tick settled.
        let (games, winners) = {
            let session = self.session.read().await;
            let games = if won || lost {
                session.history.recent_games(1)
            } else {
                Vec::new()
            };
            let winners = session
                .history
                .recent_winners(opponent_wins + usize::from(won));
            (games, winners)
        };

        let store = store.clone();
        tokio::spawn(async move {
            for record in &games {
                if let Err(error) = store.history.record_game(record).await {
                    warn!(%error, "failed to persist game record");
                }
            }
            for entry in &winners {
                if let Err(error) = store.history.record_winner(entry).await {
                    warn!(%error, "failed to persist winner entry");
                }
            }
        });
    }

    /// Periodic profile and draw-frequency snapshot. Runs beside the tick
    /// loop and never blocks it.
    pub fn spawn_autosave(self: &Arc<Self>, every: Duration) -> Option<JoinHandle<()>> {
        let store = self.persistence.clone()?;
        let session = self.session.clone();

        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;

                let (profile, counts) = {
                    let session = session.read().await;
                    (
                        session.account.to_profile(),
                        session.draw_stats.frequency_rows(),
                    )
                };

                if let Err(error) = store.profiles.save(&profile).await {
                    warn!(%error, "autosave: profile write failed");
                }
                if let Err(error) = store.stats.save_counts(&counts).await {
                    warn!(%error, "autosave: draw frequency write failed");
                }
            }
        }))
    }

    /// Applies one client command and returns the direct replies for that
    /// connection. Broadcast-worthy side effects go out on the shared
    /// channel as well.
    pub async fn handle_client_message(&self, message: ClientMessage) -> Vec<ServerMessage> {
        let mut replies = Vec::new();

        let events = {
            let mut session = self.session.write().await;
            let result = match message {
                ClientMessage::SelectNumber { number } => {
                    session.select_number(number).map(|_| ())
                }
                ClientMessage::SetWager { amount } => session.set_wager(amount),
                ClientMessage::SetPattern { pattern } => {
                    session.set_pattern(pattern);
                    Ok(())
                }
                ClientMessage::Join => session.join(),
                ClientMessage::QuickJoin => session.quick_join(),
                ClientMessage::Heartbeat => Ok(()),
            };

            if let Err(error) = result {
                replies.push(ServerMessage::Error {
                    message: error.to_string(),
                });
            }
            session.take_events()
        };

        for event in events {
            replies.push(event_to_message(event));
        }
        replies
    }

    /// Full state push for a freshly connected (or resyncing) client.
    pub async fn state_message(&self) -> ServerMessage {
        let session = self.session.read().await;
        ServerMessage::SessionState {
            session: session.snapshot(),
            account: session.account.snapshot(),
        }
    }
}

fn event_to_message(event: GameEvent) -> ServerMessage {
    match event {
        GameEvent::PhaseChanged {
            phase,
            session_id,
            time_left,
        } => ServerMessage::PhaseChanged {
            phase,
            session_id,
            time_left,
        },
        GameEvent::NumberDrawn {
            number,
            letter,
            draws_completed,
        } => ServerMessage::DrawCalled {
            number,
            letter,
            draws_completed,
        },
        GameEvent::CardGenerated { card } => ServerMessage::CardUpdated { card },
        GameEvent::PlayerJoined {
            number,
            wager,
            pattern,
        } => ServerMessage::PlayerJoined {
            number,
            wager,
            pattern,
        },
        GameEvent::PlayerWon {
            winnings,
            pattern,
            draws_completed,
        } => ServerMessage::PlayerWon {
            winnings,
            pattern,
            draws_completed,
        },
        GameEvent::PlayerLost { wager } => ServerMessage::PlayerLost { wager },
        GameEvent::OpponentWon {
            player,
            pattern,
            winnings,
            draws,
        } => ServerMessage::OpponentWon {
            player,
            pattern,
            winnings,
            draws,
        },
        GameEvent::BalanceUpdated { balance } => ServerMessage::BalanceUpdated { balance },
    }
}

async fn hydrate_session(session: &mut BingoSession, store: &Persistence) {
    match store.profiles.load().await {
        Ok(Some(profile)) => {
            info!(balance = profile.balance, "restored player profile");
            session.account.apply_profile(&profile);
        }
        Ok(None) => info!("no saved profile, starting fresh"),
        Err(error) => warn!(%error, "profile load failed, starting fresh"),
    }

    match store.stats.load_counts().await {
        Ok(counts) if !counts.is_empty() => {
            info!(numbers = counts.len(), "restored draw frequency counts");
            session.draw_stats.apply_persisted(counts);
        }
        Ok(_) => {}
        Err(error) => warn!(%error, "draw frequency load failed"),
    }

    // Oldest first so the in-memory ledgers end up newest first.
    let games = match store.history.recent_games(50).await {
        Ok(mut games) => {
            games.reverse();
            games
        }
        Err(error) => {
            warn!(%error, "history load failed");
            Vec::new()
        }
    };
    let winners = match store.history.recent_winners(20).await {
        Ok(mut winners) => {
            winners.reverse();
            winners
        }
        Err(error) => {
            warn!(%error, "winner board load failed");
            Vec::new()
        }
    };
    session.history.hydrate(games, winners);
}
