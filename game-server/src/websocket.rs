use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tracing::{info, warn};
use warp::ws::{Message, WebSocket};

use game_types::{ClientMessage, ServerMessage};

use crate::session_runner::SessionRunner;

const MAX_MESSAGES_PER_WINDOW: usize = 20;
const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Sliding-window message counter, one per connection.
struct RateLimiter {
    window_start: Instant,
    count: usize,
}

impl RateLimiter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            count: 0,
        }
    }

    fn allow(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.window_start) >= RATE_WINDOW {
            self.window_start = now;
            self.count = 0;
        }
        self.count += 1;
        self.count <= MAX_MESSAGES_PER_WINDOW
    }
}

/// One task per client: client commands and the shared broadcast feed are
/// multiplexed onto the same socket with select, so replies and broadcasts
/// never race for the sender.
pub async fn handle_connection(websocket: WebSocket, runner: Arc<SessionRunner>) {
    let connection_id = uuid::Uuid::new_v4();
    info!(%connection_id, "websocket connected");

    let (mut ws_sender, mut ws_receiver) = websocket.split();
    let mut broadcast_rx = runner.subscribe();
    let mut rate_limiter = RateLimiter::new();

    // Full state push so a client never starts from a blank board.
    let initial = runner.state_message().await;
    if send_message(&mut ws_sender, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            incoming = ws_receiver.next() => {
                match incoming {
                    Some(Ok(message)) => {
                        if message.is_close() {
                            break;
                        }
                        if !message.is_text() {
                            continue;
                        }
                        if !rate_limiter.allow() {
                            warn!(%connection_id, "rate limit exceeded");
                            let reply = ServerMessage::Error {
                                message: "too many messages".to_string(),
                            };
                            if send_message(&mut ws_sender, &reply).await.is_err() {
                                break;
                            }
                            continue;
                        }

                        let replies = match serde_json::from_str::<ClientMessage>(
                            message.to_str().unwrap_or_default(),
                        ) {
                            Ok(client_message) => {
                                runner.handle_client_message(client_message).await
                            }
                            Err(error) => vec![ServerMessage::Error {
                                message: format!("malformed message: {}", error),
                            }],
                        };

                        let mut closed = false;
                        for reply in &replies {
                            if send_message(&mut ws_sender, reply).await.is_err() {
                                closed = true;
                                break;
                            }
                        }
                        if closed {
                            break;
                        }
                    }
                    Some(Err(error)) => {
                        warn!(%connection_id, %error, "websocket error");
                        break;
                    }
                    None => break,
                }
            }
            broadcast = broadcast_rx.recv() => {
                match broadcast {
                    Ok(message) => {
                        if send_message(&mut ws_sender, &message).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        // Resync a slow client instead of replaying the gap.
                        warn!(%connection_id, skipped, "client lagged, resyncing");
                        let state = runner.state_message().await;
                        if send_message(&mut ws_sender, &state).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    info!(%connection_id, "websocket disconnected");
}

async fn send_message(
    sender: &mut (impl SinkExt<Message> + Unpin),
    message: &ServerMessage,
) -> Result<(), ()> {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(error) => {
            warn!(%error, "failed to serialize server message");
            return Ok(());
        }
    };
    sender.send(Message::text(json)).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_caps_within_window() {
        let mut limiter = RateLimiter::new();
        for _ in 0..MAX_MESSAGES_PER_WINDOW {
            assert!(limiter.allow());
        }
        assert!(!limiter.allow());
    }

    #[test]
    fn test_rate_limiter_resets_after_window() {
        let mut limiter = RateLimiter::new();
        for _ in 0..=MAX_MESSAGES_PER_WINDOW {
            limiter.allow();
        }
        limiter.window_start = Instant::now() - RATE_WINDOW;
        assert!(limiter.allow());
    }
}
