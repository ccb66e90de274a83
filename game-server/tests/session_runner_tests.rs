use std::sync::Arc;
use std::time::Duration;

use game_persistence::{connection::connect_to_memory_database, Persistence};
use game_server::config::Config;
use game_server::session_runner::SessionRunner;
use game_types::{ClientMessage, Pattern, Phase, PlayerProfile, ServerMessage};
use migration::{Migrator, MigratorTrait};

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_draws: 5,
        picking_seconds: 3,
        draw_interval_ms: 10,
        autosave_seconds: 1,
        starting_balance: 1000,
        ambient_crowd: false,
    }
}

async fn memory_persistence() -> Arc<Persistence> {
    let db = connect_to_memory_database().await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(Persistence::new(db))
}

async fn drive_to_picking(runner: &SessionRunner) {
    let session = runner.session();
    let mut session = session.write().await;
    while session.phase == Phase::Drawing {
        session.tick();
    }
}

#[tokio::test]
async fn test_runner_without_database_still_plays() {
    let runner = SessionRunner::new(&test_config(), None).await;
    drive_to_picking(&runner).await;

    let replies = runner
        .handle_client_message(ClientMessage::SelectNumber { number: 88 })
        .await;
    assert!(replies
        .iter()
        .any(|m| matches!(m, ServerMessage::CardUpdated { .. })));
}

#[tokio::test]
async fn test_profile_hydration_on_startup() {
    let persistence = memory_persistence().await;
    let profile = PlayerProfile {
        balance: 1777,
        games_played: 9,
        games_won: 3,
        total_wagered: 600,
        total_won: 1500,
        best_win: 750,
        favorite_pattern: Some(Pattern::Blackout),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    persistence.profiles.save(&profile).await.unwrap();

    let runner = SessionRunner::new(&test_config(), Some(persistence)).await;
    match runner.state_message().await {
        ServerMessage::SessionState { account, .. } => {
            assert_eq!(account.balance, 1777);
        }
        other => panic!("unexpected message: {:?}", other),
    }
}

#[tokio::test]
async fn test_draw_frequency_hydration() {
    let persistence = memory_persistence().await;
    persistence.stats.save_counts(&[(42, 9)]).await.unwrap();

    let runner = SessionRunner::new(&test_config(), Some(persistence)).await;
    let session = runner.session();
    let session = session.read().await;
    assert_eq!(session.draw_stats.count_for(42), 9);
    assert_eq!(session.draw_stats.total_draws(), 9);
}

#[tokio::test]
async fn test_tick_loop_broadcasts_draws() {
    let runner = Arc::new(SessionRunner::new(&test_config(), None).await);
    let mut rx = runner.subscribe();
    runner.spawn_tick_loop();

    let message = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("no broadcast within timeout")
        .expect("broadcast channel closed");
    assert!(matches!(
        message,
        ServerMessage::DrawCalled { .. } | ServerMessage::PhaseChanged { .. }
    ));
}

#[tokio::test]
async fn test_settled_games_reach_the_database() {
    let persistence = memory_persistence().await;
    let runner = Arc::new(SessionRunner::new(&test_config(), Some(persistence.clone())).await);
    drive_to_picking(&runner).await;

    runner
        .handle_client_message(ClientMessage::SelectNumber { number: 88 })
        .await;
    runner.handle_client_message(ClientMessage::Join).await;

    // Run picking out, then the 5-draw phase; the near-certain loss settles.
    {
        let session = runner.session();
        let mut session = session.write().await;
        while session.phase == Phase::Picking {
            session.tick();
        }
    }
    let mut rx = runner.subscribe();
    runner.spawn_tick_loop();
    let mut settled = false;
    for _ in 0..200 {
        match tokio::time::timeout(Duration::from_secs(2), rx.recv()).await {
            Ok(Ok(ServerMessage::PlayerLost { .. } | ServerMessage::PlayerWon { .. })) => {
                settled = true;
                break;
            }
            Ok(Ok(_)) => continue,
            _ => break,
        }
    }
    assert!(settled);

    // The write-through task is fire and forget; give it a moment.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let games = persistence.history.recent_games(10).await.unwrap();
    assert_eq!(games.len(), 1);
}
