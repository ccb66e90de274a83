use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use game_persistence::{connection::connect_and_migrate, Persistence};
use game_server::{config::Config, create_routes, session_runner::SessionRunner};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    info!("Starting Bingo Hall server...");

    let config = Config::new();

    // A dead database degrades to a memory-only session; play continues and
    // nothing is saved.
    let persistence = match connect_and_migrate().await {
        Ok(db) => Some(Arc::new(Persistence::new(db))),
        Err(error) => {
            tracing::warn!(%error, "database unavailable, running without persistence");
            None
        }
    };

    let runner = Arc::new(SessionRunner::new(&config, persistence).await);
    runner.spawn_tick_loop();
    runner.spawn_autosave(Duration::from_secs(config.autosave_seconds));

    let routes = create_routes(runner.clone());

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config
            .host
            .parse::<std::net::IpAddr>()
            .expect("Invalid HOST"),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
                .expect("Failed to install SIGINT handler");
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
