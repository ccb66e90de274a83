use std::convert::Infallible;
use std::sync::Arc;

use serde::Deserialize;
use warp::Filter;

use crate::session_runner::SessionRunner;

pub mod config;
pub mod session_runner;
pub mod websocket;

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

#[derive(serde::Serialize)]
struct StateResponse {
    session: game_types::SessionSnapshot,
    account: game_types::AccountSnapshot,
}

#[derive(serde::Serialize)]
struct PlayerStatsResponse {
    profile: game_types::PlayerProfile,
    win_stats: game_types::WinStats,
    pattern_stats: Vec<game_types::PatternStats>,
}

#[derive(serde::Serialize)]
struct NumberStatsResponse {
    hot: Vec<game_types::HotNumber>,
    cold: Vec<u16>,
    columns: Vec<(char, u32)>,
    total_draws: u64,
}

pub fn create_routes(
    runner: Arc<SessionRunner>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let runner_filter = warp::any().map({
        let runner = runner.clone();
        move || runner.clone()
    });

    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(runner_filter.clone())
        .map(|ws: warp::ws::Ws, runner| {
            ws.on_upgrade(move |socket| websocket::handle_connection(socket, runner))
        });

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    let session_state = warp::path!("session" / "state")
        .and(warp::get())
        .and(runner_filter.clone())
        .and_then(handle_session_state);

    let history = warp::path!("history")
        .and(warp::get())
        .and(warp::query::<LimitQuery>())
        .and(runner_filter.clone())
        .and_then(handle_history);

    let winners = warp::path!("history" / "winners")
        .and(warp::get())
        .and(warp::query::<LimitQuery>())
        .and(runner_filter.clone())
        .and_then(handle_winners);

    let player_stats = warp::path!("stats" / "player")
        .and(warp::get())
        .and(runner_filter.clone())
        .and_then(handle_player_stats);

    let number_stats = warp::path!("stats" / "hot-numbers")
        .and(warp::get())
        .and(warp::query::<LimitQuery>())
        .and(runner_filter.clone())
        .and_then(handle_number_stats);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .or(session_state)
        .or(winners)
        .or(history)
        .or(player_stats)
        .or(number_stats)
        .with(cors)
        .with(warp::log("bingo_hall"))
}

async fn handle_session_state(
    runner: Arc<SessionRunner>,
) -> Result<impl warp::Reply, Infallible> {
    let session = runner.session();
    let session = session.read().await;
    Ok(warp::reply::json(&StateResponse {
        session: session.snapshot(),
        account: session.account.snapshot(),
    }))
}

async fn handle_history(
    query: LimitQuery,
    runner: Arc<SessionRunner>,
) -> Result<impl warp::Reply, Infallible> {
    let limit = query.limit.unwrap_or(50).min(50);
    let session = runner.session();
    let session = session.read().await;
    Ok(warp::reply::json(&session.history.recent_games(limit)))
}

async fn handle_winners(
    query: LimitQuery,
    runner: Arc<SessionRunner>,
) -> Result<impl warp::Reply, Infallible> {
    let limit = query.limit.unwrap_or(20).min(20);
    let session = runner.session();
    let session = session.read().await;
    Ok(warp::reply::json(&session.history.recent_winners(limit)))
}

async fn handle_player_stats(
    runner: Arc<SessionRunner>,
) -> Result<impl warp::Reply, Infallible> {
    let session = runner.session();
    let session = session.read().await;
    Ok(warp::reply::json(&PlayerStatsResponse {
        profile: session.account.to_profile(),
        win_stats: session.history.win_stats(),
        pattern_stats: session.history.pattern_stats(),
    }))
}

async fn handle_number_stats(
    query: LimitQuery,
    runner: Arc<SessionRunner>,
) -> Result<impl warp::Reply, Infallible> {
    let limit = query.limit.unwrap_or(10).min(50);
    let session = runner.session();
    let session = session.read().await;
    Ok(warp::reply::json(&NumberStatsResponse {
        hot: session.draw_stats.hot_numbers(limit),
        cold: session.draw_stats.cold_numbers(limit),
        columns: session.draw_stats.column_counts(),
        total_draws: session.draw_stats.total_draws(),
    }))
}
