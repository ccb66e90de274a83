pub mod account;
pub mod ambient;
pub mod card;
pub mod draw;
pub mod game_events;
pub mod history;
pub mod patterns;
pub mod quick_join;
pub mod session;
pub mod stats;

pub use account::{PlayerAccount, DEFAULT_STARTING_BALANCE, DEFAULT_WAGER};
pub use ambient::{AmbientActivity, AmbientEvent, SimulatedCrowd};
pub use card::generate_card;
pub use draw::{DrawSource, RandomDrawSource, ScriptedDrawSource};
pub use game_events::{GameEvent, GameEventBus, GameEventHandler};
pub use history::GameHistory;
pub use quick_join::QuickJoinPlan;
pub use session::{BingoSession, SessionConfig, LOCAL_PLAYER_NAME};
pub use stats::DrawStats;
