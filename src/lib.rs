pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;
pub mod physics;

// Curated re-exports
pub use crate::app::game::GamePlugin;
pub use crate::app::state::AppState;
pub use crate::core::config::{GameConfig, WindowConfig};
pub use crate::core::progression::{Effect, GameEvent, GameState, Session, Stage};
