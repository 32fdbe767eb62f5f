//! Engine-agnostic run logic: stages, score, levels and the shield timer.

pub mod dispatch;
pub mod events;
pub mod invincibility;
pub mod level;
pub mod stage;
pub mod state;

pub use dispatch::Session;
pub use events::{Effect, GameEvent, PlayerTint};
pub use invincibility::Invincibility;
pub use level::{LevelLoad, SpawnRequest};
pub use stage::Stage;
pub use state::{EntityCollection, EntityId, EntityKind, EntityRecord, GameState};
