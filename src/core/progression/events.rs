use bevy::prelude::*;
use std::time::Duration;

use super::level::SpawnRequest;
use super::stage::Stage;
use super::state::EntityId;

/// Inputs to the session: engine notifications, user triggers and frame ticks.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Asset registry fully populated.
    AssetsLoaded,
    PlayRequested,
    ExitRequested,
    RestartRequested,
    MainMenuRequested,
    FrameAdvanced { delta: Duration },
    FireTriggered { origin: Vec2 },
    HostileStrikesPlayer { hostile: EntityId },
    /// A hostile stopped overlapping the player.
    HostileContactEnded { hostile: EntityId },
    PlayerCollectsPickup { pickup: EntityId },
    ProjectileStrikesHostile { projectile: EntityId, hostile: EntityId },
    ProjectileLeftBounds { projectile: EntityId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTint {
    Normal,
    Shielded,
    Defeated,
}

/// Outputs of the session, applied to the engine by the gameplay systems.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum Effect {
    SwitchStage(Stage),
    Spawn(SpawnRequest),
    Despawn(EntityId),
    UpdateHud(String),
    PlayerTint(PlayerTint),
    SetPhysicsPaused(bool),
    Exit,
}
