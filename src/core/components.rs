use bevy::prelude::*;

use crate::core::progression::{EntityId, EntityKind};

/// Marker for the player-controlled body (Nova).
#[derive(Component)]
pub struct Player;

/// Number of ground/platform colliders the player currently touches.
#[derive(Component, Debug, Default, Deref, DerefMut, Copy, Clone)]
pub struct GroundContacts(pub u32);

/// Links an ECS entity to its session record.
#[derive(Component, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tracked {
    pub id: EntityId,
    pub kind: EntityKind,
}

/// Static surfaces that let the player jump.
#[derive(Component)]
pub struct Ground;

/// Static arena pieces (background, walls, platforms), spawned once.
#[derive(Component)]
pub struct ArenaPiece;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Idle,
    Right,
}

/// Sprite-sheet cycling state for the player.
#[derive(Component, Debug)]
pub struct PlayerAnimation {
    pub facing: Facing,
    pub frame: usize,
    pub timer: Timer,
}

impl Default for PlayerAnimation {
    fn default() -> Self {
        Self {
            facing: Facing::Idle,
            frame: 0,
            timer: Timer::from_seconds(0.1, TimerMode::Repeating),
        }
    }
}
