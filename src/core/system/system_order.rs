//! Central system ordering labels to make update sequence explicit.
//! Within `Update`:
//! 1. GameInputSet (keyboard edges, collision translation, frame tick -> `GameEvent`)
//! 2. SessionDispatchSet (`GameEvent` -> session -> `Effect`)
//! 3. EffectApplySet (`Effect` -> spawn/despawn, HUD, tint, physics, stage switch)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct GameInputSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SessionDispatchSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct EffectApplySet;
