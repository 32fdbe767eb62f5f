use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::app::loading::{AssetKey, AssetRegistry};
use crate::app::state::AppState;
use crate::core::components::{ArenaPiece, Ground};
use crate::core::config::GameConfig;
use crate::core::progression::Effect;
use crate::core::system::system_order::EffectApplySet;

/// Collision group of the four arena walls. Bodies spawned without world-bound
/// collision drop this group from their filter.
pub const WORLD_BOUNDS_GROUP: Group = Group::GROUP_3;

const WALL_THICKNESS: f32 = 20.0;
const GROUND_HALF_EXTENTS: Vec2 = Vec2::new(400.0, 32.0);
const GROUND_Y: f32 = -268.0;

pub struct PhysicsSetupPlugin; // our wrapper to configure Rapier & arena

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((RapierPhysicsPlugin::<NoUserData>::default(),))
            .add_systems(Update, configure_gravity)
            .add_systems(OnExit(AppState::Loading), spawn_arena)
            .add_systems(Update, apply_physics_effects.in_set(EffectApplySet));
        let debug_render = app
            .world()
            .get_resource::<GameConfig>()
            .is_some_and(|cfg| cfg.physics.rapier_debug);
        if debug_render {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}

/// Applies configured gravity when the rapier context appears and whenever the config changes.
fn configure_gravity(mut q_cfg: Query<&mut RapierConfiguration>, game_cfg: Res<GameConfig>) {
    let gravity = Vect::new(0.0, -game_cfg.physics.gravity);
    for mut cfg in &mut q_cfg {
        if !(cfg.is_added() || game_cfg.is_changed()) || cfg.gravity == gravity {
            continue;
        }
        cfg.gravity = gravity;
        info!(target: "physics", "gravity set to {:?}", cfg.gravity);
    }
}

fn apply_physics_effects(
    mut effects: EventReader<Effect>,
    mut q_cfg: Query<&mut RapierConfiguration>,
) {
    for effect in effects.read() {
        if let Effect::SetPhysicsPaused(paused) = effect {
            for mut cfg in &mut q_cfg {
                cfg.physics_pipeline_active = !paused;
            }
            debug!(target: "physics", "physics paused={paused}");
        }
    }
}

fn spawn_arena(mut commands: Commands, cfg: Res<GameConfig>, registry: Res<AssetRegistry>) {
    let half = cfg.arena_half_extents();
    commands.spawn((
        ArenaPiece,
        registry.sprite(AssetKey::Background, Color::srgb(0.05, 0.06, 0.12), half * 2.0),
        Transform::from_xyz(0.0, 0.0, -10.0),
    ));
    commands.spawn((
        ArenaPiece,
        Ground,
        registry.sprite(AssetKey::Ground, Color::srgb(0.25, 0.55, 0.3), GROUND_HALF_EXTENTS * 2.0),
        Transform::from_xyz(0.0, GROUND_Y, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(GROUND_HALF_EXTENTS.x, GROUND_HALF_EXTENTS.y),
    ));

    let t = WALL_THICKNESS * 0.5;
    let walls = [
        (Vec2::new(0.0, -half.y - t), Vec2::new(half.x + WALL_THICKNESS, t), true),
        (Vec2::new(0.0, half.y + t), Vec2::new(half.x + WALL_THICKNESS, t), false),
        (Vec2::new(-half.x - t, 0.0), Vec2::new(t, half.y + WALL_THICKNESS), false),
        (Vec2::new(half.x + t, 0.0), Vec2::new(t, half.y + WALL_THICKNESS), false),
    ];
    for (pos, half_extents, floor) in walls {
        let mut wall = commands.spawn((
            ArenaPiece,
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y),
            CollisionGroups::new(WORLD_BOUNDS_GROUP, Group::ALL),
        ));
        if floor {
            wall.insert(Ground);
        }
    }
    info!(target: "physics", "arena spawned ({}x{})", half.x * 2.0, half.y * 2.0);
}

/// Collision groups for a body that should (or should not) stop at the arena walls.
pub fn world_bounds_groups(collide_world_bounds: bool) -> CollisionGroups {
    let filter = if collide_world_bounds {
        Group::ALL
    } else {
        Group::ALL - WORLD_BOUNDS_GROUP
    };
    CollisionGroups::new(Group::GROUP_1, filter)
}
