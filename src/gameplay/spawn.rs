use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashMap;

use crate::app::loading::{AssetKey, AssetRegistry};
use crate::core::components::Tracked;
use crate::core::config::GameConfig;
use crate::core::progression::{Effect, EntityId, EntityKind, SpawnRequest};
use crate::core::system::system_order::{EffectApplySet, GameInputSet};
use crate::gameplay::session::ActiveSession;
use crate::physics::rapier_physics::world_bounds_groups;

/// Session id -> realized ECS entity.
#[derive(Resource, Debug, Default)]
pub struct EntityIndex(pub HashMap<EntityId, Entity>);

pub struct EntitySpawnPlugin;

impl Plugin for EntitySpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EntityIndex>()
            .add_systems(Update, apply_spawn_effects.in_set(EffectApplySet))
            .add_systems(Update, sync_tracked_motion.in_set(GameInputSet));
    }
}

struct Look {
    key: AssetKey,
    fallback: Color,
    size: Vec2,
}

fn look_for(kind: EntityKind, cfg: &GameConfig) -> Look {
    match kind {
        EntityKind::Hostile { boss: false } => Look {
            key: AssetKey::Hostile,
            fallback: Color::srgb(0.6, 0.25, 0.8),
            size: Vec2::splat(cfg.spawn.hostile_radius * 2.0),
        },
        // Base size; the request's scale doubles it through the transform.
        EntityKind::Hostile { boss: true } => Look {
            key: AssetKey::Boss,
            fallback: Color::srgb(0.85, 0.2, 0.2),
            size: Vec2::splat(cfg.spawn.hostile_radius * 2.0),
        },
        EntityKind::Pickup => Look {
            key: AssetKey::Pickup,
            fallback: Color::srgb(0.2, 0.9, 0.9),
            size: Vec2::splat(cfg.spawn.pickup_radius * 2.0),
        },
        EntityKind::Projectile => Look {
            key: AssetKey::Laser,
            fallback: Color::srgb(1.0, 0.9, 0.2),
            size: cfg.projectile.half_extents.as_vec2() * 2.0,
        },
    }
}

/// Realizes one session record as a rapier body.
pub fn spawn_tracked(
    commands: &mut Commands,
    req: &SpawnRequest,
    cfg: &GameConfig,
    registry: Option<&AssetRegistry>,
) -> Entity {
    let look = look_for(req.kind, cfg);
    let sprite = match registry {
        Some(r) => r.sprite(look.key, look.fallback, look.size),
        None => Sprite::from_color(look.fallback, look.size),
    };
    let transform = Transform::from_translation(req.position.extend(1.0))
        .with_scale(Vec3::new(req.scale, req.scale, 1.0));

    let mut e = commands.spawn((
        Tracked {
            id: req.id,
            kind: req.kind,
        },
        sprite,
        transform,
        Velocity::linear(req.velocity),
        LockedAxes::ROTATION_LOCKED,
        ActiveEvents::COLLISION_EVENTS,
        world_bounds_groups(req.collide_world_bounds),
    ));
    match req.kind {
        EntityKind::Hostile { .. } => {
            e.insert((RigidBody::Dynamic, Collider::ball(cfg.spawn.hostile_radius)));
        }
        EntityKind::Pickup => {
            e.insert((RigidBody::Dynamic, Collider::ball(cfg.spawn.pickup_radius)));
        }
        EntityKind::Projectile => {
            let he = cfg.projectile.half_extents;
            e.insert((
                RigidBody::KinematicVelocityBased,
                Collider::cuboid(he.x, he.y),
                Sensor,
            ));
        }
    }
    if req.gravity_exempt {
        e.insert(GravityScale(0.0));
    }
    if let Some(bounce) = req.bounce {
        e.insert((
            Restitution {
                coefficient: bounce,
                combine_rule: CoefficientCombineRule::Max,
            },
            Friction {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Min,
            },
        ));
    }
    e.id()
}

fn apply_spawn_effects(
    mut commands: Commands,
    mut effects: EventReader<Effect>,
    mut index: ResMut<EntityIndex>,
    registry: Option<Res<AssetRegistry>>,
    cfg: Res<GameConfig>,
) {
    for effect in effects.read() {
        match effect {
            Effect::Spawn(req) => {
                let entity = spawn_tracked(&mut commands, req, &cfg, registry.as_deref());
                debug!(target: "spawn", "{:?} {:?} -> {:?}", req.kind, req.id, entity);
                index.0.insert(req.id, entity);
            }
            Effect::Despawn(id) => {
                if let Some(entity) = index.0.remove(id) {
                    commands.entity(entity).try_despawn();
                }
            }
            _ => {}
        }
    }
}

/// Mirrors engine-side motion into the session records.
fn sync_tracked_motion(
    mut active: ResMut<ActiveSession>,
    q: Query<(&Tracked, &Transform, &Velocity)>,
) {
    let state = active.session.state_mut();
    for (tracked, transform, velocity) in &q {
        state.sync_motion(tracked.id, transform.translation.truncate(), velocity.linvel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use crate::gameplay::session::SessionPlugin;
    use crate::core::progression::GameEvent;

    fn test_app() -> App {
        let mut cfg = GameConfig::default();
        cfg.rng_seed = Some(9);
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.insert_resource(cfg);
        app.add_plugins((SessionPlugin, EntitySpawnPlugin));
        app
    }

    fn tracked_count(app: &mut App) -> usize {
        let mut q = app.world_mut().query::<&Tracked>();
        q.iter(app.world()).count()
    }

    #[test]
    fn play_spawns_first_wave() {
        let mut app = test_app();
        app.world_mut().send_event(GameEvent::AssetsLoaded);
        app.update();
        app.world_mut().send_event(GameEvent::PlayRequested);
        app.update();
        // 3 regular hostiles + boss + pickup
        assert_eq!(tracked_count(&mut app), 5);
        assert_eq!(app.world().resource::<EntityIndex>().0.len(), 5);
    }

    #[test]
    fn boss_is_gravity_exempt_and_scaled() {
        let mut app = test_app();
        app.world_mut().send_event(GameEvent::AssetsLoaded);
        app.update();
        app.world_mut().send_event(GameEvent::PlayRequested);
        app.update();
        let mut q = app
            .world_mut()
            .query::<(&Tracked, &Transform, Option<&GravityScale>)>();
        let boss = q
            .iter(app.world())
            .find(|(t, _, _)| t.kind.is_boss())
            .map(|(_, tf, g)| (tf.scale, g.map(|g| g.0)));
        assert_eq!(boss, Some((Vec3::new(2.0, 2.0, 1.0), Some(0.0))));
    }
}
