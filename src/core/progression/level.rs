//! Level-load routine: clears the previous wave and lays out the next one.

use bevy::prelude::*;
use rand::Rng;

use super::state::{EntityId, EntityKind, EntityRecord, GameState};
use crate::core::config::{PhysicsConfig, ProjectileConfig, RulesConfig, SpawnConfig};

/// Everything the engine needs to realize one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub scale: f32,
    pub gravity_exempt: bool,
    /// Restitution for dynamic bodies; `None` keeps the engine default.
    pub bounce: Option<f32>,
    pub collide_world_bounds: bool,
}

impl SpawnRequest {
    pub fn record(&self) -> EntityRecord {
        EntityRecord {
            id: self.id,
            kind: self.kind,
            position: self.position,
            velocity: self.velocity,
        }
    }
}

/// Result of a level load: ids dropped from the previous wave and the new wave to spawn.
#[derive(Debug, Default)]
pub struct LevelLoad {
    pub cleared: Vec<EntityId>,
    pub spawns: Vec<SpawnRequest>,
}

fn drifting(
    state: &mut GameState,
    kind: EntityKind,
    spawn: &SpawnConfig,
    bounce: f32,
    y: f32,
    rng: &mut (impl Rng + ?Sized),
) -> SpawnRequest {
    SpawnRequest {
        id: state.allocate_id(),
        kind,
        position: Vec2::new(spawn.x_range.sample(&mut *rng), y),
        velocity: Vec2::new(spawn.vel_x_range.sample(&mut *rng), -spawn.drift),
        scale: 1.0,
        gravity_exempt: false,
        bounce: Some(bounce),
        collide_world_bounds: true,
    }
}

/// Clears hostiles and pickups, then registers `hostiles_per_level * level` regular
/// hostiles, one pickup and one boss. Projectiles in flight are left alone.
pub fn load_level(
    state: &mut GameState,
    level: u32,
    rules: &RulesConfig,
    spawn: &SpawnConfig,
    physics: &PhysicsConfig,
    rng: &mut (impl Rng + ?Sized),
) -> LevelLoad {
    let bounce = physics.body_restitution;
    let cleared = state.clear_wave();

    let regular = rules.hostiles_per_level.saturating_mul(level);
    let mut spawns = Vec::with_capacity(regular as usize + 2);
    for _ in 0..regular {
        spawns.push(drifting(
            state,
            EntityKind::REGULAR_HOSTILE,
            spawn,
            bounce,
            spawn.hostile_y,
            &mut *rng,
        ));
    }
    spawns.push(drifting(
        state,
        EntityKind::Pickup,
        spawn,
        bounce,
        spawn.pickup_y,
        &mut *rng,
    ));
    spawns.push(SpawnRequest {
        id: state.allocate_id(),
        kind: EntityKind::BOSS,
        position: spawn.boss_position.as_vec2(),
        velocity: Vec2::new(-spawn.boss_speed, 0.0),
        scale: spawn.boss_scale,
        gravity_exempt: true,
        bounce: Some(bounce),
        collide_world_bounds: true,
    });

    for req in &spawns {
        state.register(req.record());
    }
    state.current_level = level;
    LevelLoad { cleared, spawns }
}

/// A single projectile leaving `origin` with a fixed rightward velocity.
pub fn fire_projectile(
    state: &mut GameState,
    origin: Vec2,
    projectile: &ProjectileConfig,
) -> SpawnRequest {
    let req = SpawnRequest {
        id: state.allocate_id(),
        kind: EntityKind::Projectile,
        position: origin,
        velocity: Vec2::new(projectile.speed, 0.0),
        scale: 1.0,
        gravity_exempt: true,
        bounce: None,
        collide_world_bounds: false,
    };
    state.register(req.record());
    req
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::Duration;

    fn fresh() -> GameState {
        GameState::new(Duration::from_millis(5000))
    }

    #[test]
    fn wave_sizes_for_each_level() {
        let rules = RulesConfig::default();
        let spawn = SpawnConfig::default();
        let physics = PhysicsConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = fresh();
        for level in 1..=4u32 {
            let load = load_level(&mut state, level, &rules, &spawn, &physics, &mut rng);
            let regular = load
                .spawns
                .iter()
                .filter(|r| r.kind == EntityKind::REGULAR_HOSTILE)
                .count();
            let bosses = load.spawns.iter().filter(|r| r.kind.is_boss()).count();
            let pickups = load
                .spawns
                .iter()
                .filter(|r| r.kind == EntityKind::Pickup)
                .count();
            assert_eq!(regular, 3 * level as usize);
            assert_eq!(bosses, 1);
            assert_eq!(pickups, 1);
            assert_eq!(state.hostiles.len(), 3 * level as usize + 1);
            assert_eq!(state.pickups.len(), 1);
            assert!(state.boss_active);
            assert_eq!(state.current_level, level);
        }
    }

    #[test]
    fn reload_clears_previous_wave() {
        let rules = RulesConfig::default();
        let spawn = SpawnConfig::default();
        let physics = PhysicsConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = fresh();
        let first = load_level(&mut state, 1, &rules, &spawn, &physics, &mut rng);
        let second = load_level(&mut state, 2, &rules, &spawn, &physics, &mut rng);
        let mut old: Vec<_> = first.spawns.iter().map(|r| r.id).collect();
        let mut cleared = second.cleared.clone();
        old.sort();
        cleared.sort();
        assert_eq!(old, cleared);
        for id in &old {
            assert!(!state.hostiles.contains(*id));
            assert!(!state.pickups.contains(*id));
        }
    }

    #[test]
    fn spawn_policies() {
        let rules = RulesConfig::default();
        let spawn = SpawnConfig::default();
        let physics = PhysicsConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = fresh();
        let load = load_level(&mut state, 4, &rules, &spawn, &physics, &mut rng);
        for req in &load.spawns {
            if req.kind.is_boss() {
                assert_eq!(req.position, spawn.boss_position.as_vec2());
                assert_eq!(req.scale, 2.0);
                assert!(req.gravity_exempt);
                assert!(req.velocity.x < 0.0);
                assert_eq!(req.velocity.y, 0.0);
                assert!(req.collide_world_bounds);
            } else {
                assert!((-200.0..=200.0).contains(&req.velocity.x));
                assert_eq!(req.velocity.y, -spawn.drift);
                assert!((spawn.x_range.min..=spawn.x_range.max).contains(&req.position.x));
                assert!(!req.gravity_exempt);
                assert!(req.collide_world_bounds);
            }
        }
    }

    #[test]
    fn wave_bounce_follows_body_restitution() {
        let physics = PhysicsConfig {
            body_restitution: 0.6,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = fresh();
        let load = load_level(
            &mut state,
            1,
            &RulesConfig::default(),
            &SpawnConfig::default(),
            &physics,
            &mut rng,
        );
        assert!(load.spawns.iter().all(|req| req.bounce == Some(0.6)));
    }

    #[test]
    fn projectile_moves_right_from_origin() {
        let mut state = fresh();
        let req = fire_projectile(&mut state, Vec2::new(10.0, -5.0), &ProjectileConfig::default());
        assert_eq!(req.position, Vec2::new(10.0, -5.0));
        assert_eq!(req.velocity, Vec2::new(500.0, 0.0));
        assert!(state.projectiles.contains(req.id));
    }
}
