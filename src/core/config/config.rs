use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            title: "Nova Blaster".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}
impl<T: Default> Default for SpawnRange<T> {
    fn default() -> Self {
        Self {
            min: Default::default(),
            max: Default::default(),
        }
    }
}
impl SpawnRange<f32> {
    /// Inclusive sample; a degenerate or inverted range yields `min`.
    pub fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// Plain `(x: .., y: ..)` pair for RON; converted to `Vec2` at use sites.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}
impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in px/s^2 (positive means down).
    pub gravity: f32,
    pub player_restitution: f32,
    pub body_restitution: f32,
    pub rapier_debug: bool,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 300.0,
            player_restitution: 0.2,
            body_restitution: 1.0,
            rapier_debug: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: Point2,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub half_extents: Point2,
}
impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: Point2::new(-300.0, -150.0),
            run_speed: 160.0,
            jump_speed: 330.0,
            half_extents: Point2::new(14.0, 16.0),
        }
    }
}

/// Score and progression rules.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    pub points_per_kill: u32,
    pub points_per_pickup: u32,
    pub invincibility_ms: u64,
    pub final_level: u32,
    pub hostiles_per_level: u32,
}
impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            points_per_kill: 5,
            points_per_pickup: 10,
            invincibility_ms: 5000,
            final_level: 4,
            hostiles_per_level: 3,
        }
    }
}

/// Level-load spawn policy. World coordinates are y-up with the origin at the arena centre.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    pub x_range: SpawnRange<f32>,
    pub hostile_y: f32,
    pub pickup_y: f32,
    pub vel_x_range: SpawnRange<f32>,
    /// Downward drift applied to regular hostiles and pickups.
    pub drift: f32,
    pub hostile_radius: f32,
    pub pickup_radius: f32,
    pub boss_position: Point2,
    pub boss_scale: f32,
    /// Leftward boss speed.
    pub boss_speed: f32,
}
impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            x_range: SpawnRange {
                min: -300.0,
                max: 300.0,
            },
            hostile_y: 284.0,
            pickup_y: 284.0,
            vel_x_range: SpawnRange {
                min: -200.0,
                max: 200.0,
            },
            drift: 20.0,
            hostile_radius: 12.0,
            pickup_radius: 10.0,
            boss_position: Point2::new(200.0, 200.0),
            boss_scale: 2.0,
            boss_speed: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub half_extents: Point2,
    /// Distance past the arena edge before a projectile counts as out of bounds.
    pub cull_margin: f32,
}
impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 500.0,
            half_extents: Point2::new(8.0, 2.0),
            cull_margin: 16.0,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub rules: RulesConfig,
    pub spawn: SpawnConfig,
    pub projectile: ProjectileConfig,
    pub rng_seed: Option<u64>,
}

/// Command-line values layered over whatever the config files say, including on hot reload.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub rng_seed: Option<u64>,
    pub auto_close: Option<f32>,
}

impl ConfigOverrides {
    pub fn apply(&self, cfg: &mut GameConfig) {
        if let Some(seed) = self.rng_seed {
            cfg.rng_seed = Some(seed);
        }
        if let Some(secs) = self.auto_close {
            cfg.window.auto_close = secs;
        }
    }
}

impl GameConfig {
    /// Single in-memory layer, used where there is no filesystem (the embedded web build).
    pub fn from_ron_str(data: &str) -> Result<Self, String> {
        ron::from_str(data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Deep-merges every readable file in order (later files win) and deserializes the result.
    /// Returns the config, the paths that contributed, and any per-file errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        if let Some((_, ev)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                            merge_value(ev, v);
                            continue;
                        }
                        bm.insert(k, v);
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.physics.gravity < 0.0 {
            w.push(format!(
                "physics.gravity is negative ({}); bodies will fall upwards",
                self.physics.gravity
            ));
        }
        if !(0.0..=1.5).contains(&self.physics.body_restitution) {
            w.push(format!(
                "physics.body_restitution {} outside recommended 0..1.5",
                self.physics.body_restitution
            ));
        }
        if self.player.run_speed <= 0.0 {
            w.push("player.run_speed must be > 0".into());
        }
        if self.player.jump_speed <= 0.0 {
            w.push("player.jump_speed must be > 0; the player cannot jump".into());
        }
        if self.rules.final_level == 0 {
            w.push("rules.final_level is 0; the first cleared level wins immediately".into());
        }
        if self.rules.hostiles_per_level == 0 {
            w.push("rules.hostiles_per_level is 0; only the boss will spawn".into());
        }
        if self.rules.invincibility_ms == 0 {
            w.push("rules.invincibility_ms is 0; pickups grant no shield".into());
        }
        fn check_range_f32(w: &mut Vec<String>, label: &str, r: &SpawnRange<f32>) {
            if r.min > r.max {
                w.push(format!(
                    "{label} min ({}) greater than max ({})",
                    r.min, r.max
                ));
            }
        }
        check_range_f32(&mut w, "spawn.x_range", &self.spawn.x_range);
        check_range_f32(&mut w, "spawn.vel_x_range", &self.spawn.vel_x_range);
        let half_w = self.window.width * 0.5;
        if self.spawn.x_range.min < -half_w || self.spawn.x_range.max > half_w {
            w.push(format!(
                "spawn.x_range {}..{} reaches outside the arena (half width {half_w})",
                self.spawn.x_range.min, self.spawn.x_range.max
            ));
        }
        if self.spawn.boss_scale <= 0.0 {
            w.push("spawn.boss_scale must be > 0".into());
        }
        if self.projectile.speed <= 0.0 {
            w.push("projectile.speed must be > 0; shots will never leave the player".into());
        }
        w
    }

    pub fn arena_half_extents(&self) -> Vec2 {
        Vec2::new(self.window.width * 0.5, self.window.height * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn overrides_only_touch_what_was_given() {
        let mut cfg = GameConfig::default();
        cfg.rng_seed = Some(1);
        ConfigOverrides {
            rng_seed: None,
            auto_close: Some(3.0),
        }
        .apply(&mut cfg);
        assert_eq!(cfg.rng_seed, Some(1));
        assert_eq!(cfg.window.auto_close, 3.0);
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = GameConfig::default();
        let warns = cfg.validate();
        assert!(warns.is_empty(), "unexpected warnings: {warns:?}");
    }

    #[test]
    fn degenerate_range_samples_min() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = SpawnRange { min: 3.0, max: 3.0 };
        assert_eq!(r.sample(&mut rng), 3.0);
        let inverted = SpawnRange { min: 5.0, max: -5.0 };
        assert_eq!(inverted.sample(&mut rng), 5.0);
    }

    #[test]
    fn validate_flags_inverted_velocity_range() {
        let mut cfg = GameConfig::default();
        cfg.spawn.vel_x_range = SpawnRange { min: 10.0, max: -10.0 };
        let warns = cfg.validate();
        assert!(warns.iter().any(|w| w.contains("spawn.vel_x_range")));
    }
}
