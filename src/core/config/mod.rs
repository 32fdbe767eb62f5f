pub mod config;

pub use config::{
    ConfigOverrides, GameConfig, PhysicsConfig, PlayerConfig, Point2, ProjectileConfig, RulesConfig, SpawnConfig,
    SpawnRange, WindowConfig,
};
