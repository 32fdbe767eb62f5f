pub mod collisions;
pub mod hud;
pub mod player;
pub mod session;
pub mod shooting;
pub mod spawn;
