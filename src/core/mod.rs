pub mod components;
pub mod config;
pub mod progression;
pub mod system;
