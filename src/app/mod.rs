pub mod end_screen;
pub mod game;
pub mod loading;
pub mod menu;
pub mod state;
