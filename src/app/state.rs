use bevy::prelude::*;

use crate::core::progression::Stage;

/// High-level app lifecycle state.
/// Loading -> Menu -> Playing -> (GameOver | Victory) -> (Menu | Playing)
/// The current level lives in the session, not here.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// Asset registry is being populated.
    #[default]
    Loading,
    /// Start / exit choice.
    Menu,
    Playing,
    /// Lethal collision while unshielded; physics frozen.
    GameOver,
    /// Final level cleared; physics frozen.
    Victory,
}

impl From<Stage> for AppState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Loading => AppState::Loading,
            Stage::Menu => AppState::Menu,
            Stage::Playing { .. } => AppState::Playing,
            Stage::GameOver { .. } => AppState::GameOver,
            Stage::Victory => AppState::Victory,
        }
    }
}
