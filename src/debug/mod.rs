//! Debug module: periodic session summary logging.
//! Built only when compiled with `--features debug`.

#[cfg(feature = "debug")]
mod logging;

#[cfg(feature = "debug")]
pub use logging::{session_summary, DebugLogState};

use bevy::prelude::*;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, _app: &mut App) {
        #[cfg(feature = "debug")]
        {
            _app.init_resource::<DebugLogState>()
                .add_systems(Update, logging::debug_logging_system);
        }
    }
}
