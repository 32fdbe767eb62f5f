use bevy::prelude::*;

use crate::core::progression::Session;
use crate::gameplay::session::ActiveSession;

#[derive(Resource, Debug)]
pub struct DebugLogState {
    pub frame_counter: u64,
    pub time_accum: f32,
    pub log_interval: f32,
}

impl Default for DebugLogState {
    fn default() -> Self {
        Self {
            frame_counter: 0,
            time_accum: 0.0,
            log_interval: 2.0,
        }
    }
}

/// One-line snapshot of the rules state.
pub fn session_summary(session: &Session) -> String {
    let state = session.state();
    let shield_ms = state
        .invincibility
        .remaining()
        .map_or(0, |d| d.as_millis());
    format!(
        "stage={:?} score={} level={} boss={} hostiles={} pickups={} projectiles={} shield_ms={}",
        session.stage(),
        state.score,
        state.current_level,
        state.boss_active,
        state.hostiles.len(),
        state.pickups.len(),
        state.projectiles.len(),
        shield_ms
    )
}

pub(super) fn debug_logging_system(
    time: Res<Time>,
    mut state: ResMut<DebugLogState>,
    active: Option<Res<ActiveSession>>,
) {
    state.frame_counter += 1;
    state.time_accum += time.delta_secs();
    if state.time_accum < state.log_interval {
        return;
    }
    state.time_accum = 0.0;
    let Some(active) = active else { return };
    info!(
        target: "debug",
        "SIM frame={} t={:.3}s {}",
        state.frame_counter,
        time.elapsed_secs(),
        session_summary(&active.session)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;

    #[test]
    fn summary_reflects_fresh_session() {
        let session = Session::from_config(&GameConfig::default());
        let line = session_summary(&session);
        assert!(line.starts_with("stage=Loading score=0 level=1"));
        assert!(line.ends_with("shield_ms=0"));
    }
}
