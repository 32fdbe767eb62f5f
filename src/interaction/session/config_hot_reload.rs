use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::config::{ConfigOverrides, GameConfig};
use crate::gameplay::session::ActiveSession;

pub const DEFAULT_CONFIG_LAYERS: [&str; 2] =
    ["assets/config/game.ron", "assets/config/game.local.ron"];

#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}

impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: DEFAULT_CONFIG_LAYERS.iter().map(PathBuf::from).collect(),
            interval_secs: 0.5,
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}

impl ConfigReloadState {
    /// Starts from the layers' current mtimes so only later edits count as changes.
    fn seeded(settings: &ConfigReloadSettings) -> Self {
        let mut state = Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(settings.interval_secs.max(0.05), TimerMode::Repeating),
        };
        any_layer_changed(settings, &mut state);
        state
    }
}

impl FromWorld for ConfigReloadState {
    fn from_world(world: &mut World) -> Self {
        let settings = world
            .get_resource::<ConfigReloadSettings>()
            .cloned()
            .unwrap_or_default();
        Self::seeded(&settings)
    }
}

pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Update, poll_and_reload_config);
        }
    }
}

/// True when any watched file is newer than the last time it was seen.
fn any_layer_changed(settings: &ConfigReloadSettings, state: &mut ConfigReloadState) -> bool {
    let mut dirty = false;
    for path in &settings.paths {
        let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) else {
            continue;
        };
        let seen = state
            .last_mod
            .entry(path.clone())
            .or_insert(SystemTime::UNIX_EPOCH);
        if modified > *seen {
            *seen = modified;
            dirty = true;
        }
    }
    dirty
}

/// Layered files as they are now, with the command-line overrides put back on top.
fn reloaded_config(
    settings: &ConfigReloadSettings,
    overrides: Option<&ConfigOverrides>,
) -> GameConfig {
    let present = settings.paths.iter().filter(|p| p.exists());
    let (mut cfg, _used, errors) = GameConfig::load_layered(present);
    for e in errors {
        warn!(target: "config", "CONFIG HOT-RELOAD issue: {e}");
    }
    if let Some(overrides) = overrides {
        overrides.apply(&mut cfg);
    }
    cfg
}

fn poll_and_reload_config(
    time: Res<Time<Real>>,
    settings: Res<ConfigReloadSettings>,
    overrides: Option<Res<ConfigOverrides>>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<GameConfig>,
    mut active: Option<ResMut<ActiveSession>>,
    mut windows: Query<&mut Window>,
) {
    if !state.timer.tick(time.delta()).finished() {
        return;
    }
    if !any_layer_changed(&settings, &mut state) {
        return;
    }
    let new_cfg = reloaded_config(&settings, overrides.as_deref());
    if *cfg_res == new_cfg {
        return;
    }
    for w in new_cfg.validate() {
        warn!(target: "config", "{w}");
    }
    info!(target: "config", "Config hot-reload applied");
    if let Ok(mut window) = windows.single_mut() {
        if window.width() != new_cfg.window.width || window.height() != new_cfg.window.height {
            window
                .resolution
                .set(new_cfg.window.width, new_cfg.window.height);
        }
        if window.title != new_cfg.window.title {
            window.title = new_cfg.window.title.clone();
        }
    }
    if let Some(active) = active.as_deref_mut() {
        active.session.reconfigure(&new_cfg);
    }
    *cfg_res = new_cfg;
}
