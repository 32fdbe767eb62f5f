use bevy::prelude::*;

use crate::app::end_screen::EndScreenPlugin;
use crate::app::loading::LoadingPlugin;
use crate::app::menu::MenuPlugin;
use crate::debug::DebugPlugin;
use crate::gameplay::collisions::CollisionEventsPlugin;
use crate::gameplay::hud::HudPlugin;
use crate::gameplay::player::PlayerPlugin;
use crate::gameplay::session::SessionPlugin;
use crate::gameplay::shooting::ShootingPlugin;
use crate::gameplay::spawn::EntitySpawnPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::rapier_physics::PhysicsSetupPlugin;

/// Everything the game needs on top of `DefaultPlugins` and a `GameConfig` resource.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_plugins((
            SessionPlugin,
            LoadingPlugin,
            MenuPlugin,
            EndScreenPlugin,
            PhysicsSetupPlugin,
            EntitySpawnPlugin,
            PlayerPlugin,
            ShootingPlugin,
            CollisionEventsPlugin,
            HudPlugin,
            DebugPlugin,
            ConfigHotReloadPlugin,
            AutoClosePlugin,
        ));
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
