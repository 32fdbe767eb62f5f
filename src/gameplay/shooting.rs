use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::components::{Player, Tracked};
use crate::core::config::GameConfig;
use crate::core::progression::{EntityKind, GameEvent};
use crate::core::system::system_order::GameInputSet;

pub struct ShootingPlugin;

impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (fire_on_press, cull_projectiles)
                .in_set(GameInputSet)
                .run_if(in_state(AppState::Playing)),
        );
    }
}

/// One shot per press edge; holding the key does not repeat.
fn fire_on_press(
    keys: Res<ButtonInput<KeyCode>>,
    q_player: Query<&Transform, With<Player>>,
    mut events: EventWriter<GameEvent>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    let Ok(transform) = q_player.single() else {
        return;
    };
    events.write(GameEvent::FireTriggered {
        origin: transform.translation.truncate(),
    });
}

pub fn out_of_bounds(position: Vec2, half_extents: Vec2, margin: f32) -> bool {
    position.x.abs() > half_extents.x + margin || position.y.abs() > half_extents.y + margin
}

fn cull_projectiles(
    cfg: Res<GameConfig>,
    q: Query<(&Tracked, &Transform)>,
    mut events: EventWriter<GameEvent>,
) {
    let half = cfg.arena_half_extents();
    for (tracked, transform) in &q {
        if tracked.kind != EntityKind::Projectile {
            continue;
        }
        if out_of_bounds(transform.translation.truncate(), half, cfg.projectile.cull_margin) {
            events.write(GameEvent::ProjectileLeftBounds {
                projectile: tracked.id,
            });
        }
    }
}
