use bevy::prelude::*;

use crate::app::state::AppState;
use crate::core::progression::Effect;
use crate::core::system::system_order::EffectApplySet;

/// Latest "Score: N | Level: M" line pushed by the session.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Deref)]
pub struct HudText(pub String);

impl Default for HudText {
    fn default() -> Self {
        Self("Score: 0 | Level: 1".into())
    }
}

#[derive(Component)]
struct HudLabel;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudText>()
            .add_systems(OnEnter(AppState::Playing), spawn_hud)
            .add_systems(OnEnter(AppState::Menu), despawn_hud)
            .add_systems(
                Update,
                (apply_hud_effects, sync_hud_label)
                    .chain()
                    .in_set(EffectApplySet),
            );
    }
}

fn spawn_hud(mut commands: Commands, hud: Res<HudText>, q: Query<(), With<HudLabel>>) {
    if !q.is_empty() {
        return;
    }
    commands.spawn((
        HudLabel,
        Text::new(hud.0.clone()),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            top: Val::Px(16.0),
            ..default()
        },
    ));
}

fn despawn_hud(mut commands: Commands, q: Query<Entity, With<HudLabel>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}

fn apply_hud_effects(mut effects: EventReader<Effect>, mut hud: ResMut<HudText>) {
    for effect in effects.read() {
        if let Effect::UpdateHud(line) = effect {
            if hud.0 != *line {
                debug!(target: "hud", "{line}");
                hud.0 = line.clone();
            }
        }
    }
}

fn sync_hud_label(hud: Res<HudText>, mut q: Query<&mut Text, With<HudLabel>>) {
    for mut text in &mut q {
        if text.0 != hud.0 {
            text.0 = hud.0.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[test]
    fn hud_follows_effects() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<AppState>();
        app.add_event::<Effect>();
        app.add_plugins(HudPlugin);
        app.world_mut()
            .send_event(Effect::UpdateHud("Score: 15 | Level: 2".into()));
        app.update();
        assert_eq!(app.world().resource::<HudText>().0, "Score: 15 | Level: 2");
    }
}
