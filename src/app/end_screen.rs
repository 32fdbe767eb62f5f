use bevy::prelude::*;
use bevy::ui::{AlignItems, FlexDirection, JustifyContent, Node};

use super::state::AppState;
use crate::core::progression::GameEvent;

/// GameOver / Victory banners and the restart / main-menu triggers.
pub struct EndScreenPlugin;

impl Plugin for EndScreenPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::GameOver), spawn_game_over_banner)
            .add_systems(OnEnter(AppState::Victory), spawn_victory_banner)
            .add_systems(
                Update,
                handle_end_input
                    .run_if(in_state(AppState::GameOver).or(in_state(AppState::Victory))),
            )
            .add_systems(OnExit(AppState::GameOver), despawn_banner)
            .add_systems(OnExit(AppState::Victory), despawn_banner);
    }
}

const HINT: &str = "R : Restart    M / Esc : Main menu";

#[derive(Component)]
struct EndBanner;

fn spawn_banner(commands: &mut Commands, title: &str, color: Color) {
    commands
        .spawn((
            EndBanner,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
        ))
        .with_children(|p| {
            p.spawn((
                Text::new(title),
                TextFont {
                    font_size: 40.0,
                    ..default()
                },
                TextColor(color),
            ));
            p.spawn((
                Text::new(HINT),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn spawn_game_over_banner(mut commands: Commands) {
    spawn_banner(&mut commands, "Game Over! Try Again.", Color::srgb(1.0, 0.0, 0.0));
}

fn spawn_victory_banner(mut commands: Commands) {
    spawn_banner(
        &mut commands,
        "Victory! Credit Unions Upgraded!",
        Color::srgb(0.0, 1.0, 0.0),
    );
}

fn handle_end_input(keys: Res<ButtonInput<KeyCode>>, mut events: EventWriter<GameEvent>) {
    if keys.just_pressed(KeyCode::KeyR) {
        events.write(GameEvent::RestartRequested);
    } else if keys.any_just_pressed([KeyCode::KeyM, KeyCode::Escape]) {
        events.write(GameEvent::MainMenuRequested);
    }
}

fn despawn_banner(mut commands: Commands, q: Query<Entity, With<EndBanner>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
