use bevy::prelude::*;
use bevy::ui::{AlignItems, FlexDirection, JustifyContent, Node};

use super::state::AppState;
use crate::core::progression::GameEvent;

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app
            // Log + UI spawn on enter
            .add_systems(OnEnter(AppState::Menu), (show_menu_instructions, spawn_menu_ui))
            .add_systems(Update, handle_menu_input.run_if(in_state(AppState::Menu)))
            // Cleanup UI on exit
            .add_systems(OnExit(AppState::Menu), despawn_menu_ui);
    }
}

const MENU_TEXT: &str = "NOVA BLASTER\n\nEnter / P : Play\nEsc : Exit";

fn show_menu_instructions() {
    info!(target: "menu", "=== MAIN MENU ===");
    info!(target: "menu", "Press Enter or P to play, Esc to exit.");
}

fn handle_menu_input(keys: Res<ButtonInput<KeyCode>>, mut events: EventWriter<GameEvent>) {
    if keys.any_just_pressed([KeyCode::Enter, KeyCode::KeyP]) {
        info!(target: "menu", "Play selected");
        events.write(GameEvent::PlayRequested);
    } else if keys.just_pressed(KeyCode::Escape) {
        info!(target: "menu", "Exit selected");
        events.write(GameEvent::ExitRequested);
    }
}

// === UI IMPLEMENTATION ===

#[derive(Component)]
struct MenuUiRoot;

fn spawn_menu_ui(mut commands: Commands) {
    commands
        .spawn((
            MenuUiRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.02, 0.02, 0.05, 0.85)),
        ))
        .with_children(|p| {
            p.spawn((
                Text::new(MENU_TEXT),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                TextLayout::new_with_justify(JustifyText::Center),
            ));
        });
}

fn despawn_menu_ui(mut commands: Commands, q_root: Query<Entity, With<MenuUiRoot>>) {
    for e in &q_root {
        commands.entity(e).despawn();
    }
}
