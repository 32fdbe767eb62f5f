use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::app::loading::{AssetKey, AssetRegistry};
use crate::app::state::AppState;
use crate::core::components::{Facing, GroundContacts, Player, PlayerAnimation};
use crate::core::config::GameConfig;
use crate::core::progression::{Effect, PlayerTint};
use crate::core::system::system_order::{EffectApplySet, GameInputSet};

/// Sheet layout: 0..=3 run left, 4 idle, 5..=8 run right.
const LEFT_FRAMES: [usize; 4] = [0, 1, 2, 3];
const IDLE_FRAME: usize = 4;
const RIGHT_FRAMES: [usize; 4] = [5, 6, 7, 8];

const BASE_TINT: Color = Color::WHITE;
const FALLBACK_COLOR: Color = Color::srgb(0.95, 0.75, 0.3);

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Playing), spawn_or_reset_player)
            .add_systems(OnEnter(AppState::Menu), despawn_player)
            .add_systems(
                Update,
                (player_movement, animate_player)
                    .chain()
                    .in_set(GameInputSet)
                    .run_if(in_state(AppState::Playing)),
            )
            .add_systems(Update, apply_player_tint.in_set(EffectApplySet));
    }
}

pub fn tint_color(tint: PlayerTint, sheet: bool) -> Color {
    match tint {
        PlayerTint::Shielded => Color::srgb(0.0, 1.0, 0.0),
        PlayerTint::Defeated => Color::srgb(1.0, 0.0, 0.0),
        PlayerTint::Normal if sheet => BASE_TINT,
        PlayerTint::Normal => FALLBACK_COLOR,
    }
}

fn player_sprite(cfg: &GameConfig, registry: Option<&AssetRegistry>) -> Sprite {
    let size = cfg.player.half_extents.as_vec2() * 2.0;
    let sheet = registry.and_then(|r| Some((r.image(AssetKey::Player)?, r.player_layout.clone()?)));
    match sheet {
        Some((image, layout)) => Sprite {
            image,
            custom_size: Some(size),
            texture_atlas: Some(TextureAtlas {
                layout,
                index: IDLE_FRAME,
            }),
            ..default()
        },
        None => Sprite::from_color(FALLBACK_COLOR, size),
    }
}

fn spawn_or_reset_player(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    registry: Option<Res<AssetRegistry>>,
    mut q: Query<(&mut Transform, &mut Velocity, &mut GroundContacts, &mut Sprite), With<Player>>,
) {
    let spawn = cfg.player.spawn.as_vec2();
    if let Ok((mut transform, mut velocity, mut contacts, mut sprite)) = q.single_mut() {
        transform.translation = spawn.extend(2.0);
        *velocity = Velocity::zero();
        // Contacts with the old position end on the next physics step.
        contacts.0 = 0;
        let sheet = sprite.texture_atlas.is_some();
        sprite.color = tint_color(PlayerTint::Normal, sheet);
        return;
    }
    let he = cfg.player.half_extents;
    commands.spawn((
        Player,
        GroundContacts::default(),
        PlayerAnimation::default(),
        player_sprite(&cfg, registry.as_deref()),
        Transform::from_translation(spawn.extend(2.0)),
        RigidBody::Dynamic,
        Collider::cuboid(he.x, he.y),
        Velocity::zero(),
        LockedAxes::ROTATION_LOCKED,
        Restitution::coefficient(cfg.physics.player_restitution),
        ActiveEvents::COLLISION_EVENTS,
    ));
    info!(target: "player", "player spawned at {spawn}");
}

fn despawn_player(mut commands: Commands, q: Query<Entity, With<Player>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}

fn player_movement(
    keys: Res<ButtonInput<KeyCode>>,
    cfg: Res<GameConfig>,
    mut q: Query<(&mut Velocity, &GroundContacts, &mut PlayerAnimation), With<Player>>,
) {
    let Ok((mut velocity, contacts, mut anim)) = q.single_mut() else {
        return;
    };
    let left = keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]);
    let right = keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]);
    let facing = if left {
        Facing::Left
    } else if right {
        Facing::Right
    } else {
        Facing::Idle
    };
    velocity.linvel.x = match facing {
        Facing::Left => -cfg.player.run_speed,
        Facing::Right => cfg.player.run_speed,
        Facing::Idle => 0.0,
    };
    if keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]) && contacts.0 > 0 {
        velocity.linvel.y = cfg.player.jump_speed;
    }
    if anim.facing != facing {
        anim.facing = facing;
        anim.frame = 0;
        anim.timer.reset();
    }
}

fn frame_for(facing: Facing, frame: usize) -> usize {
    match facing {
        Facing::Left => LEFT_FRAMES[frame % LEFT_FRAMES.len()],
        Facing::Right => RIGHT_FRAMES[frame % RIGHT_FRAMES.len()],
        Facing::Idle => IDLE_FRAME,
    }
}

fn animate_player(time: Res<Time>, mut q: Query<(&mut PlayerAnimation, &mut Sprite), With<Player>>) {
    for (mut anim, mut sprite) in &mut q {
        let Some(atlas) = sprite.texture_atlas.as_mut() else {
            continue;
        };
        if anim.timer.tick(time.delta()).just_finished() {
            anim.frame = anim.frame.wrapping_add(1);
        }
        atlas.index = frame_for(anim.facing, anim.frame);
    }
}

fn apply_player_tint(mut effects: EventReader<Effect>, mut q: Query<&mut Sprite, With<Player>>) {
    for effect in effects.read() {
        let Effect::PlayerTint(tint) = effect else {
            continue;
        };
        for mut sprite in &mut q {
            let sheet = sprite.texture_atlas.is_some();
            sprite.color = tint_color(*tint, sheet);
        }
    }
}
