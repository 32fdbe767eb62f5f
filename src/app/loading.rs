use bevy::asset::LoadState;
use bevy::prelude::*;
use std::collections::HashMap;

use super::state::AppState;
use crate::core::progression::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Background,
    Ground,
    /// 9-frame 32x32 sprite sheet for Nova.
    Player,
    Laser,
    Hostile,
    Boss,
    Pickup,
}

impl AssetKey {
    pub const ALL: [AssetKey; 7] = [
        AssetKey::Background,
        AssetKey::Ground,
        AssetKey::Player,
        AssetKey::Laser,
        AssetKey::Hostile,
        AssetKey::Boss,
        AssetKey::Pickup,
    ];

    pub fn path(self) -> &'static str {
        match self {
            AssetKey::Background => "sprites/background.png",
            AssetKey::Ground => "sprites/ground.png",
            AssetKey::Player => "sprites/nova.png",
            AssetKey::Laser => "sprites/laser.png",
            AssetKey::Hostile => "sprites/latency_blob.png",
            AssetKey::Boss => "sprites/mainframe.png",
            AssetKey::Pickup => "sprites/ai_shield.png",
        }
    }
}

/// Image handles by key. Entries whose load failed stay in `failed` and render as flat colour.
#[derive(Resource, Debug, Default)]
pub struct AssetRegistry {
    pending: HashMap<AssetKey, Handle<Image>>,
    loaded: HashMap<AssetKey, Handle<Image>>,
    failed: Vec<AssetKey>,
    pub player_layout: Option<Handle<TextureAtlasLayout>>,
}

impl AssetRegistry {
    pub fn image(&self, key: AssetKey) -> Option<Handle<Image>> {
        self.loaded.get(&key).cloned()
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Image sprite sized to `size`, or a flat `fallback` quad when the image is unavailable.
    pub fn sprite(&self, key: AssetKey, fallback: Color, size: Vec2) -> Sprite {
        match self.image(key) {
            Some(image) => Sprite {
                image,
                custom_size: Some(size),
                ..default()
            },
            None => Sprite::from_color(fallback, size),
        }
    }
}

/// Registry population during `AppState::Loading`; emits `GameEvent::AssetsLoaded` once settled.
pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AssetRegistry>()
            .add_systems(OnEnter(AppState::Loading), begin_loading)
            .add_systems(
                Update,
                poll_loading.run_if(in_state(AppState::Loading)),
            );
    }
}

fn begin_loading(
    asset_server: Res<AssetServer>,
    mut registry: ResMut<AssetRegistry>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    info!(target: "loading", "loading {} sprites", AssetKey::ALL.len());
    for key in AssetKey::ALL {
        registry.pending.insert(key, asset_server.load(key.path()));
    }
    let layout = TextureAtlasLayout::from_grid(UVec2::splat(32), 9, 1, None, None);
    registry.player_layout = Some(layouts.add(layout));
}

fn poll_loading(
    asset_server: Res<AssetServer>,
    mut registry: ResMut<AssetRegistry>,
    mut events: EventWriter<GameEvent>,
    mut signalled: Local<bool>,
) {
    if *signalled {
        return;
    }
    let keys: Vec<AssetKey> = registry.pending.keys().copied().collect();
    for key in keys {
        let Some(handle) = registry.pending.get(&key) else { continue };
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => {
                if let Some(handle) = registry.pending.remove(&key) {
                    registry.loaded.insert(key, handle);
                }
            }
            Some(LoadState::Failed(err)) => {
                warn!(target: "loading", "{} failed to load ({err}); using flat colour", key.path());
                registry.pending.remove(&key);
                registry.failed.push(key);
            }
            _ => {}
        }
    }
    if registry.is_settled() {
        info!(
            target: "loading",
            "asset registry ready: {} loaded, {} missing",
            registry.loaded.len(),
            registry.failed.len()
        );
        *signalled = true;
        events.write(GameEvent::AssetsLoaded);
    }
}
