use std::path::PathBuf;

use anyhow::{bail, Result};
use bevy::prelude::*;
use clap::Parser;

use nova_blaster::interaction::session::config_hot_reload::{
    ConfigReloadSettings, DEFAULT_CONFIG_LAYERS,
};
use nova_blaster::core::config::ConfigOverrides;
use nova_blaster::{GameConfig, GamePlugin};

#[derive(Parser, Debug)]
#[command(author, version, about = "Side-view platformer shooter", long_about = None)]
struct Args {
    /// Config layer (RON). Repeat to stack; later files win. Replaces the default layers.
    #[arg(long = "config", value_name = "PATH")]
    config: Vec<PathBuf>,
    /// Fixed seed for spawn randomness.
    #[arg(long)]
    seed: Option<u64>,
    /// Exit after this many seconds (0 disables).
    #[arg(long, value_name = "SECS")]
    auto_close: Option<f32>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            rng_seed: self.seed,
            auto_close: self.auto_close,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config(args: &Args) -> Result<(GameConfig, Vec<PathBuf>)> {
    // No filesystem on the web; the base layer is embedded.
    const RAW: &str = include_str!("../assets/config/game.ron");
    let mut cfg = GameConfig::from_ron_str(RAW).unwrap_or_else(|e| {
        warn!(target: "config", "embedded config parse failure: {e}; using defaults");
        GameConfig::default()
    });
    args.overrides().apply(&mut cfg);
    for w in cfg.validate() {
        warn!(target: "config", "{w}");
    }
    Ok((cfg, Vec::new()))
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(args: &Args) -> Result<(GameConfig, Vec<PathBuf>)> {
    let layers: Vec<PathBuf> = if args.config.is_empty() {
        DEFAULT_CONFIG_LAYERS.iter().map(PathBuf::from).collect()
    } else {
        for path in &args.config {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
        }
        args.config.clone()
    };
    let present = layers.iter().filter(|p| p.exists());
    let (mut cfg, used, errors) = GameConfig::load_layered(present);
    for e in &errors {
        warn!(target: "config", "{e}");
    }
    if used.is_empty() {
        info!(target: "config", "no config layers found; using defaults");
    } else {
        info!(target: "config", "config layers: {}", used.join(", "));
    }
    args.overrides().apply(&mut cfg);
    for w in cfg.validate() {
        warn!(target: "config", "{w}");
    }
    Ok((cfg, layers))
}

fn main() -> Result<()> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let args = Args::parse();
    let (cfg, layers) = load_config(&args)?;

    let exit = App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ConfigReloadSettings {
            paths: layers,
            ..default()
        })
        .insert_resource(args.overrides())
        .insert_resource(cfg)
        .add_plugins(GamePlugin)
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("game exited with code {code}"),
    }
}
