use std::fs;

use nova_blaster::GameConfig;

#[test]
fn shipped_config_matches_defaults() {
    let raw = fs::read_to_string("assets/config/game.ron").expect("read base config");
    let cfg = GameConfig::from_ron_str(&raw).expect("base config parses");
    assert_eq!(cfg, GameConfig::default());
    let (layered, used, errors) = GameConfig::load_layered(["assets/config/game.ron"]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(used.len(), 1);
    assert_eq!(layered, cfg);
    assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
}

#[test]
fn local_layer_overrides_nested_keys_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("game.ron");
    let local = dir.path().join("game.local.ron");
    fs::write(
        &base,
        "(rules: (points_per_kill: 7, final_level: 3), window: (title: \"Base\"))",
    )
    .expect("write base");
    fs::write(&local, "(rules: (final_level: 2), rng_seed: Some(77))").expect("write local");

    let (cfg, used, errors) = GameConfig::load_layered([&base, &local]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(used.len(), 2);
    assert_eq!(cfg.rules.points_per_kill, 7);
    assert_eq!(cfg.rules.final_level, 2);
    assert_eq!(cfg.rules.points_per_pickup, 10);
    assert_eq!(cfg.window.title, "Base");
    assert_eq!(cfg.rng_seed, Some(77));
}

#[test]
fn broken_layer_is_reported_and_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = dir.path().join("good.ron");
    let bad = dir.path().join("bad.ron");
    fs::write(&good, "(rules: (hostiles_per_level: 2))").expect("write good");
    fs::write(&bad, "(rules: (").expect("write bad");

    let (cfg, used, errors) = GameConfig::load_layered([&good, &bad]);
    assert_eq!(used.len(), 1);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("parse error"));
    assert_eq!(cfg.rules.hostiles_per_level, 2);
}

#[test]
fn nonsense_values_produce_warnings() {
    let mut cfg = GameConfig::default();
    cfg.rules.final_level = 0;
    cfg.window.width = -1.0;
    let warnings = cfg.validate();
    assert!(warnings.len() >= 2, "{warnings:?}");
}
