use std::path::PathBuf;

use glam::Vec2;
use isorts::config::GameConfig;
use isorts::error::ConfigError;
use isorts::window::*;

// ── WindowConfig ──────────────────────────────────────────────────────────────

#[test]
fn default_window_is_1280x720_windowed() {
    let cfg = WindowConfig::default();
    assert_eq!(cfg.width, 1280);
    assert_eq!(cfg.height, 720);
    assert_eq!(cfg.mode, WindowMode::Windowed);
    assert_eq!(cfg.title, "isorts");
}

#[test]
fn aspect_ratio_1280x720() {
    let ratio = WindowConfig::default().aspect_ratio();
    assert!((ratio - 16.0 / 9.0).abs() < 1e-5, "expected 16/9, got {ratio}");
}

#[test]
fn aspect_ratio_zero_height_returns_zero() {
    let cfg = WindowConfig { width: 1920, height: 0, ..WindowConfig::default() };
    assert_eq!(cfg.aspect_ratio(), 0.0);
}

#[test]
fn aspect_ratio_4x3() {
    let cfg = WindowConfig { width: 800, height: 600, mode: WindowMode::Borderless, ..WindowConfig::default() };
    assert!((cfg.aspect_ratio() - 4.0 / 3.0).abs() < 1e-5);
}

// ── GameConfig ────────────────────────────────────────────────────────────────

#[test]
fn empty_object_is_all_defaults() {
    assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default());
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let cfg = GameConfig::from_json(r#"{ "window": { "width": 1600, "height": 900 }, "map_size": 24 }"#)
        .unwrap();
    assert_eq!((cfg.window.width, cfg.window.height), (1600, 900));
    assert_eq!(cfg.window.title, "isorts");
    assert_eq!(cfg.map_size, 24);
    assert_eq!(cfg.asset_dir, PathBuf::from("assets"));
    assert_eq!(cfg.scroll_speed, 500.0);
    assert_eq!(cfg.target_ups, 60);
    assert_eq!(cfg.screen_size(), Vec2::new(1600.0, 900.0));
}

#[test]
fn window_mode_is_lowercase() {
    let cfg = GameConfig::from_json(r#"{ "window": { "mode": "borderless" } }"#).unwrap();
    assert_eq!(cfg.window.mode, WindowMode::Borderless);
    assert!(GameConfig::from_json(r#"{ "window": { "mode": "Borderless" } }"#).is_err());
}

#[test]
fn malformed_json_is_an_error() {
    assert!(GameConfig::from_json("{ map_size: 3 }").is_err());
    assert!(GameConfig::from_json(r#"{ "map_size": "big" }"#).is_err());
}

#[test]
fn missing_file_reports_its_path() {
    let path = PathBuf::from("definitely/not/here/isorts.json");
    match GameConfig::load(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn explicit_config_flag_must_exist() {
    let args = vec!["--config".to_string(), "definitely/not/here.json".to_string()];
    assert!(GameConfig::from_args(&args).is_err());
}

#[test]
fn load_reads_file_from_disk() {
    let path = std::env::temp_dir().join(format!("isorts-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "scroll_speed": 250.0 }"#).unwrap();
    let cfg = GameConfig::load(&path);
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.unwrap().scroll_speed, 250.0);
}
