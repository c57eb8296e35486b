//! Configuration Tests
//!
//! Tests for:
//! - Serde defaults for every section
//! - Partial overrides
//! - Error reporting for malformed input and missing files

use anyhow::Result;
use glam::Vec3;

use vignette::config::VignetteConfig;
use vignette::VignetteError;

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn empty_object_yields_defaults() -> Result<()> {
    let config = VignetteConfig::from_json_str("{}")?;
    assert_eq!(config, VignetteConfig::default());
    Ok(())
}

#[test]
fn stock_timings() {
    let config = VignetteConfig::default();
    assert!((config.sequence.launch_offset_secs - 0.8).abs() < 1e-6);
    assert!((config.sequence.nominal_end_secs - 3.0).abs() < 1e-6);
    assert!((config.sequence.fade_secs - 0.3).abs() < 1e-6);
    assert!((config.ball.flight_secs - 1.0).abs() < 1e-6);
}

#[test]
fn actors_spawn_facing_each_other() {
    let config = VignetteConfig::default();
    assert!(config.kicker.spawn_position.z > config.keeper.spawn_position.z);
    assert!((config.kicker.spawn_yaw - config.keeper.spawn_yaw).abs() > 1.0);
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn partial_override_keeps_other_fields() -> Result<()> {
    let json = r#"{
        "sequence": { "fade_secs": 0.5 },
        "ball": { "target_position": [2.0, 0.11, -6.0] },
        "keeper": { "hold_clips": [2, 3] }
    }"#;
    let config = VignetteConfig::from_json_str(json)?;
    let defaults = VignetteConfig::default();

    assert!((config.sequence.fade_secs - 0.5).abs() < 1e-6);
    assert_eq!(config.sequence.launch_offset_secs, defaults.sequence.launch_offset_secs);
    assert_eq!(config.ball.target_position, Vec3::new(2.0, 0.11, -6.0));
    assert_eq!(config.ball.spawn_position, defaults.ball.spawn_position);
    assert_eq!(config.keeper.hold_clips, vec![2, 3]);
    assert_eq!(config.keeper.anchor_joint, "Hips");
    Ok(())
}

#[test]
fn intent_rule_override() -> Result<()> {
    let json = r#"{ "kicker": { "intents": { "strike": { "keywords": ["volley"], "fallback_index": 3 } } } }"#;
    let config = VignetteConfig::from_json_str(json)?;
    assert_eq!(config.kicker.intents.strike.keywords, vec!["volley".to_string()]);
    assert_eq!(config.kicker.intents.strike.fallback_index, 3);
    assert_eq!(config.kicker.intents.idle.fallback_index, 0);
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn malformed_json_is_a_config_error() {
    let err = VignetteConfig::from_json_str("{ \"sequence\": ").unwrap_err();
    assert!(matches!(err, VignetteError::Config(_)));
}

#[test]
fn missing_file_is_io_error_and_falls_back() {
    let path = std::env::temp_dir().join("vignette-config-that-does-not-exist.json");
    let err = VignetteConfig::load(&path).unwrap_err();
    assert!(matches!(err, VignetteError::Io(_)));
    assert_eq!(VignetteConfig::load_or_default(&path), VignetteConfig::default());
}

#[test]
fn load_reads_file() -> Result<()> {
    let path = std::env::temp_dir().join(format!("vignette-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "camera": { "fov": 35.0 } }"#)?;
    let config = VignetteConfig::load(&path)?;
    std::fs::remove_file(&path)?;
    assert!((config.camera.fov - 35.0).abs() < 1e-6);
    Ok(())
}
