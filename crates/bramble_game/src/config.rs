//! Tunables for the window, player, projectiles and enemies.
//!
//! Every field has a serde default, so a config file only needs the values it
//! overrides. A missing file is not an error; the game runs on defaults.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub tile_size: u32,
    pub framerate: u32,
    pub background: [u8; 3],
    pub animation_speed: f32,
    pub player: PlayerConfig,
    pub bullet: BulletConfig,
    pub fire: FireConfig,
    pub bee: BeeConfig,
    pub worm: WormConfig,
    pub enemy_death_ms: u64,
    pub seed: u64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    pub gravity: f32,
    /// Vertical velocity set on jump, in pixels per tick (negative is up).
    pub jump_impulse: f32,
    pub shoot_cooldown_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct BulletConfig {
    pub speed: f32,
    /// Horizontal distance from the player's centre to the muzzle.
    pub muzzle_offset: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct FireConfig {
    pub duration_ms: u64,
    pub y_offset: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct BeeConfig {
    pub spawn_interval_ms: u64,
    pub speed: (u32, u32),
    pub amplitude: (u32, u32),
    pub frequency: (u32, u32),
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct WormConfig {
    pub speed: (u32, u32),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            tile_size: 64,
            framerate: 60,
            background: [0xfc, 0xdf, 0xcd],
            animation_speed: 10.0,
            player: PlayerConfig::default(),
            bullet: BulletConfig::default(),
            fire: FireConfig::default(),
            bee: BeeConfig::default(),
            worm: WormConfig::default(),
            enemy_death_ms: 200,
            seed: 0x5eed,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 400.0,
            gravity: 50.0,
            jump_impulse: -20.0,
            shoot_cooldown_ms: 500,
        }
    }
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            speed: 850.0,
            muzzle_offset: 34.0,
        }
    }
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            duration_ms: 100,
            y_offset: 5.0,
        }
    }
}

impl Default for BeeConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 500,
            speed: (300, 500),
            amplitude: (500, 600),
            frequency: (300, 600),
        }
    }
}

impl Default for WormConfig {
    fn default() -> Self {
        Self { speed: (100, 200) }
    }
}

impl GameConfig {
    pub fn window_size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.window_width as f32, self.window_height as f32)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to defaults.
pub fn load_config_or_default(path: &Path) -> Result<GameConfig, String> {
    if !path.exists() {
        log::warn!(
            "Config '{}' not found, using built-in defaults.",
            path.display()
        );
        return Ok(GameConfig::default());
    }
    load_config_from_path(path)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.window_width == 0 || config.window_height == 0 {
        return Err("Config validation failed: window size must be > 0".to_string());
    }
    if config.tile_size == 0 {
        return Err("Config validation failed: tile_size must be > 0".to_string());
    }
    if config.framerate == 0 {
        return Err("Config validation failed: framerate must be > 0".to_string());
    }
    if config.bee.spawn_interval_ms == 0 {
        return Err("Config validation failed: bee.spawn_interval_ms must be > 0".to_string());
    }
    for (name, (lo, hi)) in [
        ("bee.speed", config.bee.speed),
        ("bee.amplitude", config.bee.amplitude),
        ("bee.frequency", config.bee.frequency),
        ("worm.speed", config.worm.speed),
    ] {
        if lo > hi {
            return Err(format!(
                "Config validation failed: {name} range is inverted ({lo} > {hi})"
            ));
        }
    }
    if config.bee.frequency.0 == 0 {
        return Err("Config validation failed: bee.frequency must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "bramble_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "framerate": 30, "player": { "gravity": 40.0 } }"#)
            .expect("write temp file");

        let config = load_config_from_path(&path).expect("partial config should load");
        assert_eq!(config.framerate, 30);
        assert_eq!(config.player.gravity, 40.0);
        assert_eq!(config.player.speed, 400.0);
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.bee.spawn_interval_ms, 500);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let path = temp_file_path("inverted");
        fs::write(&path, r#"{ "bee": { "speed": [500, 300] } }"#).expect("write temp file");

        let err = load_config_from_path(&path).expect_err("inverted range should fail");
        assert!(err.contains("bee.speed range is inverted"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = temp_file_path("missing");
        let config = load_config_or_default(&path).expect("defaults");
        assert_eq!(config.tile_size, 64);
        assert_eq!(config.enemy_death_ms, 200);
    }
}
