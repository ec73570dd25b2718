//! Scripted keyboard input.
//!
//! A replay is a list of held-key sets, each repeated for some number of
//! fixed ticks. It drives headless runs and keeps simulation tests
//! deterministic.

use bramble_core::input::Key;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayFrame {
    pub fn new(held: &[Key], repeat: u32) -> Self {
        Self {
            held: held.to_vec(),
            repeat,
        }
    }
}

impl ReplaySequence {
    /// One held-key set per tick.
    pub fn expanded_inputs(&self) -> Vec<Vec<Key>> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.held.clone());
            }
        }
        out
    }

    pub fn tick_count(&self) -> usize {
        self.frames.iter().map(|f| f.repeat.max(1) as usize).sum()
    }

    /// Built-in run used when no replay file is available: walk right,
    /// hop, shoot at whatever is ahead, then turn back.
    pub fn demo() -> Self {
        Self {
            fixed_dt: default_dt(),
            frames: vec![
                ReplayFrame::new(&[], 30),
                ReplayFrame::new(&[Key::Right], 90),
                ReplayFrame::new(&[Key::Right, Key::Space], 1),
                ReplayFrame::new(&[Key::Right], 60),
                ReplayFrame::new(&[Key::S], 90),
                ReplayFrame::new(&[Key::Left, Key::S], 60),
                ReplayFrame::new(&[Key::Left, Key::Space], 1),
                ReplayFrame::new(&[Key::Left], 60),
                ReplayFrame::new(&[], 30),
                ReplayFrame::new(&[Key::Escape], 1),
            ],
        }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::audio::SoundBank;
    use crate::config::GameConfig;
    use crate::level::LevelMap;
    use crate::world::World;
    use bramble_core::input::InputState;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "bramble_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "held": ["right"], "repeat": 3 },
                { "held": ["right", "space"] },
                { "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 6);
        assert_eq!(replay.tick_count(), 6);
        assert_eq!(expanded[3], vec![Key::Right, Key::Space]);
        assert!(expanded[5].is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_or_zero_dt_replay_is_rejected() {
        let path = temp_file_path("invalid");
        fs::write(&path, r#"{ "fixed_dt": 0.0, "frames": [ {} ] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("zero dt");
        assert!(err.contains("fixed_dt"), "{err}");

        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("no frames");
        assert!(err.contains("empty"), "{err}");

        fs::write(&path, r#"{ "frames": [ { "held": ["jump"] } ] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("unknown key");
        assert!(err.contains("Failed to parse"), "{err}");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = ReplaySequence::demo();
        let run = || {
            let mut world = World::from_level(
                GameConfig::default(),
                &LevelMap::demo(),
                &MemoryAssets::placeholder(64),
                SoundBank::new(),
            )
            .expect("world");
            let mut input = InputState::new();
            for held in replay.expanded_inputs() {
                input.set_held(&held);
                if !world.tick(replay.fixed_dt, &input) {
                    break;
                }
                input.end_frame();
            }
            let (body, player) = world.player().expect("player");
            (body.rect, player.velocity, world.stats(), world.arena().len())
        };

        assert_eq!(run(), run());
    }
}
