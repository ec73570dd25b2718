//! Keyboard state with both held and edge-triggered queries.
//!
//! - **Held:** `is_held(key)` is true every tick the key is down. Movement,
//!   jumping and firing all read held state; the shoot cooldown and the
//!   on-floor gate keep them from repeating every tick.
//!
//! - **Edge-triggered:** `is_just_pressed` / `is_just_released` are true only
//!   for the tick the transition happened and are cleared by `end_frame()`.

use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Space,
    S,
    Escape,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State with exactly `keys` held, as if they were all pressed this tick.
    pub fn with_held(keys: &[Key]) -> Self {
        let mut input = Self::new();
        for &key in keys {
            input.key_down(key);
        }
        input
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Replace the held set, recording transitions against the previous one.
    pub fn set_held(&mut self, keys: &[Key]) {
        let released: Vec<Key> = self
            .held
            .iter()
            .copied()
            .filter(|k| !keys.contains(k))
            .collect();
        for key in released {
            self.key_up(key);
        }
        for &key in keys {
            self.key_down(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Discrete axis from two held keys: -1, 0 or +1.
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        (self.is_held(positive) as i32 - self.is_held(negative) as i32) as f32
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}
