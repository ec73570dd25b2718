//! Named sound cues.
//!
//! Playback lives outside the simulation; the game only needs handles that
//! can be triggered once or looped. `LoggedSound` stands in for a real
//! device when running headless.

use std::collections::{HashMap, HashSet};

pub trait SoundHandle {
    fn play(&self);
    fn play_looped(&self);
}

pub const SHOOT: &str = "shoot";
pub const IMPACT: &str = "impact";
pub const MUSIC: &str = "music";

#[derive(Default)]
pub struct SoundBank {
    sounds: HashMap<String, Box<dyn SoundHandle>>,
    warned: HashSet<String>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank with a logging handle for every cue the game triggers.
    pub fn logged() -> Self {
        let mut bank = Self::new();
        for name in [SHOOT, IMPACT, MUSIC] {
            bank.insert(name, Box::new(LoggedSound::new(name)));
        }
        bank
    }

    pub fn insert(&mut self, name: &str, handle: Box<dyn SoundHandle>) {
        self.sounds.insert(name.to_string(), handle);
    }

    pub fn play(&mut self, name: &str) {
        if let Some(handle) = self.lookup(name) {
            handle.play();
        }
    }

    pub fn play_looped(&mut self, name: &str) {
        if let Some(handle) = self.lookup(name) {
            handle.play_looped();
        }
    }

    fn lookup(&mut self, name: &str) -> Option<&dyn SoundHandle> {
        if !self.sounds.contains_key(name) {
            if self.warned.insert(name.to_string()) {
                log::warn!("Sound '{}' is not loaded; cue ignored.", name);
            }
            return None;
        }
        self.sounds.get(name).map(|h| h.as_ref())
    }
}

pub struct LoggedSound {
    name: String,
}

impl LoggedSound {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl SoundHandle for LoggedSound {
    fn play(&self) {
        log::debug!("sound: {}", self.name);
    }

    fn play_looped(&self) {
        log::debug!("sound (looped): {}", self.name);
    }
}
