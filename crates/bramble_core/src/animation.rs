//! Fractional-index frame animation.
//!
//! The index advances by `speed * dt` every tick and is never wrapped in
//! place; reads take `floor(index) mod len`, so the displayed frame is always
//! in range however long the animation runs.

use crate::frame::{mirror_all, SharedFrame};

pub const DEFAULT_ANIMATION_SPEED: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct FrameAnimation {
    frames: Vec<SharedFrame>,
    pub index: f32,
    /// Frames per second. Zero freezes the animation.
    pub speed: f32,
}

impl FrameAnimation {
    pub fn new(frames: Vec<SharedFrame>, speed: f32) -> Result<Self, String> {
        if frames.is_empty() {
            return Err("Animation validation failed: frame sequence is empty".to_string());
        }
        Ok(Self {
            frames,
            index: 0.0,
            speed,
        })
    }

    pub fn advance(&mut self, dt: f32) {
        self.index += self.speed * dt;
    }

    pub fn frame_index(&self) -> usize {
        (self.index.floor() as i64).rem_euclid(self.frames.len() as i64) as usize
    }

    pub fn current(&self) -> &SharedFrame {
        &self.frames[self.frame_index()]
    }

    pub fn frames(&self) -> &[SharedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Mirror every frame in the set, keeping the current index.
    pub fn mirror(&mut self) {
        self.frames = mirror_all(&self.frames);
    }
}
