//! Decoded sprite images paired with their collision masks.
//!
//! Frames are immutable and shared through `Arc`, so an animation set can be
//! handed to many enemies without copying pixel data. Variants that need a
//! mirrored or recoloured image build a new frame instead of mutating.

use std::sync::Arc;

use glam::Vec2;
use image::{imageops, RgbaImage};

use crate::mask::Mask;

pub type SharedFrame = Arc<Frame>;

#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbaImage,
    mask: Mask,
}

impl Frame {
    pub fn new(image: RgbaImage) -> Self {
        let mask = Mask::from_image(&image);
        Self { image, mask }
    }

    pub fn shared(image: RgbaImage) -> SharedFrame {
        Arc::new(Self::new(image))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32)
    }

    /// Horizontally mirrored copy.
    pub fn mirrored(&self) -> Frame {
        Frame::new(imageops::flip_horizontal(&self.image))
    }

    /// Flat white silhouette of the solid pixels, used for the dying flash.
    pub fn silhouette(&self) -> Frame {
        Frame::new(self.mask.to_silhouette())
    }
}

pub fn mirror_all(frames: &[SharedFrame]) -> Vec<SharedFrame> {
    frames.iter().map(|f| Arc::new(f.mirrored())).collect()
}
