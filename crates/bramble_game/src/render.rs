//! Render composition.
//!
//! Every entity in the `All` group is drawn in creation order at
//! `top_left + camera offset`. Targets only need to clear and blit; the
//! software `Canvas` composites into an RGBA image for headless snapshots.

use std::path::Path;

use bramble_core::frame::Frame;
use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::entity::Group;
use crate::world::World;

pub trait RenderTarget {
    fn clear(&mut self, rgb: [u8; 3]);
    fn blit(&mut self, frame: &Frame, screen_pos: Vec2);
}

pub fn render_world(world: &World, target: &mut dyn RenderTarget) {
    target.clear(world.config().background);
    let camera = world.camera();
    for (_, entity) in world.arena().iter_group(Group::All) {
        target.blit(entity.body.visual(), camera.to_screen(entity.body.rect.top_left()));
    }
}

pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    #[allow(dead_code)]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn save_png(&self, path: &Path) -> Result<(), String> {
        self.pixels
            .save(path)
            .map_err(|e| format!("Failed to write snapshot {}: {e}", path.display()))
    }
}

impl RenderTarget for Canvas {
    fn clear(&mut self, rgb: [u8; 3]) {
        let fill = Rgba([rgb[0], rgb[1], rgb[2], 255]);
        for px in self.pixels.pixels_mut() {
            *px = fill;
        }
    }

    fn blit(&mut self, frame: &Frame, screen_pos: Vec2) {
        let ox = screen_pos.x.floor() as i64;
        let oy = screen_pos.y.floor() as i64;
        let (cw, ch) = (self.pixels.width() as i64, self.pixels.height() as i64);
        let (fw, fh) = (frame.width() as i64, frame.height() as i64);
        if ox >= cw || oy >= ch || ox + fw <= 0 || oy + fh <= 0 {
            return;
        }

        let src = frame.image();
        for sy in 0.max(-oy)..fh.min(ch - oy) {
            for sx in 0.max(-ox)..fw.min(cw - ox) {
                let s = src.get_pixel(sx as u32, sy as u32);
                let d = self
                    .pixels
                    .get_pixel_mut((ox + sx) as u32, (oy + sy) as u32);
                *d = blend(*d, *s);
            }
        }
    }
}

/// Source-over blend onto an opaque destination.
fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = src.0[3] as u32;
    if a == 255 {
        return Rgba([src.0[0], src.0[1], src.0[2], 255]);
    }
    if a == 0 {
        return dst;
    }
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
    Rgba([
        mix(src.0[0], dst.0[0]),
        mix(src.0[1], dst.0[1]),
        mix(src.0[2], dst.0[2]),
        255,
    ])
}
