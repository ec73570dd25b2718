//! Decoded sprite sources.
//!
//! The simulation only asks for two shapes: an ordered frame sequence for a
//! named folder and a single image for a named file. `DiskAssets` decodes
//! PNGs with `image`; `MemoryAssets` holds pre-built frames for tests and for
//! running without an art directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use bramble_core::frame::{Frame, SharedFrame};
use image::{Rgba, RgbaImage};

pub trait AssetSource {
    /// Frames of `folder`, in playback order. Never empty on success.
    fn frames(&self, folder: &str) -> Result<Vec<SharedFrame>, String>;
    fn image(&self, name: &str) -> Result<SharedFrame, String>;
}

pub struct DiskAssets {
    root: PathBuf,
}

impl DiskAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DiskAssets {
    fn frames(&self, folder: &str) -> Result<Vec<SharedFrame>, String> {
        let dir = self.root.join(folder);
        let entries = fs::read_dir(&dir)
            .map_err(|e| format!("Failed to read frame folder {}: {e}", dir.display()))?;

        let mut numbered = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| format!("Failed to list frame folder {}: {e}", dir.display()))?
                .path();
            if !path.is_file() {
                continue;
            }
            let order = frame_number(&path).ok_or_else(|| {
                format!(
                    "Frame validation failed: '{}' is not named by frame number",
                    path.display()
                )
            })?;
            numbered.push((order, path));
        }
        numbered.sort_by_key(|(order, _)| *order);

        if numbered.is_empty() {
            return Err(format!(
                "Frame validation failed: folder {} has no frames",
                dir.display()
            ));
        }

        numbered
            .iter()
            .map(|(_, path)| decode_frame(path))
            .collect()
    }

    fn image(&self, name: &str) -> Result<SharedFrame, String> {
        decode_frame(&self.root.join(format!("{name}.png")))
    }
}

fn frame_number(path: &Path) -> Option<u32> {
    path.file_stem()?.to_str()?.parse().ok()
}

fn decode_frame(path: &Path) -> Result<SharedFrame, String> {
    let image = image::open(path)
        .map_err(|e| format!("Failed to decode image {}: {e}", path.display()))?
        .to_rgba8();
    Ok(Frame::shared(image))
}

#[derive(Default)]
pub struct MemoryAssets {
    folders: HashMap<String, Vec<SharedFrame>>,
    images: HashMap<String, SharedFrame>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_frames(&mut self, folder: &str, frames: Vec<SharedFrame>) {
        self.folders.insert(folder.to_string(), frames);
    }

    pub fn insert_image(&mut self, name: &str, frame: SharedFrame) {
        self.images.insert(name.to_string(), frame);
    }

    /// Flat coloured boxes for every sprite the game asks for.
    pub fn placeholder(tile_size: u32) -> Self {
        let mut assets = Self::new();
        let t = tile_size.max(4);
        assets.insert_frames(
            "player",
            vec![
                solid(t / 2, t, [60, 90, 200, 255]),
                solid(t / 2, t, [80, 110, 220, 255]),
            ],
        );
        assets.insert_frames(
            "bee",
            vec![
                solid(t / 2, t / 2, [240, 200, 40, 255]),
                solid(t / 2, t / 2, [250, 220, 80, 255]),
            ],
        );
        assets.insert_frames(
            "worm",
            vec![
                solid(t / 2, t / 4, [200, 80, 160, 255]),
                solid(t / 2, t / 4, [220, 100, 180, 255]),
            ],
        );
        assets.insert_image("bullet", solid(t / 4, t / 8, [30, 30, 30, 255]));
        assets.insert_image("fire", solid(t / 4, t / 4, [250, 120, 20, 255]));
        assets.insert_image("ground", solid(t, t, [90, 140, 70, 255]));
        assets.insert_image("flower", solid(t, t, [240, 160, 190, 128]));
        assets
    }
}

impl AssetSource for MemoryAssets {
    fn frames(&self, folder: &str) -> Result<Vec<SharedFrame>, String> {
        match self.folders.get(folder) {
            Some(frames) if !frames.is_empty() => Ok(frames.clone()),
            Some(_) => Err(format!(
                "Frame validation failed: folder '{folder}' has no frames"
            )),
            None => Err(format!("Unknown frame folder '{folder}'")),
        }
    }

    fn image(&self, name: &str) -> Result<SharedFrame, String> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| format!("Unknown image '{name}'"))
    }
}

pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> SharedFrame {
    Frame::shared(RgbaImage::from_pixel(width.max(1), height.max(1), Rgba(rgba)))
}
