//! Decoded level placements: tile layers and object layers.
//!
//! Map files are authored in an external editor; this module only holds the
//! already-decoded result (tiles by grid cell, objects by pixel rect) and
//! reads the JSON export of it. Layer names are looked up strictly so a typo
//! fails at startup instead of producing an empty level.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use bramble_core::geometry::Rect;

pub const MAIN_LAYER: &str = "Main";
pub const DECORATION_LAYER: &str = "Decoration";
pub const ENTITIES_LAYER: &str = "Entities";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TilePlacement {
    pub x: i32,
    pub y: i32,
    pub image: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MapObject {
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

impl MapObject {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Deserialize, Clone)]
struct LevelFile {
    version: String,
    level_id: String,
    width: u32,
    height: u32,
    #[serde(default)]
    tile_layers: Vec<TileLayerJson>,
    #[serde(default)]
    object_layers: Vec<ObjectLayerJson>,
}

#[derive(Debug, Deserialize, Clone)]
struct TileLayerJson {
    name: String,
    tiles: Vec<TilePlacement>,
}

#[derive(Debug, Deserialize, Clone)]
struct ObjectLayerJson {
    name: String,
    objects: Vec<MapObject>,
}

#[derive(Debug, Clone, Default)]
pub struct LevelMap {
    pub level_id: String,
    /// Size in tiles.
    pub width: u32,
    pub height: u32,
    tile_layers: HashMap<String, Vec<TilePlacement>>,
    object_layers: HashMap<String, Vec<MapObject>>,
}

impl LevelMap {
    pub fn new(level_id: &str, width: u32, height: u32) -> Self {
        Self {
            level_id: level_id.to_string(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn add_tile_layer(&mut self, name: &str, tiles: Vec<TilePlacement>) {
        self.tile_layers.insert(name.to_string(), tiles);
    }

    pub fn add_object_layer(&mut self, name: &str, objects: Vec<MapObject>) {
        self.object_layers.insert(name.to_string(), objects);
    }

    pub fn tiles(&self, layer: &str) -> Result<&[TilePlacement], String> {
        self.tile_layers
            .get(layer)
            .map(Vec::as_slice)
            .ok_or_else(|| format!("Level '{}' has no tile layer '{}'", self.level_id, layer))
    }

    pub fn objects(&self, layer: &str) -> Result<&[MapObject], String> {
        self.object_layers
            .get(layer)
            .map(Vec::as_slice)
            .ok_or_else(|| format!("Level '{}' has no object layer '{}'", self.level_id, layer))
    }

    /// Level extent in pixels.
    pub fn pixel_size(&self, tile_size: u32) -> (f32, f32) {
        (
            self.width as f32 * tile_size as f32,
            self.height as f32 * tile_size as f32,
        )
    }

    /// Small built-in level: a floor, two ledges, a wall, and two worm beds.
    pub fn demo() -> Self {
        let (width, height) = (40, 12);
        let mut map = Self::new("demo", width, height);

        let mut main = Vec::new();
        for x in 0..width as i32 {
            main.push(tile(x, height as i32 - 1, "ground"));
        }
        for x in 8..12 {
            main.push(tile(x, 7, "ground"));
        }
        for x in 20..25 {
            main.push(tile(x, 5, "ground"));
        }
        for y in 8..11 {
            main.push(tile(30, y, "ground"));
        }
        map.add_tile_layer(MAIN_LAYER, main);
        map.add_tile_layer(
            DECORATION_LAYER,
            vec![tile(3, 10, "flower"), tile(15, 10, "flower")],
        );
        map.add_object_layer(
            ENTITIES_LAYER,
            vec![
                object("Player", 128.0, 500.0, 0.0, 0.0),
                object("Worm", 832.0, 640.0, 512.0, 64.0),
                object("Worm", 1280.0, 256.0, 320.0, 64.0),
            ],
        );
        map
    }
}

fn tile(x: i32, y: i32, image: &str) -> TilePlacement {
    TilePlacement {
        x,
        y,
        image: image.to_string(),
    }
}

fn object(name: &str, x: f32, y: f32, width: f32, height: f32) -> MapObject {
    MapObject {
        name: name.to_string(),
        x,
        y,
        width,
        height,
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelMap, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read level file {}: {e}", path.display()))?;
    let file: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    validate_level(&file)?;

    let mut map = LevelMap::new(&file.level_id, file.width, file.height);
    for layer in file.tile_layers {
        map.add_tile_layer(&layer.name, layer.tiles);
    }
    for layer in file.object_layers {
        map.add_object_layer(&layer.name, layer.objects);
    }
    log::info!(
        "Level loaded: {} ({}), {}x{} tiles",
        map.level_id,
        file.version,
        map.width,
        map.height
    );
    Ok(map)
}

fn validate_level(file: &LevelFile) -> Result<(), String> {
    if file.width == 0 || file.height == 0 {
        return Err("Level validation failed: width and height must be > 0".to_string());
    }

    let mut names = HashSet::new();
    for layer in &file.tile_layers {
        if !names.insert(layer.name.as_str()) {
            return Err(format!(
                "Level validation failed: duplicate layer '{}'",
                layer.name
            ));
        }
        for t in &layer.tiles {
            if t.x < 0 || t.y < 0 || t.x >= file.width as i32 || t.y >= file.height as i32 {
                return Err(format!(
                    "Level validation failed: tile out of bounds ({}, {}) in layer '{}'",
                    t.x, t.y, layer.name
                ));
            }
        }
    }
    for layer in &file.object_layers {
        if !names.insert(layer.name.as_str()) {
            return Err(format!(
                "Level validation failed: duplicate layer '{}'",
                layer.name
            ));
        }
    }
    Ok(())
}
