//! Tile collision and hit detection.
//!
//! Tiles are resolved with **axis-separated** clamping: the mover is shifted
//! on X and resolved against every overlapping obstacle, then shifted on Y
//! and resolved again. Diagonal moves cannot tunnel through a corner this
//! way, at the cost of occasionally catching on tile seams.
//!
//! Hits between sprites (bullet vs enemy, player vs enemy) use per-pixel
//! masks instead of boxes, since enemy silhouettes are far from rectangular.

use bramble_core::frame::Frame;
use bramble_core::geometry::Rect;
use glam::Vec2;

/// Height of the strip below the mover that counts as "standing on something".
pub const FLOOR_PROBE_HEIGHT: f32 = 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub up: bool,
}

/// Push `rect` out of obstacles along X, based on the sign of `dir_x`.
pub fn resolve_axis_x(rect: &mut Rect, dir_x: f32, obstacles: &[Rect]) -> ContactState {
    let mut contacts = ContactState::default();
    for obstacle in obstacles {
        if !obstacle.overlaps(rect) {
            continue;
        }
        if dir_x > 0.0 {
            rect.set_right(obstacle.left());
            contacts.right = true;
        }
        if dir_x < 0.0 {
            rect.set_left(obstacle.right());
            contacts.left = true;
        }
    }
    contacts
}

/// Push `rect` out of obstacles along Y. Any vertical contact zeroes the
/// vertical velocity, ceilings included.
pub fn resolve_axis_y(rect: &mut Rect, velocity_y: &mut f32, obstacles: &[Rect]) -> ContactState {
    let mut contacts = ContactState::default();
    for obstacle in obstacles {
        if !obstacle.overlaps(rect) {
            continue;
        }
        if *velocity_y > 0.0 {
            rect.set_bottom(obstacle.top());
            contacts.down = true;
        }
        if *velocity_y < 0.0 {
            rect.set_top(obstacle.bottom());
            contacts.up = true;
        }
        *velocity_y = 0.0;
    }
    contacts
}

/// Thin strip directly under `rect`, as wide as `rect`.
pub fn floor_probe(rect: &Rect) -> Rect {
    let mut probe = Rect::new(0.0, 0.0, rect.w, FLOOR_PROBE_HEIGHT);
    probe.set_mid_top(rect.mid_bottom());
    probe
}

pub fn is_on_floor(rect: &Rect, obstacles: &[Rect]) -> bool {
    floor_probe(rect).overlaps_any(obstacles)
}

/// Pixel-exact overlap of two placed frames.
pub fn masks_collide(a_pos: Vec2, a: &Frame, b_pos: Vec2, b: &Frame) -> bool {
    let a_rect = Rect::from_pos_size(a_pos, a.size());
    let b_rect = Rect::from_pos_size(b_pos, b.size());
    if !a_rect.overlaps(&b_rect) {
        return false;
    }
    let offset = ((b_pos.x - a_pos.x) as i32, (b_pos.y - a_pos.y) as i32);
    a.mask().overlaps(b.mask(), offset)
}
