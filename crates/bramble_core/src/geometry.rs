//! Float rectangle used for sprite bounds, tile collision and patrol bounds.
//!
//! Anchored at the top-left corner with y growing downward (screen space).
//! Overlap tests are strict: rectangles that only share an edge do not
//! collide, so a player standing exactly on a tile is not "inside" it.

use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn mid_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y + self.h * 0.5)
    }

    pub fn mid_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.y + self.h * 0.5)
    }

    pub fn mid_bottom(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.bottom())
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn set_mid_left(&mut self, point: Vec2) {
        self.x = point.x;
        self.y = point.y - self.h * 0.5;
    }

    pub fn set_mid_right(&mut self, point: Vec2) {
        self.x = point.x - self.w;
        self.y = point.y - self.h * 0.5;
    }

    pub fn set_mid_top(&mut self, point: Vec2) {
        self.x = point.x - self.w * 0.5;
        self.y = point.y;
    }

    pub fn set_bottom_left(&mut self, point: Vec2) {
        self.x = point.x;
        self.y = point.y - self.h;
    }

    /// Strict overlap of interiors. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True when `other` lies entirely inside `self`, edges inclusive.
    pub fn contains(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    pub fn overlaps_any<'a, I>(&self, rects: I) -> bool
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        rects.into_iter().any(|r| self.overlaps(r))
    }
}
