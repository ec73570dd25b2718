//! Bees and worms.
//!
//! Both share the same update shape: death timer, then (unless dying)
//! movement and animation, then the behaviour's constraint. A hit turns the
//! enemy into a frozen white silhouette until the death timer removes it;
//! the running death timer is the only "dying" state.

use bramble_core::animation::FrameAnimation;
use bramble_core::frame::SharedFrame;
use bramble_core::geometry::Rect;
use bramble_core::timer::Timer;
use glam::Vec2;
use std::sync::Arc;

use crate::entity::{Body, Lifecycle, TickContext};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Drifts left while bobbing on a sine wave.
    Bee { amplitude: f32, frequency: f32 },
    /// Walks back and forth inside `bound`.
    Worm { bound: Rect, direction: f32 },
}

#[derive(Debug)]
pub struct Enemy {
    animation: FrameAnimation,
    pub speed: f32,
    pub behavior: Behavior,
    death_timer: Timer,
}

impl Enemy {
    pub fn bee(
        pos: Vec2,
        frames: Vec<SharedFrame>,
        animation_speed: f32,
        speed: f32,
        amplitude: f32,
        frequency: f32,
        death_ms: u64,
    ) -> Result<(Body, Self), String> {
        let animation = FrameAnimation::new(frames, animation_speed)?;
        let body = Body::new(pos, animation.current().clone());
        let enemy = Self {
            animation,
            speed,
            behavior: Behavior::Bee {
                amplitude,
                frequency,
            },
            death_timer: Timer::new(death_ms),
        };
        Ok((body, enemy))
    }

    /// Worm standing on the bottom-left corner of its patrol `bound`. The
    /// bound must fit every frame, or the worm could never stay inside it.
    pub fn worm(
        bound: Rect,
        frames: Vec<SharedFrame>,
        animation_speed: f32,
        speed: f32,
        death_ms: u64,
    ) -> Result<(Body, Self), String> {
        let animation = FrameAnimation::new(frames, animation_speed)?;
        let (max_w, max_h) = animation.frames().iter().fold((0, 0), |(w, h), f| {
            (w.max(f.width()), h.max(f.height()))
        });
        if bound.w < max_w as f32 || bound.h < max_h as f32 {
            return Err(format!(
                "Level validation failed: Worm bound {}x{} at ({}, {}) is smaller than its {}x{} sprite",
                bound.w, bound.h, bound.x, bound.y, max_w, max_h
            ));
        }
        let mut body = Body::new(bound.top_left(), animation.current().clone());
        body.rect.set_bottom_left(Vec2::new(bound.left(), bound.bottom()));
        let enemy = Self {
            animation,
            speed,
            behavior: Behavior::Worm {
                bound,
                direction: 1.0,
            },
            death_timer: Timer::new(death_ms),
        };
        Ok((body, enemy))
    }

    pub fn is_dying(&self) -> bool {
        self.death_timer.is_active()
    }

    /// Freeze, flash the silhouette, and start the countdown to removal.
    pub fn destroy(&mut self, body: &mut Body, now_ms: u64) {
        if self.is_dying() {
            return;
        }
        self.death_timer.activate(now_ms);
        self.animation.speed = 0.0;
        let silhouette = Arc::new(body.visual().silhouette());
        body.set_visual(silhouette);
    }

    pub fn update(&mut self, body: &mut Body, ctx: &TickContext) -> Lifecycle {
        if self.death_timer.update(ctx.now_ms) {
            return Lifecycle::Expired;
        }
        if !self.is_dying() {
            self.step(&mut body.rect, ctx);
            self.animation.advance(ctx.dt);
            body.set_visual(self.animation.current().clone());
        }
        self.constrain(body)
    }

    fn step(&mut self, rect: &mut Rect, ctx: &TickContext) {
        match self.behavior {
            Behavior::Bee {
                amplitude,
                frequency,
            } => {
                rect.x -= self.speed * ctx.dt;
                rect.y += (ctx.now_ms as f32 / frequency).sin() * amplitude * ctx.dt;
            }
            Behavior::Worm { direction, .. } => {
                rect.x += direction * self.speed * ctx.dt;
            }
        }
    }

    fn constrain(&mut self, body: &mut Body) -> Lifecycle {
        match &mut self.behavior {
            Behavior::Bee { .. } => {
                if body.rect.right() <= 0.0 {
                    return Lifecycle::Expired;
                }
            }
            Behavior::Worm { bound, direction } => {
                let rect = &mut body.rect;
                if rect.left() < bound.left() || rect.right() > bound.right() {
                    *direction = -*direction;
                    rect.x = rect.x.min(bound.right() - rect.w).max(bound.left());
                    self.animation.mirror();
                    if !self.death_timer.is_active() {
                        body.set_visual(self.animation.current().clone());
                    }
                }
            }
        }
        Lifecycle::Alive
    }
}
