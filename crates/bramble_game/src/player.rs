//! The player: input, gravity, tile collision, facing and firing.
//!
//! Per tick, in order: cooldown timer, floor probe, input, movement, animation.
//! States are implied by flags rather than an enum: `on_floor`, horizontal
//! velocity, `flip` and `shoot_timer.is_active()`.
//!
//! Horizontal velocity is a unit direction scaled by `speed * dt`. Vertical
//! velocity is kept in pixels per tick: gravity is integrated with `dt` but
//! the displacement itself is not scaled again.

use bramble_core::animation::FrameAnimation;
use bramble_core::frame::{mirror_all, SharedFrame};
use bramble_core::geometry::Rect;
use bramble_core::input::Key;
use bramble_core::timer::Timer;
use glam::Vec2;

use crate::collision::{is_on_floor, resolve_axis_x, resolve_axis_y, ContactState};
use crate::config::PlayerConfig;
use crate::entity::{Body, TickContext};

/// Animation frame shown while airborne.
pub const JUMP_FRAME: f32 = 1.0;

/// Request to spawn a bullet, emitted by a successful trigger pull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub origin: Vec2,
    pub direction: f32,
}

/// Snapshot other entities may read after the player has moved this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub rect: Rect,
    pub flip: bool,
}

#[derive(Debug)]
pub struct Player {
    animation: FrameAnimation,
    frames_left: Vec<SharedFrame>,
    pub velocity: Vec2,
    pub speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub on_floor: bool,
    pub flip: bool,
    pub contacts: ContactState,
    pub shoot_timer: Timer,
}

impl Player {
    pub fn spawn(
        pos: Vec2,
        frames: Vec<SharedFrame>,
        config: &PlayerConfig,
        animation_speed: f32,
    ) -> Result<(Body, Self), String> {
        let animation = FrameAnimation::new(frames, animation_speed)?;
        let frames_left = mirror_all(animation.frames());
        let body = Body::new(pos, animation.current().clone());
        let player = Self {
            animation,
            frames_left,
            velocity: Vec2::ZERO,
            speed: config.speed,
            gravity: config.gravity,
            jump_impulse: config.jump_impulse,
            on_floor: false,
            flip: false,
            contacts: ContactState::default(),
            shoot_timer: Timer::new(config.shoot_cooldown_ms),
        };
        Ok((body, player))
    }

    pub fn view(&self, body: &Body) -> PlayerView {
        PlayerView {
            rect: body.rect,
            flip: self.flip,
        }
    }

    #[allow(dead_code)]
    pub fn frame_index(&self) -> usize {
        self.animation.frame_index()
    }

    pub fn update(&mut self, body: &mut Body, ctx: &TickContext) -> Option<ShotRequest> {
        self.shoot_timer.update(ctx.now_ms);
        self.on_floor = is_on_floor(&body.rect, ctx.obstacles);
        let shot = self.read_input(&body.rect, ctx);
        self.move_and_collide(&mut body.rect, ctx);
        self.animate(body, ctx.dt);
        shot
    }

    fn read_input(&mut self, rect: &Rect, ctx: &TickContext) -> Option<ShotRequest> {
        self.velocity.x = ctx.input.axis(Key::Left, Key::Right);
        if ctx.input.is_held(Key::Space) && self.on_floor {
            self.velocity.y = self.jump_impulse;
        }

        if ctx.input.is_held(Key::S) && !self.shoot_timer.is_active() {
            self.shoot_timer.activate(ctx.now_ms);
            return Some(ShotRequest {
                origin: rect.center(),
                direction: if self.flip { -1.0 } else { 1.0 },
            });
        }
        None
    }

    fn move_and_collide(&mut self, rect: &mut Rect, ctx: &TickContext) {
        rect.x += self.velocity.x * self.speed * ctx.dt;
        let horizontal = resolve_axis_x(rect, self.velocity.x, ctx.obstacles);

        self.velocity.y += self.gravity * ctx.dt;
        rect.y += self.velocity.y;
        let vertical = resolve_axis_y(rect, &mut self.velocity.y, ctx.obstacles);

        self.contacts = ContactState {
            left: horizontal.left,
            right: horizontal.right,
            down: vertical.down,
            up: vertical.up,
        };
    }

    fn animate(&mut self, body: &mut Body, dt: f32) {
        if self.velocity.x != 0.0 {
            self.animation.advance(dt);
            self.flip = self.velocity.x < 0.0;
        } else {
            self.animation.index = 0.0;
        }
        if !self.on_floor {
            self.animation.index = JUMP_FRAME;
        }

        let index = self.animation.frame_index();
        let frame = if self.flip {
            self.frames_left[index].clone()
        } else {
            self.animation.current().clone()
        };
        body.set_visual(frame);
    }
}
