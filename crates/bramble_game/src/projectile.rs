//! Bullets and the muzzle flash that accompanies each shot.

use bramble_core::frame::SharedFrame;
use bramble_core::timer::Timer;
use glam::Vec2;

use crate::entity::{Body, Lifecycle, TickContext};
use crate::player::{PlayerView, ShotRequest};

/// Right- and left-facing variants of one sprite, mirrored once at load.
#[derive(Debug, Clone)]
pub struct FacingPair {
    pub right: SharedFrame,
    pub left: SharedFrame,
}

impl FacingPair {
    pub fn new(right: SharedFrame) -> Self {
        let left = std::sync::Arc::new(right.mirrored());
        Self { right, left }
    }

    pub fn facing(&self, left: bool) -> SharedFrame {
        if left {
            self.left.clone()
        } else {
            self.right.clone()
        }
    }
}

#[derive(Debug)]
pub struct Bullet {
    pub direction: f32,
    pub speed: f32,
}

impl Bullet {
    /// Place a bullet at the muzzle. Facing left, the sprite's own width is
    /// subtracted so it still leaves from the gun rather than its top-left.
    pub fn spawn(
        shot: ShotRequest,
        sprite: &FacingPair,
        muzzle_offset: f32,
        speed: f32,
    ) -> (Body, Self) {
        let visual = sprite.facing(shot.direction < 0.0);
        let mut x = shot.origin.x + shot.direction * muzzle_offset;
        if shot.direction < 0.0 {
            x -= visual.width() as f32;
        }
        let body = Body::new(Vec2::new(x, shot.origin.y), visual);
        (
            body,
            Self {
                direction: shot.direction,
                speed,
            },
        )
    }

    pub fn update(&mut self, body: &mut Body, ctx: &TickContext) -> Lifecycle {
        body.rect.x += self.direction * self.speed * ctx.dt;
        if ctx.level_bounds.overlaps(&body.rect) {
            Lifecycle::Alive
        } else {
            Lifecycle::Expired
        }
    }
}

#[derive(Debug)]
pub struct Fire {
    timer: Timer,
    /// Player facing when the flash was created.
    pub flip: bool,
    pub y_offset: f32,
}

impl Fire {
    pub fn spawn(
        player: PlayerView,
        sprite: &FacingPair,
        duration_ms: u64,
        y_offset: f32,
        now_ms: u64,
    ) -> (Body, Self) {
        let mut body = Body::new(Vec2::ZERO, sprite.facing(player.flip));
        let fire = Self {
            timer: Timer::new(duration_ms).autostart(now_ms),
            flip: player.flip,
            y_offset,
        };
        fire.attach(&mut body, &player);
        (body, fire)
    }

    fn attach(&self, body: &mut Body, player: &PlayerView) {
        let offset = Vec2::new(0.0, self.y_offset);
        if player.flip {
            body.rect.set_mid_right(player.rect.mid_left() + offset);
        } else {
            body.rect.set_mid_left(player.rect.mid_right() + offset);
        }
    }

    pub fn update(
        &mut self,
        body: &mut Body,
        ctx: &TickContext,
        player: &PlayerView,
    ) -> Lifecycle {
        if self.timer.update(ctx.now_ms) {
            return Lifecycle::Expired;
        }
        if player.flip != self.flip {
            return Lifecycle::Expired;
        }
        self.attach(body, player);
        Lifecycle::Alive
    }
}
