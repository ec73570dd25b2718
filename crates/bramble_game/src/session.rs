//! The outer loop: a fixed-step clock draining into `World::tick`, fed by an
//! input source and rendered into a software canvas after each frame that
//! stepped.

use std::time::Duration;

use bramble_core::input::{InputState, Key};
use bramble_core::time::TimeState;

use crate::render::{render_world, Canvas};
use crate::replay::ReplaySequence;
use crate::world::{World, WorldStats};

/// Supplies the held keys for each fixed tick. `None` means the source is
/// exhausted and the session should end.
pub trait InputSource {
    fn next_tick(&mut self) -> Option<Vec<Key>>;
}

pub struct ReplayInput {
    ticks: std::vec::IntoIter<Vec<Key>>,
}

impl ReplayInput {
    pub fn new(replay: &ReplaySequence) -> Self {
        Self {
            ticks: replay.expanded_inputs().into_iter(),
        }
    }
}

impl InputSource for ReplayInput {
    fn next_tick(&mut self) -> Option<Vec<Key>> {
        self.ticks.next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Wall-clock frames, sleeping off whatever is left of each frame.
    RealTime,
    /// Exactly one fixed step per frame, no sleeping.
    AsFastAsPossible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// An enemy reached the player.
    Caught,
    /// Escape was pressed.
    Quit,
    InputExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub ticks: u64,
    pub frames_rendered: u64,
    pub simulated_ms: u64,
    pub stats: WorldStats,
}

pub struct Session {
    world: World,
    time: TimeState,
    input: InputState,
    canvas: Canvas,
    pacing: Pacing,
    frames_rendered: u64,
}

impl Session {
    pub fn new(world: World, pacing: Pacing) -> Self {
        let config = world.config();
        let time = TimeState::with_rate(config.framerate);
        let canvas = Canvas::new(config.window_width, config.window_height);
        Self {
            world,
            time,
            input: InputState::new(),
            canvas,
            pacing,
            frames_rendered: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn run(&mut self, source: &mut dyn InputSource) -> SessionSummary {
        let level = self.world.level_size();
        log::info!(
            "Session starting at {} Hz ({:?}), level {}x{} px",
            self.world.config().framerate,
            self.pacing,
            level.x,
            level.y
        );
        let reason = loop {
            if let Some(reason) = self.frame(source) {
                break reason;
            }
            if self.pacing == Pacing::RealTime {
                let remaining = self.time.frame_budget_remaining();
                if remaining > Duration::ZERO {
                    std::thread::sleep(remaining);
                }
            }
        };

        let summary = SessionSummary {
            reason,
            ticks: self.world.stats().ticks,
            frames_rendered: self.frames_rendered,
            simulated_ms: self.world.now_ms(),
            stats: self.world.stats(),
        };
        log::info!(
            "Session ended ({:?}) after {} ticks, {} ms simulated",
            summary.reason,
            summary.ticks,
            summary.simulated_ms
        );
        summary
    }

    /// One presented frame: drain the clock, then render if anything moved.
    fn frame(&mut self, source: &mut dyn InputSource) -> Option<EndReason> {
        if !self.world.is_running() {
            return Some(EndReason::Quit);
        }
        match self.pacing {
            Pacing::RealTime => self.time.begin_frame(),
            Pacing::AsFastAsPossible => self.time.advance(self.time.fixed_dt),
        }

        let mut ended = None;
        let mut stepped = 0;
        while self.time.should_step() {
            let Some(held) = source.next_tick() else {
                ended = Some(EndReason::InputExhausted);
                break;
            };
            self.input.set_held(&held);
            if self.input.is_just_pressed(Key::Escape) {
                self.world.quit();
                ended = Some(EndReason::Quit);
                break;
            }
            let running = self.world.tick(self.time.fixed_dt as f32, &self.input);
            self.input.end_frame();
            stepped += 1;
            if !running {
                ended = Some(EndReason::Caught);
                break;
            }
        }

        if stepped > 0 {
            render_world(&self.world, &mut self.canvas);
            self.frames_rendered += 1;
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::audio::SoundBank;
    use crate::config::GameConfig;
    use crate::level::{LevelMap, MapObject, DECORATION_LAYER, ENTITIES_LAYER, MAIN_LAYER};
    use crate::replay::ReplayFrame;
    use bramble_core::geometry::Rect;

    fn open_level() -> LevelMap {
        let mut map = LevelMap::new("open", 20, 10);
        map.add_tile_layer(MAIN_LAYER, Vec::new());
        map.add_tile_layer(DECORATION_LAYER, Vec::new());
        map.add_object_layer(
            ENTITIES_LAYER,
            vec![MapObject {
                name: "Player".to_string(),
                x: 300.0,
                y: 100.0,
                width: 0.0,
                height: 0.0,
            }],
        );
        map
    }

    fn session(map: &LevelMap) -> Session {
        let mut config = GameConfig::default();
        config.bee.spawn_interval_ms = 1_000_000;
        let world = World::from_level(
            config,
            map,
            &MemoryAssets::placeholder(64),
            SoundBank::new(),
        )
        .expect("world");
        Session::new(world, Pacing::AsFastAsPossible)
    }

    fn replay(frames: Vec<ReplayFrame>) -> ReplaySequence {
        ReplaySequence {
            fixed_dt: 1.0 / 60.0,
            frames,
        }
    }

    #[test]
    fn exhausted_input_ends_the_session() {
        let mut session = session(&open_level());
        let script = replay(vec![ReplayFrame::new(&[Key::Right], 45)]);
        let summary = session.run(&mut ReplayInput::new(&script));
        assert_eq!(summary.reason, EndReason::InputExhausted);
        assert_eq!(summary.ticks, 45);
        assert_eq!(summary.frames_rendered, 45);
        assert_eq!(summary.stats.ticks, 45);
    }

    #[test]
    fn escape_quits_before_the_tick_runs() {
        let mut session = session(&open_level());
        let script = replay(vec![
            ReplayFrame::new(&[], 10),
            ReplayFrame::new(&[Key::Escape], 1),
            ReplayFrame::new(&[], 10),
        ]);
        let summary = session.run(&mut ReplayInput::new(&script));
        assert_eq!(summary.reason, EndReason::Quit);
        assert_eq!(summary.stats.ticks, 10);
        assert!(!session.world().is_running());
    }

    #[test]
    fn enemy_contact_ends_the_session() {
        let mut session = session(&open_level());
        session
            .world
            .spawn_worm(Rect::new(280.0, 100.0, 200.0, 64.0))
            .expect("worm");
        let script = replay(vec![ReplayFrame::new(&[], 100)]);
        let summary = session.run(&mut ReplayInput::new(&script));
        assert_eq!(summary.reason, EndReason::Caught);
        assert_eq!(summary.stats.ticks, 1);
    }

    #[test]
    fn canvas_shows_the_player_at_screen_centre() {
        let mut session = session(&open_level());
        let script = replay(vec![ReplayFrame::new(&[], 3)]);
        session.run(&mut ReplayInput::new(&script));

        let background = session.world().config().background;
        let pixels = session.canvas().pixels();
        let [r, g, b] = background;
        assert_eq!(pixels.get_pixel(0, 0).0, [r, g, b, 255]);
        assert_ne!(
            pixels.get_pixel(pixels.width() / 2, pixels.height() / 2).0,
            [r, g, b, 255]
        );
    }
}
