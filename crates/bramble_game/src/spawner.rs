//! Timed enemy spawning.
//!
//! A repeating timer emits one bee per interval just beyond the right edge of
//! the level (one screen width out), at a random height with randomised
//! speed and sine parameters.

use bramble_core::timer::Timer;
use glam::Vec2;
use rand::Rng;

use crate::config::BeeConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeeSpawn {
    pub pos: Vec2,
    pub speed: f32,
    pub amplitude: f32,
    pub frequency: f32,
}

#[derive(Debug)]
pub struct BeeSpawner {
    timer: Timer,
    config: BeeConfig,
    spawn_x: f32,
    max_y: f32,
}

impl BeeSpawner {
    pub fn new(config: BeeConfig, spawn_x: f32, max_y: f32, now_ms: u64) -> Self {
        Self {
            timer: Timer::repeating(config.spawn_interval_ms).autostart(now_ms),
            config,
            spawn_x,
            max_y,
        }
    }

    pub fn update<R: Rng>(&mut self, now_ms: u64, rng: &mut R) -> Option<BeeSpawn> {
        if !self.timer.update(now_ms) {
            return None;
        }
        Some(BeeSpawn {
            pos: Vec2::new(self.spawn_x, rng.gen_range(0.0..=self.max_y)),
            speed: roll(rng, self.config.speed),
            amplitude: roll(rng, self.config.amplitude),
            frequency: roll(rng, self.config.frequency),
        })
    }
}

/// Inclusive integer roll, as the tuning ranges are whole numbers.
pub fn roll<R: Rng>(rng: &mut R, (lo, hi): (u32, u32)) -> f32 {
    rng.gen_range(lo..=hi) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawns_once_per_interval_within_ranges() {
        let config = BeeConfig::default();
        let mut spawner = BeeSpawner::new(config, 3840.0, 768.0, 0);
        let mut rng = StdRng::seed_from_u64(7);

        let mut spawns = Vec::new();
        for tick in 0..=180u64 {
            if let Some(spawn) = spawner.update(tick * 1000 / 60, &mut rng) {
                spawns.push(spawn);
            }
        }
        // Ticks 30, 60, ..., 180 land exactly on each 500ms boundary.
        assert_eq!(spawns.len(), 6);
        for spawn in &spawns {
            assert_eq!(spawn.pos.x, 3840.0);
            assert!((0.0..=768.0).contains(&spawn.pos.y));
            assert!((300.0..=500.0).contains(&spawn.speed));
            assert!((500.0..=600.0).contains(&spawn.amplitude));
            assert!((300.0..=600.0).contains(&spawn.frequency));
        }
    }

    #[test]
    fn same_seed_same_spawns() {
        let run = || {
            let mut spawner = BeeSpawner::new(BeeConfig::default(), 100.0, 50.0, 0);
            let mut rng = StdRng::seed_from_u64(42);
            (0..=120u64)
                .filter_map(|tick| spawner.update(tick * 1000 / 60, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
