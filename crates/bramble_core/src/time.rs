//! Fixed-step frame clock.
//!
//! Wall-clock frame time feeds an accumulator which the loop drains in
//! `fixed_dt` slices, so the simulation always advances by the same delta no
//! matter how fast frames are presented. Frame time is capped to avoid the
//! spiral of death after a stall (window drag, debugger pause).

use std::time::{Duration, Instant};

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_rate(60)
    }

    /// Clock stepping at `steps_per_second` fixed ticks.
    pub fn with_rate(steps_per_second: u32) -> Self {
        Self {
            fixed_dt: 1.0 / steps_per_second.max(1) as f64,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
        }
    }

    /// Measure wall-clock time since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feed an explicit frame delta. `begin_frame` routes through here.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt;
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Simulated time in whole milliseconds.
    pub fn now_ms(&self) -> u64 {
        (self.total_time * 1000.0) as u64
    }

    /// Time left in this frame's budget at the target rate, measured from the
    /// start of the frame. Zero when the frame already ran long.
    pub fn frame_budget_remaining(&self) -> Duration {
        let budget = Duration::from_secs_f64(self.fixed_dt);
        budget.saturating_sub(self.last_instant.elapsed())
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_yields_whole_fixed_steps() {
        let mut time = TimeState::with_rate(60);
        time.advance(0.06);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(time.steps_this_frame, 3);
        assert!((time.total_time - 3.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn leftover_carries_into_next_frame() {
        let mut time = TimeState::with_rate(10);
        time.advance(0.15);
        while time.should_step() {}
        assert_eq!(time.fixed_step_count, 1);
        time.advance(0.07);
        while time.should_step() {}
        assert_eq!(time.fixed_step_count, 2);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut time = TimeState::with_rate(10);
        time.advance(5.0);
        assert!((time.real_dt - time.max_accumulator).abs() < 1e-12);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 2);
    }

    #[test]
    fn now_ms_tracks_simulated_time() {
        let mut time = TimeState::with_rate(100);
        time.advance(0.205);
        while time.should_step() {}
        assert!((199..=200).contains(&time.now_ms()));
    }
}
