//! Fixed-timestep frame pacing

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Largest frame delta accepted; longer gaps (tab switches, breakpoints)
/// are clamped so the simulation doesn't try to catch up
const MAX_FRAME_DT: f32 = 0.1;

/// Accumulates real frame time and hands out whole simulation steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FrameClock {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add a frame's elapsed seconds and return how many steps to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        // Drop whatever couldn't be simulated this frame
        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }

    /// Forget buffered time, e.g. after the page was hidden
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_steps() {
        let mut clock = FrameClock::new(0.25, 8);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 1);
        // 0.05s carried over
        assert_eq!(clock.advance(0.21), 1);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = FrameClock::new(1.0 / 64.0, 8);
        // A 5 second hitch only counts as 0.1s
        assert_eq!(clock.advance(5.0), 6);
    }

    #[test]
    fn test_substep_cap() {
        let mut clock = FrameClock::new(0.01, 4);
        assert_eq!(clock.advance(0.1), 4);
        // Leftover is capped at one step
        assert_eq!(clock.advance(0.0), 1);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_reset_drops_buffered_time() {
        let mut clock = FrameClock::new(0.25, 8);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 0);
        clock.reset();
        assert_eq!(clock.advance(0.1), 0);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(0.0), 0);
    }
}
