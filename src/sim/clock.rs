//! Scaled simulation time
//!
//! The clock is the only time source the simulation reads. Wall-clock time is
//! converted into simulation time once per frame by the tick.

use serde::{Deserialize, Serialize};

use crate::consts::TIME_COEF;

/// Simulation time in seconds plus the fast-forward/slow-motion factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    now: f32,
    time_coef: f32,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(0.0, TIME_COEF)
    }
}

impl SimulationClock {
    pub fn new(now: f32, time_coef: f32) -> Self {
        Self { now, time_coef }
    }

    /// Current simulation time
    #[inline]
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Jump to an absolute time (used when restoring a save)
    pub fn set_now(&mut self, now: f32) {
        self.now = now;
    }

    /// Multiplier for a frame. Both modifiers together cancel out.
    pub fn time_scale(&self, fast_forward: bool, slow_motion: bool) -> f32 {
        let mut scale = 1.0;
        if fast_forward {
            scale *= self.time_coef;
        }
        if slow_motion {
            scale *= 1.0 / self.time_coef;
        }
        scale
    }

    /// Advance by a wall-clock interval and return the scaled tick length
    pub fn advance(&mut self, wall_dt: f32, fast_forward: bool, slow_motion: bool) -> f32 {
        let dt = wall_dt.max(0.0) * self.time_scale(fast_forward, slow_motion);
        self.now += dt;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_unscaled() {
        let mut clock = SimulationClock::default();
        let dt = clock.advance(0.25, false, false);
        assert_eq!(dt, 0.25);
        assert_eq!(clock.now(), 0.25);
    }

    #[test]
    fn test_fast_forward_and_slow_motion() {
        let mut clock = SimulationClock::new(1.0, 10.0);
        assert!((clock.advance(0.1, true, false) - 1.0).abs() < 1e-6);
        assert!((clock.advance(0.1, false, true) - 0.01).abs() < 1e-6);
        assert!((clock.time_scale(true, true) - 1.0).abs() < 1e-6);
        assert!((clock.now() - 2.01).abs() < 1e-5);
    }

    #[test]
    fn test_negative_wall_time_is_ignored() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.advance(-1.0, false, false), 0.0);
        assert_eq!(clock.now(), 0.0);
    }
}
