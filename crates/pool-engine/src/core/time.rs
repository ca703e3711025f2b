use crate::api::config::PhysicsConfig;

/// Most fixed ticks run for one rendered frame. Anything beyond is dropped
/// so a long stall cannot snowball into ever longer frames.
pub const MAX_TICKS_PER_FRAME: u32 = 10;

/// Turns variable frame deltas into a whole number of fixed physics ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TickClock {
    dt: f32,
    accumulator: f32,
    max_catch_up: u32,
}

impl TickClock {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_catch_up: MAX_TICKS_PER_FRAME,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.fixed_dt)
    }

    /// Feed one frame's elapsed time. Returns how many fixed ticks to run now.
    /// Negative or NaN deltas count as zero.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        let cap = self.dt * self.max_catch_up as f32;
        if self.accumulator > cap {
            log::debug!("dropping {:.3}s of frame time", self.accumulator - cap);
            self.accumulator = cap;
        }
        let due = (self.accumulator / self.dt) as u32;
        self.accumulator -= due as f32 * self.dt;
        due
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Drop any partial tick, e.g. after a re-rack.
    pub fn clear(&mut self) {
        self.accumulator = 0.0;
    }
}
