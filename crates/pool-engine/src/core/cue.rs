use std::f32::consts::TAU;

use glam::Vec2;

use crate::api::error::ShotError;
use crate::core::physics::PhysicsEngine;

/// Launch speed for a power fraction, clamped to `[0, max_speed]`.
pub fn power_to_speed(power: f32, max_speed: f32) -> f32 {
    power.clamp(0.0, 1.0) * max_speed
}

/// Travel direction for an aim angle in radians (0 = +x, counter-clockwise).
pub fn aim_direction(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Initial cue ball velocity for a shot.
pub fn launch_velocity(angle: f32, power: f32, max_speed: f32) -> Vec2 {
    aim_direction(angle) * power_to_speed(power, max_speed)
}

/// Reject shots the engine must not take: non-finite angles and power outside `(0, 1]`.
pub fn validate_shot(angle: f32, power: f32) -> Result<(), ShotError> {
    if !angle.is_finite() {
        return Err(ShotError::InvalidAngle(angle));
    }
    if !(power > 0.0 && power <= 1.0) {
        return Err(ShotError::InvalidPower(power));
    }
    Ok(())
}

/// Aim state held between shots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CueStick {
    angle: f32,
    power: f32,
}

impl CueStick {
    pub fn new() -> Self {
        Self::default()
    }

    /// Angle in radians, always in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Power fraction in `[0, 1]`.
    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn direction(&self) -> Vec2 {
        aim_direction(self.angle)
    }

    /// Rotate and change power by deltas. Angle wraps, power saturates.
    /// Non-finite deltas are ignored.
    pub fn adjust_aim(&mut self, delta_angle: f32, delta_power: f32) {
        if delta_angle.is_finite() {
            self.angle = (self.angle + delta_angle).rem_euclid(TAU);
        }
        if delta_power.is_finite() {
            self.power = (self.power + delta_power).clamp(0.0, 1.0);
        }
    }

    /// Set absolute aim (e.g. from a pointer position).
    pub fn set_aim(&mut self, angle: f32, power: f32) -> Result<(), ShotError> {
        if !angle.is_finite() {
            return Err(ShotError::InvalidAngle(angle));
        }
        if !(0.0..=1.0).contains(&power) {
            return Err(ShotError::InvalidPower(power));
        }
        self.angle = angle.rem_euclid(TAU);
        self.power = power;
        Ok(())
    }

    /// Strike the cue ball. On success the power drops back to zero so the
    /// next shot has to be charged again; on failure nothing changes.
    pub fn shoot(&mut self, engine: &mut PhysicsEngine) -> Result<Vec2, ShotError> {
        let velocity = engine.shoot(self.angle, self.power)?;
        self.power = 0.0;
        Ok(velocity)
    }

    /// Back to the rest position (angle 0, no power).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
