use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::{require_positive, require_range, ConfigError};
use crate::api::types::{BallId, BallKind, BallState};
use crate::core::vector::{VecExt, EPSILON};

/// Physical properties of a ball. Validated once when the ball is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallProperties {
    pub radius: f32,
    pub mass: f32,
    /// Restitution against other balls.
    pub restitution_ball: f32,
    /// Restitution against the cushions.
    pub restitution_rail: f32,
}

impl Default for BallProperties {
    fn default() -> Self {
        Self {
            radius: 12.0,
            mass: 0.17,
            restitution_ball: 0.96,
            restitution_rail: 0.75,
        }
    }
}

impl BallProperties {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("radius", self.radius)?;
        require_positive("mass", self.mass)?;
        require_range("restitution_ball", self.restitution_ball, 0.0, 1.0)?;
        require_range("restitution_rail", self.restitution_rail, 0.0, 1.0)?;
        Ok(())
    }
}

/// One ball on the table: kinematic state plus fixed physical properties.
///
/// The `kind` tag is carried for the renderer and rules layer only; every
/// operation here treats all balls alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    id: BallId,
    kind: BallKind,
    position: Vec2,
    velocity: Vec2,
    props: BallProperties,
    pocketed: bool,
}

impl Ball {
    /// Build a ball at rest. Fails on invalid properties or kind.
    pub fn new(
        id: BallId,
        kind: BallKind,
        position: Vec2,
        props: BallProperties,
    ) -> Result<Self, ConfigError> {
        props.validate()?;
        if !kind.is_valid() {
            return Err(ConfigError::InvalidKind(kind));
        }
        Ok(Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            props,
            pocketed: false,
        })
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn id(&self) -> BallId {
        self.id
    }

    pub fn kind(&self) -> BallKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn radius(&self) -> f32 {
        self.props.radius
    }

    pub fn mass(&self) -> f32 {
        self.props.mass
    }

    pub fn properties(&self) -> &BallProperties {
        &self.props
    }

    pub fn is_pocketed(&self) -> bool {
        self.pocketed
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.props.mass * self.velocity.length_squared()
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Snapshot for the renderer.
    pub fn state(&self) -> BallState {
        BallState {
            id: self.id,
            kind: self.kind,
            position: self.position,
            velocity: self.velocity,
            radius: self.props.radius,
            pocketed: self.pocketed,
        }
    }

    /// Move along the current velocity. Cushions are the engine's business.
    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Slow down by `deceleration * dt` along the direction of travel.
    /// Snaps to exactly zero instead of dropping to or below `stop_speed`,
    /// so friction never reverses a ball.
    pub fn apply_friction(&mut self, dt: f32, deceleration: f32, stop_speed: f32) {
        let speed = self.speed();
        if speed <= EPSILON {
            self.velocity = Vec2::ZERO;
            return;
        }
        let slowed = speed - deceleration * dt;
        if slowed <= 0.0 || slowed <= stop_speed {
            self.velocity = Vec2::ZERO;
        } else {
            self.velocity *= slowed / speed;
        }
    }

    pub fn is_moving(&self, stop_speed: f32) -> bool {
        self.speed() > stop_speed
    }

    /// Bounce off a cushion parallel to the x axis (top or bottom).
    pub fn reflect_horizontal_rail(&mut self) {
        self.velocity.y = -self.velocity.y * self.props.restitution_rail;
    }

    /// Bounce off a cushion parallel to the y axis (left or right).
    pub fn reflect_vertical_rail(&mut self) {
        self.velocity.x = -self.velocity.x * self.props.restitution_rail;
    }

    /// Exchange momentum with `other` along the line of centers.
    ///
    /// Tangential components are kept; normal components follow the 1-D
    /// inelastic formula with the mean of both balls' restitution. Returns
    /// `false` (and changes nothing) when the centers coincide or the balls
    /// are not approaching each other.
    pub fn resolve_collision_with(&mut self, other: &mut Ball) -> bool {
        let offset = other.position - self.position;
        if offset.is_near_zero(EPSILON) {
            return false;
        }
        let normal = offset.normalize();

        let (v1n, t1) = self.velocity.split_along(normal);
        let (v2n, t2) = other.velocity.split_along(normal);
        if v1n - v2n <= 0.0 {
            return false;
        }

        let m1 = self.props.mass;
        let m2 = other.props.mass;
        let e = 0.5 * (self.props.restitution_ball + other.props.restitution_ball);
        let total = m1 + m2;

        let v1n_after = ((m1 - e * m2) * v1n + (1.0 + e) * m2 * v2n) / total;
        let v2n_after = ((m2 - e * m1) * v2n + (1.0 + e) * m1 * v1n) / total;

        self.velocity = t1 + normal * v1n_after;
        other.velocity = t2 + normal * v2n_after;
        true
    }

    pub(crate) fn pocket(&mut self) {
        self.pocketed = true;
        self.velocity = Vec2::ZERO;
    }

    /// Put the ball back on the cloth at rest (used for the cue ball after a scratch).
    pub(crate) fn respot(&mut self, spot: Vec2) {
        self.pocketed = false;
        self.position = spot;
        self.velocity = Vec2::ZERO;
    }
}
