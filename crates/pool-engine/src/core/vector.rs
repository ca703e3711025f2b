//! 2D helpers on top of `glam::Vec2`.

use glam::Vec2;

/// Lengths below this are treated as zero.
pub const EPSILON: f32 = 1e-6;

/// Operations the physics needs that glam doesn't spell the way we use them.
pub trait VecExt {
    /// Mirror across a line with the given unit normal: `v - 2(v·n)n`.
    fn mirror(self, normal: Vec2) -> Vec2;

    /// Split into the scalar component along a unit axis and the remaining
    /// (tangential) vector.
    fn split_along(self, axis: Vec2) -> (f32, Vec2);

    /// True when the length is at most `eps`.
    fn is_near_zero(self, eps: f32) -> bool;
}

impl VecExt for Vec2 {
    fn mirror(self, normal: Vec2) -> Vec2 {
        self - normal * (2.0 * self.dot(normal))
    }

    fn split_along(self, axis: Vec2) -> (f32, Vec2) {
        let along = self.dot(axis);
        (along, self - axis * along)
    }

    fn is_near_zero(self, eps: f32) -> bool {
        self.length_squared() <= eps * eps
    }
}

/// A directed line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Segment starting at `origin` running `length` along `direction` (unit).
    pub fn from_ray(origin: Vec2, direction: Vec2, length: f32) -> Self {
        Self {
            start: origin,
            end: origin + direction * length,
        }
    }

    /// Unnormalized direction `end - start`.
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// Point at parameter `t` (0 = start, 1 = end).
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start + self.delta() * t
    }
}
