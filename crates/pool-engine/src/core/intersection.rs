//! Ray and swept-circle queries shared by the solver and the aiming guide.

use glam::Vec2;

use crate::api::types::BallId;
use crate::core::ball::Ball;
use crate::core::table::{RailSide, TableGeometry};
use crate::core::vector::{Segment, VecExt, EPSILON};

/// Rail hits this close together count as one corner hit.
const CORNER_TOLERANCE: f32 = 1e-3;

/// Slack on segment parameters so a ray through a rail endpoint still counts.
const PARAM_TOLERANCE: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub point: Vec2,
    /// Distance from the segment start to `point`.
    pub distance: f32,
    /// Parameter along the segment (0 = start, 1 = end).
    pub t: f32,
}

/// First point where `segment` enters the circle.
///
/// A segment that starts inside the circle hits at `t = 0` if it is heading
/// toward the center, and misses otherwise.
pub fn segment_circle_intersection(segment: &Segment, center: Vec2, radius: f32) -> Option<SegmentHit> {
    let d = segment.delta();
    let f = segment.start - center;
    let a = d.dot(d);
    if a <= EPSILON * EPSILON {
        return None;
    }
    let b = 2.0 * f.dot(d);
    let c = f.dot(f) - radius * radius;

    if c <= 0.0 {
        return (b < 0.0).then_some(SegmentHit {
            point: segment.start,
            distance: 0.0,
            t: 0.0,
        });
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(SegmentHit {
        point: segment.point_at(t),
        distance: t * a.sqrt(),
        t,
    })
}

/// Crossing point of two segments, if they cross. Parallel segments never do.
pub fn segment_segment_intersection(a: &Segment, b: &Segment) -> Option<SegmentHit> {
    let r = a.delta();
    let s = b.delta();
    let denom = r.perp_dot(s);
    if denom.abs() <= EPSILON {
        return None;
    }
    let qp = b.start - a.start;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    let range = -PARAM_TOLERANCE..=1.0 + PARAM_TOLERANCE;
    if !range.contains(&t) || !range.contains(&u) {
        return None;
    }
    let t = t.clamp(0.0, 1.0);
    Some(SegmentHit {
        point: a.point_at(t),
        distance: t * a.length(),
        t,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailHit {
    pub point: Vec2,
    pub distance: f32,
    pub side: RailSide,
    /// Inward normal. Sum of both normals (normalized) when the ray lands in a corner.
    pub normal: Vec2,
}

/// Nearest cushion hit for a ball of `radius` travelling from `origin` along
/// unit `direction`, looking at most `reach` ahead.
///
/// Only rails the ray is heading into are considered. A ray that starts on
/// such a rail hits it at distance zero; the rail a ray was just reflected
/// off faces away from it and is skipped.
pub fn nearest_rail_hit(
    table: &TableGeometry,
    origin: Vec2,
    direction: Vec2,
    radius: f32,
    reach: f32,
) -> Option<RailHit> {
    let ray = Segment::from_ray(origin, direction, reach);
    let mut best: Option<RailHit> = None;

    for rail in table.cushion_rails(radius).iter() {
        if direction.dot(rail.normal) >= 0.0 {
            continue;
        }
        let Some(hit) = segment_segment_intersection(&ray, &rail.segment) else {
            continue;
        };
        best = match best {
            Some(prev) if (prev.distance - hit.distance).abs() <= CORNER_TOLERANCE => Some(RailHit {
                normal: (prev.normal + rail.normal).normalize(),
                ..prev
            }),
            Some(prev) if prev.distance < hit.distance => Some(prev),
            _ => Some(RailHit {
                point: hit.point,
                distance: hit.distance,
                side: rail.side,
                normal: rail.normal,
            }),
        };
    }
    best
}

/// Time until two moving balls touch, within `[0, horizon]`.
///
/// Returns `None` when they are not approaching, never touch, or touch only
/// after `horizon`. Balls already touching (or overlapping) while approaching
/// report `Some(0.0)`.
pub fn time_to_ball_collision(a: &Ball, b: &Ball, horizon: f32) -> Option<f32> {
    let p = b.position() - a.position();
    let v = b.velocity() - a.velocity();
    let pv = p.dot(v);
    if pv >= 0.0 {
        return None;
    }
    let reach = a.radius() + b.radius();
    let c = p.dot(p) - reach * reach;
    if c <= 0.0 {
        return Some(0.0);
    }
    let qa = v.dot(v);
    if qa <= EPSILON * EPSILON {
        return None;
    }
    let qb = 2.0 * pv;
    let disc = qb * qb - 4.0 * qa * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-qb - disc.sqrt()) / (2.0 * qa);
    (t >= 0.0 && t <= horizon).then_some(t)
}

/// Lazily traced aiming guide: the cue ball center's path along `direction`,
/// reflecting off the cushions, until it would touch another ball or the
/// bounce budget runs out.
///
/// Yields the origin first, then each cushion contact, then the final point.
/// Restarting from the same inputs yields the same points.
pub struct GuidePath<'a> {
    table: &'a TableGeometry,
    balls: &'a [Ball],
    skip: BallId,
    radius: f32,
    origin: Vec2,
    direction: Vec2,
    bounces_left: u32,
    reach: f32,
    started: bool,
    done: bool,
}

impl<'a> GuidePath<'a> {
    pub fn new(
        table: &'a TableGeometry,
        balls: &'a [Ball],
        cue: &Ball,
        direction: Vec2,
        max_bounces: u32,
    ) -> Self {
        let reach = 2.0 * Vec2::new(table.width(), table.height()).length();
        let direction = direction.normalize_or_zero();
        Self {
            table,
            balls,
            skip: cue.id(),
            radius: cue.radius(),
            origin: cue.position(),
            direction,
            bounces_left: max_bounces,
            reach,
            started: false,
            done: direction == Vec2::ZERO,
        }
    }

    /// Trace from `origin` instead of the cue ball's own position.
    pub fn starting_at(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Nearest obstruction along the current leg, as distance from the leg origin.
    fn nearest_obstacle(&self, leg: &Segment) -> Option<f32> {
        self.balls
            .iter()
            .filter(|b| b.id() != self.skip && !b.is_pocketed())
            .filter_map(|b| segment_circle_intersection(leg, b.position(), self.radius + b.radius()))
            .map(|hit| hit.distance)
            .fold(None, |best: Option<f32>, d| Some(best.map_or(d, |b| b.min(d))))
    }
}

impl Iterator for GuidePath<'_> {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if !self.started {
            self.started = true;
            return Some(self.origin);
        }
        if self.done {
            return None;
        }

        let rail = nearest_rail_hit(self.table, self.origin, self.direction, self.radius, self.reach);
        let leg_len = rail.map_or(self.reach, |h| h.distance);
        let leg = Segment::from_ray(self.origin, self.direction, leg_len);

        if let Some(distance) = self.nearest_obstacle(&leg) {
            self.done = true;
            return Some(self.origin + self.direction * distance);
        }

        match rail {
            Some(hit) if self.bounces_left > 0 => {
                self.bounces_left -= 1;
                self.origin = hit.point;
                self.direction = self.direction.mirror(hit.normal).normalize_or_zero();
                if self.direction == Vec2::ZERO {
                    self.done = true;
                }
                Some(hit.point)
            }
            Some(hit) => {
                self.done = true;
                Some(hit.point)
            }
            None => {
                self.done = true;
                Some(leg.end)
            }
        }
    }
}

/// Collect the guide polyline into a vector.
pub fn project_guide_line(
    table: &TableGeometry,
    balls: &[Ball],
    cue: &Ball,
    direction: Vec2,
    max_bounces: u32,
) -> Vec<Vec2> {
    GuidePath::new(table, balls, cue, direction, max_bounces).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BallKind;
    use crate::core::ball::BallProperties;

    fn ball(id: u32, pos: Vec2, vel: Vec2) -> Ball {
        let kind = BallKind::from_number(id as u8).unwrap();
        Ball::new(BallId(id), kind, pos, BallProperties::default())
            .unwrap()
            .with_velocity(vel)
    }

    fn table() -> TableGeometry {
        TableGeometry::new(900.0, 450.0, 30.0).unwrap()
    }

    #[test]
    fn head_on_contact_time() {
        // Gap 50 - 24 = 26 closed at 100 units/s.
        let a = ball(0, Vec2::ZERO, Vec2::new(100.0, 0.0));
        let b = ball(1, Vec2::new(50.0, 0.0), Vec2::ZERO);
        let t = time_to_ball_collision(&a, &b, 1.0).unwrap();
        assert!((t - 0.26).abs() < 1e-5);
        // Symmetric in argument order
        let t2 = time_to_ball_collision(&b, &a, 1.0).unwrap();
        assert!((t - t2).abs() < 1e-6);
    }

    #[test]
    fn contact_beyond_horizon_is_ignored() {
        let a = ball(0, Vec2::ZERO, Vec2::new(100.0, 0.0));
        let b = ball(1, Vec2::new(50.0, 0.0), Vec2::ZERO);
        assert_eq!(time_to_ball_collision(&a, &b, 0.1), None);
    }

    #[test]
    fn separating_or_missing_balls_never_collide() {
        let a = ball(0, Vec2::ZERO, Vec2::new(-100.0, 0.0));
        let b = ball(1, Vec2::new(50.0, 0.0), Vec2::ZERO);
        assert_eq!(time_to_ball_collision(&a, &b, 10.0), None);

        let c = ball(0, Vec2::ZERO, Vec2::new(100.0, 0.0));
        let d = ball(1, Vec2::new(50.0, 40.0), Vec2::ZERO);
        assert_eq!(time_to_ball_collision(&c, &d, 10.0), None);
    }

    #[test]
    fn touching_and_approaching_is_immediate() {
        let a = ball(0, Vec2::ZERO, Vec2::new(10.0, 0.0));
        let b = ball(1, Vec2::new(23.0, 0.0), Vec2::ZERO);
        assert_eq!(time_to_ball_collision(&a, &b, 1.0), Some(0.0));
    }

    #[test]
    fn circle_hit_from_outside_and_inside() {
        let seg = Segment::new(Vec2::ZERO, Vec2::new(100.0, 0.0));
        let hit = segment_circle_intersection(&seg, Vec2::new(50.0, 0.0), 10.0).unwrap();
        assert!((hit.distance - 40.0).abs() < 1e-4);
        assert!((hit.t - 0.4).abs() < 1e-5);

        // Starting inside, heading away from the center
        let away = Segment::new(Vec2::new(52.0, 0.0), Vec2::new(100.0, 0.0));
        assert!(segment_circle_intersection(&away, Vec2::new(50.0, 0.0), 10.0).is_none());
        let toward = Segment::new(Vec2::new(45.0, 0.0), Vec2::new(100.0, 0.0));
        assert_eq!(
            segment_circle_intersection(&toward, Vec2::new(50.0, 0.0), 10.0).map(|h| h.t),
            Some(0.0)
        );
    }

    #[test]
    fn crossing_segments() {
        let a = Segment::new(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));
        let b = Segment::new(Vec2::new(0.0, -10.0), Vec2::new(0.0, 10.0));
        let hit = segment_segment_intersection(&a, &b).unwrap();
        assert!(hit.point.length() < 1e-5);
        assert!((hit.distance - 10.0).abs() < 1e-4);

        let parallel = Segment::new(Vec2::new(-10.0, 5.0), Vec2::new(10.0, 5.0));
        assert!(segment_segment_intersection(&a, &parallel).is_none());
    }

    #[test]
    fn rail_hit_uses_inset_cushion() {
        let t = table();
        let hit = nearest_rail_hit(&t, Vec2::ZERO, Vec2::X, 12.0, 2000.0).unwrap();
        assert_eq!(hit.side, RailSide::Right);
        assert!((hit.point.x - 438.0).abs() < 1e-3);
        assert_eq!(hit.normal, Vec2::NEG_X);
    }

    #[test]
    fn corner_hit_combines_normals() {
        let t = TableGeometry::new(400.0, 400.0, 30.0).unwrap();
        let dir = Vec2::new(1.0, 1.0).normalize();
        let hit = nearest_rail_hit(&t, Vec2::ZERO, dir, 0.0, 2000.0).unwrap();
        assert!((hit.normal - Vec2::new(-1.0, -1.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn guide_bounces_off_cushion() {
        let t = table();
        let cue = ball(0, Vec2::new(0.0, 0.0), Vec2::ZERO);
        let balls = vec![cue.clone()];
        let dir = Vec2::new(1.0, 1.0).normalize();
        let points = project_guide_line(&t, &balls, &cue, dir, 1);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], Vec2::ZERO);
        // First contact on the top cushion (inset to y = 213)
        assert!((points[1] - Vec2::new(213.0, 213.0)).length() < 1e-2);
        // After reflecting, heads down-right to the right cushion
        assert!((points[2].x - 438.0).abs() < 1e-2);
        assert!((points[2].y - (213.0 - 225.0)).abs() < 1e-2);
    }

    #[test]
    fn ray_starting_on_a_rail_hits_it_at_once() {
        let t = table();
        let hit = nearest_rail_hit(&t, Vec2::new(438.0, 0.0), Vec2::X, 12.0, 2000.0).unwrap();
        assert_eq!(hit.side, RailSide::Right);
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.normal, Vec2::NEG_X);

        // Leaving the same rail it is skipped; the far rail is next.
        let hit = nearest_rail_hit(&t, Vec2::new(438.0, 0.0), Vec2::NEG_X, 12.0, 2000.0).unwrap();
        assert_eq!(hit.side, RailSide::Left);
        assert!((hit.point.x + 438.0).abs() < 1e-3);
    }

    #[test]
    fn guide_from_a_ball_resting_on_the_cushion_stays_on_the_table() {
        let t = table();
        let cue = ball(0, Vec2::new(438.0, 0.0), Vec2::ZERO);
        let balls = vec![cue.clone()];
        let points = project_guide_line(&t, &balls, &cue, Vec2::X, 2);
        assert_eq!(points.len(), 4);
        assert_eq!(points[1], Vec2::new(438.0, 0.0));
        assert!((points[2].x + 438.0).abs() < 1e-3);
        assert!((points[3].x - 438.0).abs() < 1e-3);
        assert!(points.iter().all(|p| t.contains(*p)));
    }

    #[test]
    fn guide_stops_at_first_obstruction() {
        let t = table();
        let cue = ball(0, Vec2::new(-200.0, 0.0), Vec2::ZERO);
        let target = ball(1, Vec2::new(0.0, 0.0), Vec2::ZERO);
        let balls = vec![cue.clone(), target];
        let points = project_guide_line(&t, &balls, &cue, Vec2::X, 2);
        assert_eq!(points.len(), 2);
        // Cue center stops one diameter short of the target center
        assert!((points[1] - Vec2::new(-24.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn guide_ignores_pocketed_balls() {
        let t = table();
        let cue = ball(0, Vec2::new(-200.0, 0.0), Vec2::ZERO);
        let mut gone = ball(1, Vec2::new(0.0, 0.0), Vec2::ZERO);
        gone.pocket();
        let balls = vec![cue.clone(), gone];
        let points = project_guide_line(&t, &balls, &cue, Vec2::X, 0);
        assert_eq!(points.len(), 2);
        assert!((points[1].x - 438.0).abs() < 1e-3);
    }

    #[test]
    fn guide_is_restartable() {
        let t = table();
        let cue = ball(0, Vec2::new(-100.0, 50.0), Vec2::ZERO);
        let other = ball(5, Vec2::new(200.0, -120.0), Vec2::ZERO);
        let balls = vec![cue.clone(), other];
        let dir = Vec2::new(0.3, -0.8);
        let first: Vec<Vec2> = GuidePath::new(&t, &balls, &cue, dir, 2).collect();
        let second: Vec<Vec2> = GuidePath::new(&t, &balls, &cue, dir, 2).collect();
        assert_eq!(first, second);
        assert!(first.len() >= 2);
    }

    #[test]
    fn zero_direction_yields_origin_only() {
        let t = table();
        let cue = ball(0, Vec2::new(10.0, 10.0), Vec2::ZERO);
        let balls = vec![cue.clone()];
        let points = project_guide_line(&t, &balls, &cue, Vec2::ZERO, 2);
        assert_eq!(points, vec![Vec2::new(10.0, 10.0)]);
    }
}
