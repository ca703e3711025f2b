//! Standard 8-ball rack and ball palette.

use glam::Vec2;

use crate::api::config::PhysicsConfig;
use crate::api::error::ConfigError;
use crate::api::types::{BallId, BallKind};
use crate::core::ball::Ball;

/// Linear RGB in `[0, 1]`.
pub type Rgb = [f32; 3];

const CUE_RGB8: [u8; 3] = [230, 220, 200];

/// Colours of balls 1-8. Stripes 9-15 reuse 1-7.
const NUMBER_RGB8: [[u8; 3]; 8] = [
    [200, 160, 50],  // golden yellow
    [70, 110, 150],  // slate blue
    [180, 60, 50],   // coral red
    [120, 90, 140],  // lavender
    [200, 120, 70],  // peach orange
    [80, 140, 110],  // sage green
    [90, 45, 35],    // brick
    [20, 20, 20],    // charcoal (8-ball)
];

fn to_rgb([r, g, b]: [u8; 3]) -> Rgb {
    [f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0]
}

/// Identifying colour for a ball: its body colour for solids and the
/// eight, its stripe colour for stripes.
pub fn ball_color(kind: BallKind) -> Rgb {
    let rgb8 = match kind {
        BallKind::Cue => CUE_RGB8,
        BallKind::Solid(n) => NUMBER_RGB8[usize::from(n.clamp(1, 7)) - 1],
        BallKind::Eight => NUMBER_RGB8[7],
        BallKind::Stripe(n) => NUMBER_RGB8[usize::from(n.clamp(9, 15) - 8) - 1],
    };
    to_rgb(rgb8)
}

/// (ball number, row, offset across the row in ball spacings).
/// Row 0 is the apex nearest the cue ball; rows grow toward +x.
///
/// ```text
///  1
///  9   2
///  3   8  10
/// 11   4   5  12
///  6  13  14   7  15
/// ```
const RACK_LAYOUT: [(u8, u8, f32); 15] = [
    (1, 0, 0.0),
    (9, 1, -0.5), (2, 1, 0.5),
    (3, 2, -1.0), (8, 2, 0.0), (10, 2, 1.0),
    (11, 3, -1.5), (4, 3, -0.5), (5, 3, 0.5), (12, 3, 1.5),
    (6, 4, -2.0), (13, 4, -1.0), (14, 4, 0.0), (7, 4, 1.0), (15, 4, 2.0),
];

/// Positions of balls 1-15 (index = number - 1) in a tight triangle.
/// Neighbouring centers sit `2 * radius + gap` apart.
pub fn rack_positions(apex: Vec2, radius: f32, gap: f32) -> [Vec2; 15] {
    let spacing = 2.0 * radius + gap;
    let row_step = spacing * 3f32.sqrt() / 2.0;
    let mut positions = [Vec2::ZERO; 15];
    for (number, row, across) in RACK_LAYOUT {
        positions[usize::from(number) - 1] =
            Vec2::new(apex.x + f32::from(row) * row_step, apex.y + across * spacing);
    }
    positions
}

/// Full 16-ball roster: cue ball on the cue spot and fifteen object balls
/// racked at the apex. Ids equal ball numbers.
pub fn standard_rack(config: &PhysicsConfig) -> Result<Vec<Ball>, ConfigError> {
    let props = config.ball_properties();
    let positions = rack_positions(config.rack_apex, config.ball_radius, config.rack_gap);

    let mut balls = Vec::with_capacity(16);
    balls.push(Ball::new(BallId(0), BallKind::Cue, config.cue_spot, props)?);
    for (i, position) in positions.into_iter().enumerate() {
        let number = i as u8 + 1;
        let kind = BallKind::from_number(number).ok_or(ConfigError::InvalidKind(BallKind::Solid(number)))?;
        balls.push(Ball::new(BallId(u32::from(number)), kind, position, props)?);
    }
    log::debug!("racked {} balls at {:?}", balls.len(), config.rack_apex);
    Ok(balls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rack_has_sixteen_distinct_balls() {
        let balls = standard_rack(&PhysicsConfig::default()).unwrap();
        assert_eq!(balls.len(), 16);
        assert!(balls[0].kind().is_cue());
        for (i, ball) in balls.iter().enumerate() {
            assert_eq!(ball.id(), BallId(i as u32));
            assert_eq!(ball.kind().number() as usize, i);
        }
    }

    #[test]
    fn racked_balls_do_not_overlap() {
        let config = PhysicsConfig::default();
        let positions = rack_positions(config.rack_apex, config.ball_radius, config.rack_gap);
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let d = positions[i].distance(positions[j]);
                assert!(d >= 2.0 * config.ball_radius, "balls {} and {} overlap", i + 1, j + 1);
            }
        }
    }

    #[test]
    fn eight_ball_sits_in_the_middle_of_row_three() {
        let apex = Vec2::new(100.0, 0.0);
        let positions = rack_positions(apex, 10.0, 0.0);
        assert_eq!(positions[0], apex);
        let eight = positions[7];
        assert!((eight.y - apex.y).abs() < 1e-5);
        assert!((eight.x - (apex.x + 2.0 * 20.0 * 3f32.sqrt() / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn rack_stays_on_the_table() {
        let config = PhysicsConfig::default();
        let half = Vec2::new(config.table_width, config.table_height) / 2.0 - config.ball_radius;
        for ball in standard_rack(&config).unwrap() {
            let p = ball.position();
            assert!(p.x.abs() <= half.x && p.y.abs() <= half.y);
        }
    }

    #[test]
    fn stripes_share_colours_with_solids() {
        assert_eq!(ball_color(BallKind::Stripe(9)), ball_color(BallKind::Solid(1)));
        assert_eq!(ball_color(BallKind::Stripe(15)), ball_color(BallKind::Solid(7)));
        assert_ne!(ball_color(BallKind::Eight), ball_color(BallKind::Cue));
    }

    #[test]
    fn invalid_props_fail_the_rack() {
        let config = PhysicsConfig { ball_mass: -1.0, ..PhysicsConfig::default() };
        assert!(standard_rack(&config).is_err());
    }
}
