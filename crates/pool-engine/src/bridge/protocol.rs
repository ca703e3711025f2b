//! Flat frame buffer shared with the table renderer.
//! Must stay in sync with the host-side reader.
//!
//! Layout (all values f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Balls: max_balls × 12 floats]
//! [Guide: max_guide_points × 2 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header once; the host reads them back to
//! compute the section offsets.

use crate::api::config::PhysicsConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_TABLE_WIDTH: usize = 2;
pub const HEADER_TABLE_HEIGHT: usize = 3;
pub const HEADER_MAX_BALLS: usize = 4;
pub const HEADER_BALL_COUNT: usize = 5;
pub const HEADER_MAX_GUIDE_POINTS: usize = 6;
pub const HEADER_GUIDE_POINT_COUNT: usize = 7;
pub const HEADER_MAX_EVENTS: usize = 8;
pub const HEADER_EVENT_COUNT: usize = 9;
/// 0 = idle, 1 = in flight.
pub const HEADER_PHASE: usize = 10;
pub const HEADER_CUE_ANGLE: usize = 11;
pub const HEADER_CUE_POWER: usize = 12;
pub const HEADER_BALLS_REMAINING: usize = 13;
/// Render interpolation fraction between fixed ticks.
pub const HEADER_ALPHA: usize = 14;
pub const HEADER_POCKET_RADIUS: usize = 15;

pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per ball instance (see `BallInstance`).
pub const BALL_FLOATS: usize = 12;

/// Floats per guide point: x, y.
pub const GUIDE_POINT_FLOATS: usize = 2;

/// Floats per event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Default event capacity per frame.
pub const DEFAULT_MAX_EVENTS: usize = 32;

/// Section sizes and offsets for given capacities.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_balls: usize,
    pub max_guide_points: usize,
    pub max_events: usize,

    pub ball_data_offset: usize,
    pub guide_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_balls: usize, max_guide_points: usize, max_events: usize) -> Self {
        let ball_data_offset = HEADER_FLOATS;
        let guide_data_offset = ball_data_offset + max_balls * BALL_FLOATS;
        let event_data_offset = guide_data_offset + max_guide_points * GUIDE_POINT_FLOATS;
        let buffer_total_floats = event_data_offset + max_events * EVENT_FLOATS;

        Self {
            max_balls,
            max_guide_points,
            max_events,
            ball_data_offset,
            guide_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Room for `max_balls` balls and a full guide line: origin, one point
    /// per bounce and the end point.
    pub fn for_table(config: &PhysicsConfig, max_balls: usize) -> Self {
        let max_guide_points = config.max_guide_bounces as usize + 2;
        Self::new(max_balls, max_guide_points, DEFAULT_MAX_EVENTS)
    }
}
