use bytemuck::{Pod, Zeroable};

use crate::api::game::PoolGame;
use crate::api::types::{BallState, ShotPhase, StepReport};
use crate::bridge::protocol::*;
use crate::rack::ball_color;

/// Per-ball render data. 12 floats = 48 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Number printed on the ball, 0 for the cue ball.
    pub number: f32,
    /// `BallKind::code`.
    pub kind: f32,
    /// 1.0 once pocketed; the renderer skips these.
    pub pocketed: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub vx: f32,
    pub vy: f32,
    pub _pad: f32,
}

impl BallInstance {
    pub const FLOATS: usize = BALL_FLOATS;

    pub fn from_state(state: &BallState) -> Self {
        let [r, g, b] = ball_color(state.kind);
        Self {
            x: state.position.x,
            y: state.position.y,
            radius: state.radius,
            number: f32::from(state.kind.number()),
            kind: f32::from(state.kind.code()),
            pocketed: if state.pocketed { 1.0 } else { 0.0 },
            r,
            g,
            b,
            vx: state.velocity.x,
            vy: state.velocity.y,
            _pad: 0.0,
        }
    }
}

/// Event kinds written to the event section.
pub const EVENT_POCKETED: f32 = 1.0;
pub const EVENT_SCRATCH: f32 = 2.0;
pub const EVENT_SETTLED: f32 = 3.0;
pub const EVENT_COLLISIONS: f32 = 4.0;
pub const EVENT_DEGRADED: f32 = 5.0;

/// One step event: kind plus three payload floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PoolEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl PoolEvent {
    fn new(kind: f32, a: f32) -> Self {
        Self { kind, a, b: 0.0, c: 0.0 }
    }

    /// Events describing one step report. `was_in_flight` tells whether the
    /// step started with balls rolling, so `settled` is only emitted once.
    pub fn from_report(report: &StepReport, was_in_flight: bool) -> Vec<PoolEvent> {
        let mut events: Vec<PoolEvent> = report
            .newly_pocketed
            .iter()
            .map(|id| PoolEvent::new(EVENT_POCKETED, id.0 as f32))
            .collect();
        if report.scratch {
            events.push(PoolEvent::new(EVENT_SCRATCH, 0.0));
        }
        if report.collisions > 0 {
            events.push(PoolEvent::new(EVENT_COLLISIONS, report.collisions as f32));
        }
        if report.degraded {
            events.push(PoolEvent::new(EVENT_DEGRADED, 0.0));
        }
        if report.settled && was_in_flight {
            events.push(PoolEvent::new(EVENT_SETTLED, 0.0));
        }
        events
    }
}

/// The frame buffer the host reads. Rebuilt from a `PoolGame` every frame.
pub struct SnapshotBuffer {
    layout: ProtocolLayout,
    data: Vec<f32>,
    frame: u32,
}

impl SnapshotBuffer {
    pub fn new(layout: ProtocolLayout) -> Self {
        let mut data = vec![0.0; layout.buffer_total_floats];
        data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        data[HEADER_MAX_BALLS] = layout.max_balls as f32;
        data[HEADER_MAX_GUIDE_POINTS] = layout.max_guide_points as f32;
        data[HEADER_MAX_EVENTS] = layout.max_events as f32;
        Self { layout, data, frame: 0 }
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    /// Rewrite every section from the current game state.
    pub fn write(&mut self, game: &PoolGame, events: &[PoolEvent], alpha: f32) {
        self.frame = self.frame.wrapping_add(1);
        let engine = game.engine();
        let config = engine.config();

        let balls: Vec<BallInstance> = engine
            .ball_states()
            .take(self.layout.max_balls)
            .map(|s| BallInstance::from_state(&s))
            .collect();
        if engine.balls().len() > balls.len() {
            log::warn!(
                "snapshot holds {} balls, {} dropped",
                balls.len(),
                engine.balls().len() - balls.len()
            );
        }
        let start = self.layout.ball_data_offset;
        let floats: &[f32] = bytemuck::cast_slice(&balls);
        self.data[start..start + floats.len()].copy_from_slice(floats);

        let guide = game.guide_line();
        let guide_count = guide.len().min(self.layout.max_guide_points);
        let start = self.layout.guide_data_offset;
        for (i, point) in guide.iter().take(guide_count).enumerate() {
            self.data[start + i * GUIDE_POINT_FLOATS] = point.x;
            self.data[start + i * GUIDE_POINT_FLOATS + 1] = point.y;
        }

        let event_count = events.len().min(self.layout.max_events);
        if events.len() > event_count {
            log::warn!("snapshot event overflow: {} dropped", events.len() - event_count);
        }
        let start = self.layout.event_data_offset;
        let floats: &[f32] = bytemuck::cast_slice(&events[..event_count]);
        self.data[start..start + floats.len()].copy_from_slice(floats);

        let cue = game.cue_stick();
        let header = &mut self.data[..HEADER_FLOATS];
        header[HEADER_FRAME_COUNTER] = self.frame as f32;
        header[HEADER_TABLE_WIDTH] = config.table_width;
        header[HEADER_TABLE_HEIGHT] = config.table_height;
        header[HEADER_BALL_COUNT] = balls.len() as f32;
        header[HEADER_GUIDE_POINT_COUNT] = guide_count as f32;
        header[HEADER_EVENT_COUNT] = event_count as f32;
        header[HEADER_PHASE] = match game.phase() {
            ShotPhase::Idle => 0.0,
            ShotPhase::InFlight => 1.0,
        };
        header[HEADER_CUE_ANGLE] = cue.angle();
        header[HEADER_CUE_POWER] = cue.power();
        header[HEADER_BALLS_REMAINING] = game.balls_remaining() as f32;
        header[HEADER_ALPHA] = alpha;
        header[HEADER_POCKET_RADIUS] = config.pocket_capture_radius;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn ball_count(&self) -> usize {
        self.data[HEADER_BALL_COUNT] as usize
    }

    pub fn guide_point_count(&self) -> usize {
        self.data[HEADER_GUIDE_POINT_COUNT] as usize
    }

    pub fn event_count(&self) -> usize {
        self.data[HEADER_EVENT_COUNT] as usize
    }

    /// Ball instance `index` as last written.
    pub fn ball(&self, index: usize) -> Option<BallInstance> {
        if index >= self.ball_count() {
            return None;
        }
        let start = self.layout.ball_data_offset + index * BALL_FLOATS;
        let floats = &self.data[start..start + BALL_FLOATS];
        Some(bytemuck::cast_slice::<f32, BallInstance>(floats)[0])
    }
}
