use glam::Vec2;

use crate::api::config::PhysicsConfig;
use crate::api::error::{ConfigError, ShotError};
use crate::api::types::{BallId, BallState, ShotPhase, StepReport};
use crate::core::ball::Ball;
use crate::core::cue::{aim_direction, launch_velocity, validate_shot};
use crate::core::intersection::{time_to_ball_collision, GuidePath};
use crate::core::table::TableGeometry;
use crate::rack;

// ---------------------------------------------------------------------------
// Helpers (private)
// ---------------------------------------------------------------------------

/// Mutable borrows of two distinct balls, `i < j`.
fn pair_mut(balls: &mut [Ball], i: usize, j: usize) -> (&mut Ball, &mut Ball) {
    let (head, tail) = balls.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Earliest ball-ball contact within `horizon`, as `(t, i, j)` with `i < j`.
/// Pairs are visited in ascending id order and only a strictly earlier
/// contact replaces the current best, so ties go to the lowest id pair.
fn earliest_contact(balls: &[Ball], horizon: f32) -> Option<(f32, usize, usize)> {
    let mut best: Option<(f32, usize, usize)> = None;
    for i in 0..balls.len() {
        if balls[i].is_pocketed() {
            continue;
        }
        for j in (i + 1)..balls.len() {
            if balls[j].is_pocketed() {
                continue;
            }
            let Some(t) = time_to_ball_collision(&balls[i], &balls[j], horizon) else {
                continue;
            };
            if best.map_or(true, |(bt, _, _)| t < bt) {
                best = Some((t, i, j));
            }
        }
    }
    best
}

fn advance_all(balls: &mut [Ball], dt: f32) {
    for ball in balls.iter_mut().filter(|b| !b.is_pocketed()) {
        ball.advance(dt);
    }
}

// ---------------------------------------------------------------------------
// PhysicsEngine
// ---------------------------------------------------------------------------

/// Owns the ball roster and table and advances them one tick at a time.
///
/// The roster is kept sorted by ball id, which fixes the pair order of the
/// collision pass. Pocketed balls stay in the roster but are skipped by
/// every pass.
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    config: PhysicsConfig,
    table: TableGeometry,
    balls: Vec<Ball>,
    cue: usize,
    phase: ShotPhase,
}

impl PhysicsEngine {
    /// Validate the config and roster and build an engine at rest.
    ///
    /// The roster must contain exactly one cue ball and no repeated ids.
    pub fn new(config: PhysicsConfig, mut balls: Vec<Ball>) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = TableGeometry::from_config(&config)?;

        balls.sort_by_key(|b| b.id());
        if let Some(pair) = balls.windows(2).find(|w| w[0].id() == w[1].id()) {
            return Err(ConfigError::DuplicateBall(pair[0].id()));
        }
        let mut cues = balls.iter().enumerate().filter(|(_, b)| b.kind().is_cue());
        let cue = match (cues.next(), cues.next()) {
            (Some((index, _)), None) => index,
            (None, _) => return Err(ConfigError::MissingCueBall),
            (Some(_), Some(_)) => return Err(ConfigError::MultipleCueBalls),
        };

        log::info!(
            "physics engine ready: {} balls on {}x{} table",
            balls.len(),
            table.width(),
            table.height()
        );
        Ok(Self {
            config,
            table,
            balls,
            cue,
            phase: ShotPhase::Idle,
        })
    }

    /// Engine with the standard 16-ball rack.
    pub fn with_standard_rack(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let balls = rack::standard_rack(&config)?;
        Self::new(config, balls)
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn table(&self) -> &TableGeometry {
        &self.table
    }

    /// Every ball, pocketed or not, in id order.
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    pub fn cue_ball(&self) -> &Ball {
        &self.balls[self.cue]
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls
            .binary_search_by_key(&id, |b| b.id())
            .ok()
            .map(|i| &self.balls[i])
    }

    /// Snapshot of one ball for the renderer.
    pub fn ball_state(&self, id: BallId) -> Option<BallState> {
        self.ball(id).map(Ball::state)
    }

    pub fn ball_states(&self) -> impl Iterator<Item = BallState> + '_ {
        self.balls.iter().map(Ball::state)
    }

    /// True when no ball on the cloth is moving faster than the stop speed.
    pub fn is_settled(&self) -> bool {
        let stop = self.config.stop_speed;
        self.balls
            .iter()
            .filter(|b| !b.is_pocketed())
            .all(|b| !b.is_moving(stop))
    }

    /// Strike the cue ball. Only allowed while `Idle`.
    ///
    /// Returns the launch velocity. On error nothing is changed.
    pub fn shoot(&mut self, angle: f32, power: f32) -> Result<Vec2, ShotError> {
        if self.phase == ShotPhase::InFlight {
            log::warn!("shot rejected: balls still moving");
            return Err(ShotError::InFlight);
        }
        validate_shot(angle, power)?;

        let velocity = launch_velocity(angle, power, self.config.max_launch_speed);
        self.balls[self.cue].set_velocity(velocity);
        self.phase = ShotPhase::InFlight;
        log::info!("shot: angle {:.3} rad, power {:.2}, velocity {:?}", angle, power, velocity);
        Ok(velocity)
    }

    /// Advance the table by `dt` seconds.
    ///
    /// Order: friction, ball-ball contacts (with bounded sub-stepping),
    /// cushions, pockets. A non-positive or NaN `dt` changes nothing.
    pub fn update(&mut self, dt: f32) -> StepReport {
        let mut report = StepReport::default();
        if !(dt > 0.0) {
            report.settled = self.is_settled();
            return report;
        }

        self.apply_friction(dt);
        self.integrate(dt, &mut report);
        self.resolve_cushions();
        self.capture_pockets(&mut report);

        report.settled = self.is_settled();
        if report.settled {
            for ball in self.balls.iter_mut() {
                ball.set_velocity(Vec2::ZERO);
            }
            if self.phase == ShotPhase::InFlight {
                self.phase = ShotPhase::Idle;
                log::debug!("table settled");
            }
        }
        report
    }

    fn apply_friction(&mut self, dt: f32) {
        let deceleration = self.config.deceleration();
        let stop = self.config.stop_speed;
        for ball in self.balls.iter_mut().filter(|b| !b.is_pocketed()) {
            ball.apply_friction(dt, deceleration, stop);
        }
    }

    /// Move every active ball through `dt`, stopping at each ball-ball
    /// contact to resolve it. After `max_substeps` contacts the rest of the
    /// tick is integrated without further resolution and the report is
    /// marked degraded.
    fn integrate(&mut self, dt: f32, report: &mut StepReport) {
        let mut remaining = dt;
        let mut passes = 0;
        while let Some((t, i, j)) = earliest_contact(&self.balls, remaining) {
            if passes >= self.config.max_substeps {
                log::warn!(
                    "sub-step bound ({}) reached with contacts pending; finishing tick unresolved",
                    self.config.max_substeps
                );
                report.degraded = true;
                break;
            }
            advance_all(&mut self.balls, t);
            remaining -= t;

            let (a, b) = pair_mut(&mut self.balls, i, j);
            if a.resolve_collision_with(b) {
                report.collisions += 1;
                log::debug!("collision {:?} <-> {:?} at +{:.4}s", a.id(), b.id(), dt - remaining);
            }
            passes += 1;
        }
        advance_all(&mut self.balls, remaining.max(0.0));
    }

    /// Clamp centers into the cushion rectangle. A ball is reflected only
    /// when it is heading into the cushion it touched.
    fn resolve_cushions(&mut self) {
        for ball in self.balls.iter_mut().filter(|b| !b.is_pocketed()) {
            let (min, max) = self.table.cushion_bounds(ball.radius());
            let mut position = ball.position();
            let velocity = ball.velocity();

            if position.x < min.x || position.x > max.x {
                let into_rail = (position.x < min.x && velocity.x < 0.0)
                    || (position.x > max.x && velocity.x > 0.0);
                position.x = position.x.clamp(min.x, max.x);
                if into_rail {
                    ball.reflect_vertical_rail();
                }
            }
            if position.y < min.y || position.y > max.y {
                let into_rail = (position.y < min.y && velocity.y < 0.0)
                    || (position.y > max.y && velocity.y > 0.0);
                position.y = position.y.clamp(min.y, max.y);
                if into_rail {
                    ball.reflect_horizontal_rail();
                }
            }
            ball.set_position(position);
        }
    }

    fn capture_pockets(&mut self, report: &mut StepReport) {
        let spot = self.config.cue_spot;
        for index in 0..self.balls.len() {
            if self.balls[index].is_pocketed() {
                continue;
            }
            let Some(pocket) = self.table.pocket_at(self.balls[index].position()) else {
                continue;
            };
            if index == self.cue {
                if let Some(blocker) = self.cue_spot_blocker() {
                    log::warn!("cue spot {:?} is covered by ball {}; respotting on top of it", spot, blocker.0);
                }
                self.balls[index].respot(spot);
                report.scratch = true;
                log::info!("scratch: cue ball dropped into pocket {}, respotted at {:?}", pocket, spot);
            } else {
                let ball = &mut self.balls[index];
                ball.pocket();
                report.newly_pocketed.push(ball.id());
                log::info!("ball {} pocketed into pocket {}", ball.kind().number(), pocket);
            }
        }
    }

    /// Object ball that would overlap the cue ball if it were spotted on
    /// the cue spot now.
    pub fn cue_spot_blocker(&self) -> Option<BallId> {
        let spot = self.config.cue_spot;
        let cue_radius = self.balls[self.cue].radius();
        self.balls
            .iter()
            .enumerate()
            .filter(|(i, b)| *i != self.cue && !b.is_pocketed())
            .find(|(_, b)| b.position().distance(spot) < b.radius() + cue_radius)
            .map(|(_, b)| b.id())
    }

    /// Lazy guide polyline for the cue ball aimed at `angle`, starting at
    /// `origin`.
    pub fn guide_path(&self, origin: Vec2, angle: f32, max_bounces: u32) -> GuidePath<'_> {
        GuidePath::new(&self.table, &self.balls, self.cue_ball(), aim_direction(angle), max_bounces)
            .starting_at(origin)
    }

    /// Guide polyline for rendering. Same inputs, same points.
    pub fn guide_line(&self, origin: Vec2, angle: f32, max_bounces: u32) -> Vec<Vec2> {
        self.guide_path(origin, angle, max_bounces).collect()
    }

    /// Put every ball back to the given roster and return to `Idle`.
    pub(crate) fn restore(&mut self, balls: Vec<Ball>) {
        self.balls = balls;
        self.phase = ShotPhase::Idle;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
