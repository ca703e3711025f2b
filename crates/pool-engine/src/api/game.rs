use glam::Vec2;

use crate::api::config::PhysicsConfig;
use crate::api::error::{ConfigError, ShotError};
use crate::api::types::{BallId, ShotPhase, StepReport};
use crate::core::ball::Ball;
use crate::core::cue::CueStick;
use crate::core::physics::PhysicsEngine;
use crate::input::commands::Command;

/// One table in play: the physics engine, the cue stick and enough history
/// to re-rack. This is what a host loop drives.
#[derive(Debug, Clone)]
pub struct PoolGame {
    engine: PhysicsEngine,
    cue: CueStick,
    /// Roster as it was when the game was built, restored by `reset`.
    initial: Vec<Ball>,
    /// Object balls in the order they dropped.
    pocketed: Vec<BallId>,
    shots: u32,
}

impl PoolGame {
    /// Standard 16-ball rack.
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_engine(PhysicsEngine::with_standard_rack(config)?))
    }

    /// Wrap an engine built elsewhere. Its current roster becomes the reset state.
    pub fn from_engine(engine: PhysicsEngine) -> Self {
        let initial = engine.balls().to_vec();
        let pocketed = initial
            .iter()
            .filter(|b| b.is_pocketed())
            .map(Ball::id)
            .collect();
        Self {
            engine,
            cue: CueStick::new(),
            initial,
            pocketed,
            shots: 0,
        }
    }

    pub fn engine(&self) -> &PhysicsEngine {
        &self.engine
    }

    pub fn cue_stick(&self) -> &CueStick {
        &self.cue
    }

    pub fn phase(&self) -> ShotPhase {
        self.engine.phase()
    }

    /// Apply one input command. Aiming and shooting are refused while
    /// balls are rolling; a refused command changes nothing.
    pub fn apply_command(&mut self, command: Command) -> Result<(), ShotError> {
        match command {
            Command::Shoot => {
                self.cue.shoot(&mut self.engine)?;
                self.shots += 1;
                Ok(())
            }
            Command::AdjustAim { delta_angle, delta_power } => {
                self.require_idle()?;
                self.cue.adjust_aim(delta_angle, delta_power);
                Ok(())
            }
            Command::SetAim { angle, power } => {
                self.require_idle()?;
                self.cue.set_aim(angle, power)
            }
            Command::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Apply commands in order. Returns the ones that were refused, with why.
    pub fn apply_commands<I>(&mut self, commands: I) -> Vec<(Command, ShotError)>
    where
        I: IntoIterator<Item = Command>,
    {
        let mut rejected = Vec::new();
        for command in commands {
            if let Err(err) = self.apply_command(command) {
                log::warn!("command {:?} rejected: {}", command, err);
                rejected.push((command, err));
            }
        }
        rejected
    }

    fn require_idle(&self) -> Result<(), ShotError> {
        match self.engine.phase() {
            ShotPhase::Idle => Ok(()),
            ShotPhase::InFlight => Err(ShotError::InFlight),
        }
    }

    /// Advance the simulation one fixed step. The cue stick returns to its
    /// rest aim once the table settles after a shot.
    pub fn tick(&mut self, dt: f32) -> StepReport {
        let was_cleared = self.is_cleared();
        let was_in_flight = self.engine.phase() == ShotPhase::InFlight;
        let report = self.engine.update(dt);
        self.pocketed.extend_from_slice(&report.newly_pocketed);
        if was_in_flight && self.engine.phase() == ShotPhase::Idle {
            self.cue.reset();
        }
        if !was_cleared && self.is_cleared() {
            log::info!("table cleared in {} shots", self.shots);
        }
        report
    }

    /// Aiming guide from the cue ball along the current aim.
    /// Empty while balls are rolling.
    pub fn guide_line(&self) -> Vec<Vec2> {
        if self.engine.phase() == ShotPhase::InFlight {
            return Vec::new();
        }
        let origin = self.engine.cue_ball().position();
        let bounces = self.engine.config().max_guide_bounces;
        self.engine.guide_line(origin, self.cue.angle(), bounces)
    }

    /// Object balls still on the cloth.
    pub fn balls_remaining(&self) -> usize {
        self.engine
            .balls()
            .iter()
            .filter(|b| !b.kind().is_cue() && !b.is_pocketed())
            .count()
    }

    /// Every object ball has been pocketed.
    pub fn is_cleared(&self) -> bool {
        self.balls_remaining() == 0
    }

    pub fn pocketed(&self) -> &[BallId] {
        &self.pocketed
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Put every ball back where the game started and clear the history.
    pub fn reset(&mut self) {
        self.engine.restore(self.initial.clone());
        self.cue.reset();
        self.pocketed = self
            .initial
            .iter()
            .filter(|b| b.is_pocketed())
            .map(Ball::id)
            .collect();
        self.shots = 0;
        log::info!("table re-racked");
    }
}
