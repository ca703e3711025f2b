use pool_engine::{
    Command, CommandQueue, ConfigError, PhysicsConfig, PoolEvent, PoolGame,
    ProtocolLayout, ShotPhase, SnapshotBuffer, StepReport, TickClock,
};

use crate::keys::command_for_key;

/// Drives one `PoolGame` from the host's frame loop.
///
/// Commands queue up between frames and are applied at the start of the
/// next `tick`, then the fixed-step clock decides how many physics steps to
/// run and the snapshot buffer is rebuilt for the renderer.
pub struct PoolRunner {
    game: PoolGame,
    clock: TickClock,
    commands: CommandQueue,
    snapshot: SnapshotBuffer,
    /// Every fixed tick of the current frame folded together.
    report: StepReport,
    /// Events produced during the current frame.
    events: Vec<PoolEvent>,
}

impl PoolRunner {
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        let game = PoolGame::new(config)?;
        let clock = TickClock::from_config(game.engine().config());
        let layout = ProtocolLayout::for_table(game.engine().config(), game.engine().balls().len());
        let mut snapshot = SnapshotBuffer::new(layout);
        snapshot.write(&game, &[], 0.0);
        Ok(Self {
            game,
            clock,
            commands: CommandQueue::new(),
            snapshot,
            report: StepReport::default(),
            events: Vec::new(),
        })
    }

    /// Build from a JSON config; an empty string means all defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = if json.trim().is_empty() {
            PhysicsConfig::default()
        } else {
            PhysicsConfig::from_json(json)?
        };
        Self::new(config)
    }

    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Queue the command bound to `key_code`. Returns false for unbound keys.
    pub fn key_down(&mut self, key_code: u32) -> bool {
        match command_for_key(key_code) {
            Some(command) => {
                self.commands.push(command);
                true
            }
            None => false,
        }
    }

    /// Run one host frame of `frame_dt` seconds.
    pub fn tick(&mut self, frame_dt: f32) {
        if !self.commands.is_empty() {
            let resets = self.commands.iter().any(|c| matches!(c, Command::Reset));
            log::debug!("applying {} queued commands", self.commands.len());
            self.game.apply_commands(self.commands.drain());
            if resets {
                self.clock.clear();
            }
        }

        let was_in_flight = self.game.phase() == ShotPhase::InFlight;
        let mut report = StepReport {
            settled: !was_in_flight,
            ..StepReport::default()
        };
        for _ in 0..self.clock.advance(frame_dt) {
            report.absorb(self.game.tick(self.clock.dt()));
        }
        self.events = PoolEvent::from_report(&report, was_in_flight);
        self.report = report;

        self.snapshot.write(&self.game, &self.events, self.clock.alpha());
    }

    pub fn game(&self) -> &PoolGame {
        &self.game
    }

    pub fn snapshot(&self) -> &SnapshotBuffer {
        &self.snapshot
    }

    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    pub fn last_report(&self) -> &StepReport {
        &self.report
    }

    // ---- Accessors read by the host via wasm_bindgen exports ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.snapshot.as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.snapshot.layout().buffer_total_floats as u32
    }

    pub fn ball_count(&self) -> u32 {
        self.snapshot.ball_count() as u32
    }

    pub fn guide_point_count(&self) -> u32 {
        self.snapshot.guide_point_count() as u32
    }

    pub fn event_count(&self) -> u32 {
        self.snapshot.event_count() as u32
    }

    pub fn balls_remaining(&self) -> u32 {
        self.game.balls_remaining() as u32
    }

    pub fn is_cleared(&self) -> bool {
        self.game.is_cleared()
    }

    pub fn is_idle(&self) -> bool {
        self.game.phase() == ShotPhase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KEY_R, KEY_SPACE, KEY_W};
    use pool_engine::bridge::snapshot::{EVENT_COLLISIONS, EVENT_SETTLED};

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn starts_with_a_full_snapshot() {
        let runner = PoolRunner::from_json("").unwrap();
        assert_eq!(runner.ball_count(), 16);
        assert_eq!(runner.balls_remaining(), 15);
        assert!(runner.guide_point_count() >= 2);
        assert!(runner.is_idle());
    }

    #[test]
    fn json_config_is_applied() {
        let runner = PoolRunner::from_json(r#"{ "ball_radius": 10.0 }"#).unwrap();
        assert_eq!(runner.game().engine().config().ball_radius, 10.0);
        assert!(PoolRunner::from_json(r#"{ "ball_mass": -1 }"#).is_err());
    }

    #[test]
    fn keys_drive_a_shot_until_the_table_settles() {
        let mut runner = PoolRunner::new(PhysicsConfig::default()).unwrap();
        for _ in 0..5 {
            assert!(runner.key_down(KEY_W));
        }
        assert!(runner.key_down(KEY_SPACE));
        assert!(!runner.key_down(13));
        runner.tick(FRAME);
        assert!(!runner.is_idle());
        assert_eq!(runner.guide_point_count(), 0);

        let mut settled = false;
        for _ in 0..3000 {
            runner.tick(FRAME);
            if runner.events().iter().any(|e| e.kind == EVENT_SETTLED) {
                settled = true;
                break;
            }
        }
        assert!(settled);
        assert!(runner.is_idle());
    }

    #[test]
    fn ticks_of_one_frame_fold_into_one_report() {
        let mut runner = PoolRunner::new(PhysicsConfig::default()).unwrap();
        runner.push_command(Command::SetAim { angle: 0.0, power: 1.0 });
        runner.push_command(Command::Shoot);

        let mut total_collisions = 0;
        for _ in 0..20 {
            runner.tick(0.15);
            let collision_events = runner
                .events()
                .iter()
                .filter(|e| e.kind == EVENT_COLLISIONS)
                .count();
            assert!(collision_events <= 1);
            total_collisions += runner.last_report().collisions;
        }
        assert!(total_collisions > 0);
    }

    #[test]
    fn reset_key_re_racks() {
        let mut runner = PoolRunner::new(PhysicsConfig::default()).unwrap();
        runner.push_command(Command::SetAim { angle: 0.0, power: 1.0 });
        runner.push_command(Command::Shoot);
        for _ in 0..20 {
            runner.tick(FRAME);
        }
        runner.key_down(KEY_R);
        runner.tick(FRAME);
        assert!(runner.is_idle());
        let cue = runner.snapshot().ball(0).unwrap();
        assert_eq!((cue.x, cue.y), (-225.0, 0.0));
    }
}
