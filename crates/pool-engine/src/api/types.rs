use glam::Vec2;

/// Stable identifier of a ball within a roster.
/// The standard rack uses the ball number (cue ball = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BallId(pub u32);

/// What a ball is, as far as the rules layer and renderer care.
/// Physics never looks at this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallKind {
    Cue,
    /// Solid ball numbered 1-7.
    Solid(u8),
    Eight,
    /// Striped ball numbered 9-15.
    Stripe(u8),
}

impl BallKind {
    /// Map a ball number to its kind (0 = cue, 8 = eight ball).
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            0 => Some(BallKind::Cue),
            1..=7 => Some(BallKind::Solid(number)),
            8 => Some(BallKind::Eight),
            9..=15 => Some(BallKind::Stripe(number)),
            _ => None,
        }
    }

    /// The number printed on the ball (0 for the cue ball).
    pub fn number(self) -> u8 {
        match self {
            BallKind::Cue => 0,
            BallKind::Solid(n) | BallKind::Stripe(n) => n,
            BallKind::Eight => 8,
        }
    }

    pub fn is_cue(self) -> bool {
        matches!(self, BallKind::Cue)
    }

    /// Whether the carried number lies in the range for its kind.
    pub fn is_valid(self) -> bool {
        match self {
            BallKind::Cue | BallKind::Eight => true,
            BallKind::Solid(n) => (1..=7).contains(&n),
            BallKind::Stripe(n) => (9..=15).contains(&n),
        }
    }

    /// Numeric code used on the renderer wire format.
    pub fn code(self) -> u8 {
        match self {
            BallKind::Cue => 0,
            BallKind::Solid(_) => 1,
            BallKind::Eight => 2,
            BallKind::Stripe(_) => 3,
        }
    }
}

/// Read-only snapshot of one ball, handed to the renderer every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    pub id: BallId,
    pub kind: BallKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub pocketed: bool,
}

/// Where the table is in the shot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotPhase {
    /// Everything at rest; aiming and shooting are allowed.
    #[default]
    Idle,
    /// At least one ball is rolling since the last shot.
    InFlight,
}

/// Outcome of a single `PhysicsEngine::update` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// No non-pocketed ball is moving.
    pub settled: bool,
    /// Object balls captured during this tick, in roster order.
    pub newly_pocketed: Vec<BallId>,
    /// The cue ball was captured and re-spotted during this tick.
    pub scratch: bool,
    /// Number of ball-ball impulses applied.
    pub collisions: u32,
    /// The sub-step bound was hit with contacts still pending.
    pub degraded: bool,
}

impl StepReport {
    /// Fold a later report into this one (used when several fixed ticks run per frame).
    pub fn absorb(&mut self, later: StepReport) {
        self.settled = later.settled;
        self.newly_pocketed.extend(later.newly_pocketed);
        self.scratch |= later.scratch;
        self.collisions += later.collisions;
        self.degraded |= later.degraded;
    }
}
