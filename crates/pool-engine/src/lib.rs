pub mod api;
pub mod core;
pub mod input;
pub mod bridge;
pub mod rack;

// Re-export key types at crate root for convenience
pub use api::config::PhysicsConfig;
pub use api::error::{ConfigError, ShotError};
pub use api::game::PoolGame;
pub use api::types::{BallId, BallKind, BallState, ShotPhase, StepReport};
pub use core::ball::{Ball, BallProperties};
pub use core::cue::CueStick;
pub use core::intersection::{project_guide_line, GuidePath};
pub use core::physics::PhysicsEngine;
pub use core::table::{Pocket, Rail, RailSide, TableGeometry};
pub use core::time::TickClock;
pub use input::commands::{Command, CommandQueue};
pub use bridge::protocol::ProtocolLayout;
pub use bridge::snapshot::{BallInstance, PoolEvent, SnapshotBuffer};
pub use rack::standard_rack;
