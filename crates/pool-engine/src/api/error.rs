use glam::Vec2;

use crate::api::types::{BallId, BallKind};

/// Setup-time failure. Unrecoverable: the table cannot be built.
#[derive(Debug)]
pub enum ConfigError {
    /// A quantity that must be strictly positive was zero, negative or NaN.
    NonPositive { field: &'static str, value: f32 },
    /// A quantity fell outside its closed range.
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    /// A spot a ball is placed on is off the cloth or inside a pocket.
    IllegalSpot { field: &'static str, position: Vec2 },
    /// Solid/stripe ball carrying a number outside its range.
    InvalidKind(BallKind),
    DuplicateBall(BallId),
    MissingCueBall,
    MultipleCueBalls,
    Parse(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "{} must be positive, got {}", field, value)
            }
            ConfigError::OutOfRange { field, value, min, max } => {
                write!(f, "{} must lie in [{}, {}], got {}", field, min, max, value)
            }
            ConfigError::IllegalSpot { field, position } => {
                write!(f, "{} at ({}, {}) is off the cloth or inside a pocket", field, position.x, position.y)
            }
            ConfigError::InvalidKind(kind) => write!(f, "invalid ball kind: {:?}", kind),
            ConfigError::DuplicateBall(id) => write!(f, "ball id {} appears twice", id.0),
            ConfigError::MissingCueBall => write!(f, "roster has no cue ball"),
            ConfigError::MultipleCueBalls => write!(f, "roster has more than one cue ball"),
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// A shot or aim command the engine refused. The table state is untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotError {
    /// Balls are still rolling from the previous shot.
    InFlight,
    /// Power must lie in (0, 1].
    InvalidPower(f32),
    /// Angle must be finite.
    InvalidAngle(f32),
}

impl std::fmt::Display for ShotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShotError::InFlight => write!(f, "cannot shoot while balls are moving"),
            ShotError::InvalidPower(p) => write!(f, "shot power must be in (0, 1], got {}", p),
            ShotError::InvalidAngle(a) => write!(f, "shot angle must be finite, got {}", a),
        }
    }
}

impl std::error::Error for ShotError {}

/// Fails with `NonPositive` unless `value > 0` (NaN fails too).
pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Fails with `OutOfRange` unless `min <= value <= max` (NaN fails too).
pub(crate) fn require_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_not_positive() {
        assert!(require_positive("radius", f32::NAN).is_err());
        assert!(require_positive("radius", 0.0).is_err());
        assert!(require_positive("radius", 1e-6).is_ok());
    }

    #[test]
    fn range_is_inclusive() {
        assert!(require_range("e", 0.0, 0.0, 1.0).is_ok());
        assert!(require_range("e", 1.0, 0.0, 1.0).is_ok());
        assert!(require_range("e", 1.01, 0.0, 1.0).is_err());
        assert!(require_range("e", f32::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn messages_name_the_field() {
        let err = ConfigError::NonPositive { field: "ball_mass", value: -1.0 };
        assert!(err.to_string().contains("ball_mass"));
        let err = ShotError::InvalidPower(1.5);
        assert!(err.to_string().contains("1.5"));
    }
}
