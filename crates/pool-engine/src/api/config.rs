use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::{require_positive, require_range, ConfigError};
use crate::core::ball::BallProperties;
use crate::core::table::TableGeometry;
use crate::rack::rack_positions;

/// Physical and table constants for one game instance.
///
/// Every field has a default, so a JSON document only needs the keys it
/// wants to override. Lengths are table units (renderer pixels), times are seconds.
/// The table is centered on the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Playing surface width (x extent) between the cushions.
    pub table_width: f32,
    /// Playing surface height (y extent) between the cushions.
    pub table_height: f32,
    /// A ball whose center comes within this distance of a pocket center drops.
    pub pocket_capture_radius: f32,
    pub ball_radius: f32,
    /// Ball mass in kilograms.
    pub ball_mass: f32,
    /// Coefficient of restitution for ball-ball contacts.
    pub restitution_ball: f32,
    /// Coefficient of restitution for ball-cushion contacts.
    pub restitution_rail: f32,
    /// Ball-cloth sliding friction coefficient (μ).
    pub friction_coefficient: f32,
    /// Gravitational acceleration in m/s².
    pub gravity: f32,
    /// Table units per metre, used to express μ·g in table units.
    pub units_per_meter: f32,
    /// Speeds at or below this (units/s) count as stopped.
    pub stop_speed: f32,
    /// Cue ball speed at full power (units/s).
    pub max_launch_speed: f32,
    /// Fixed simulation step in seconds.
    pub fixed_dt: f32,
    /// Ball-ball resolution passes allowed per tick.
    pub max_substeps: u32,
    /// Maximum number of cushion reflections on the aiming guide.
    pub max_guide_bounces: u32,
    /// Where the cue ball starts and where it is re-spotted after a scratch.
    pub cue_spot: Vec2,
    /// Center of the apex ball of the rack.
    pub rack_apex: Vec2,
    /// Extra spacing between neighbouring racked balls.
    pub rack_gap: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let units_per_meter = 30.48;
        Self {
            table_width: 900.0,
            table_height: 450.0,
            pocket_capture_radius: 30.0,
            ball_radius: 12.0,
            ball_mass: 0.17,
            restitution_ball: 0.96,
            restitution_rail: 0.75,
            friction_coefficient: 0.2,
            gravity: 9.8,
            units_per_meter,
            stop_speed: 0.1,
            max_launch_speed: 11.623 * units_per_meter,
            fixed_dt: 1.0 / 60.0,
            max_substeps: 4,
            max_guide_bounces: 2,
            cue_spot: Vec2::new(-225.0, 0.0),
            rack_apex: Vec2::new(225.0, 0.0),
            rack_gap: 3.75,
        }
    }
}

impl PhysicsConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rolling deceleration μ·g in table units per second².
    pub fn deceleration(&self) -> f32 {
        self.friction_coefficient * self.gravity * self.units_per_meter
    }

    /// Physical properties shared by every ball on a standard table.
    pub fn ball_properties(&self) -> BallProperties {
        BallProperties {
            radius: self.ball_radius,
            mass: self.ball_mass,
            restitution_ball: self.restitution_ball,
            restitution_rail: self.restitution_rail,
        }
    }

    /// Check every invariant. Called by `from_json` and by the engine constructor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("table_width", self.table_width)?;
        require_positive("table_height", self.table_height)?;
        require_positive("pocket_capture_radius", self.pocket_capture_radius)?;
        self.ball_properties().validate()?;
        require_range("friction_coefficient", self.friction_coefficient, 0.0, f32::MAX)?;
        require_range("gravity", self.gravity, 0.0, f32::MAX)?;
        require_positive("units_per_meter", self.units_per_meter)?;
        require_range("stop_speed", self.stop_speed, 0.0, f32::MAX)?;
        require_positive("max_launch_speed", self.max_launch_speed)?;
        require_positive("fixed_dt", self.fixed_dt)?;
        require_positive("max_substeps", self.max_substeps as f32)?;
        require_range("rack_gap", self.rack_gap, 0.0, f32::MAX)?;

        // The ball has to fit between the cushions.
        let half_x = self.table_width / 2.0 - self.ball_radius;
        let half_y = self.table_height / 2.0 - self.ball_radius;
        require_positive("table_width - 2 * ball_radius", half_x)?;
        require_positive("table_height - 2 * ball_radius", half_y)?;

        // Every starting spot must be on the cloth and clear of the pockets.
        let table = TableGeometry::from_config(self)?;
        let (min, max) = table.cushion_bounds(self.ball_radius);
        let legal = |p: Vec2| p.cmpge(min).all() && p.cmple(max).all() && table.pocket_at(p).is_none();
        if !legal(self.cue_spot) {
            return Err(ConfigError::IllegalSpot { field: "cue_spot", position: self.cue_spot });
        }
        let rack = rack_positions(self.rack_apex, self.ball_radius, self.rack_gap);
        if let Some(&position) = rack.iter().find(|p| !legal(**p)) {
            return Err(ConfigError::IllegalSpot { field: "rack", position });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PhysicsConfig::default().validate().is_ok());
    }

    #[test]
    fn deceleration_is_mu_g_in_table_units() {
        let config = PhysicsConfig::default();
        let expected = 0.2 * 9.8 * 30.48;
        assert!((config.deceleration() - expected).abs() < 1e-3);
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let json = r#"{ "ball_radius": 10.0, "restitution_rail": 0.9, "cue_spot": [-200.0, 10.0] }"#;
        let config = PhysicsConfig::from_json(json).unwrap();
        assert_eq!(config.ball_radius, 10.0);
        assert_eq!(config.restitution_rail, 0.9);
        assert_eq!(config.cue_spot, Vec2::new(-200.0, 10.0));
        assert_eq!(config.table_width, 900.0);
    }

    #[test]
    fn restitution_above_one_is_rejected() {
        let json = r#"{ "restitution_ball": 1.2 }"#;
        let err = PhysicsConfig::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange { field: "restitution_ball", .. }
        ));
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let config = PhysicsConfig {
            ball_mass: 0.0,
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { field: "mass", .. })
        ));
    }

    #[test]
    fn cue_spot_off_the_cloth_is_rejected() {
        let config = PhysicsConfig {
            cue_spot: Vec2::new(500.0, 0.0),
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn cue_spot_inside_a_pocket_is_rejected() {
        let config = PhysicsConfig {
            cue_spot: Vec2::new(430.0, 205.0),
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IllegalSpot { field: "cue_spot", .. })
        ));
        // Mid-rail pocket too
        let config = PhysicsConfig {
            cue_spot: Vec2::new(0.0, -200.0),
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rack_must_fit_on_the_cloth() {
        let off_the_end = PhysicsConfig {
            rack_apex: Vec2::new(400.0, 0.0),
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            off_the_end.validate(),
            Err(ConfigError::IllegalSpot { field: "rack", .. })
        ));

        let in_the_side_pocket = PhysicsConfig {
            rack_apex: Vec2::new(-90.0, 157.0),
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            in_the_side_pocket.validate(),
            Err(ConfigError::IllegalSpot { field: "rack", .. })
        ));
    }

    #[test]
    fn zero_substeps_is_rejected() {
        let config = PhysicsConfig {
            max_substeps: 0,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = PhysicsConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
