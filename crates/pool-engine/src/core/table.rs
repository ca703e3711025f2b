use glam::Vec2;

use crate::api::config::PhysicsConfig;
use crate::api::error::{require_positive, ConfigError};
use crate::core::vector::Segment;

/// Which cushion a rail is. The table is centered on the origin with +y up,
/// so `Top` is the cushion at `y = +height / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RailSide {
    Top,
    Right,
    Bottom,
    Left,
}

/// One cushion line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rail {
    pub side: RailSide,
    pub segment: Segment,
    /// Unit normal pointing into the playing area.
    pub normal: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    pub center: Vec2,
    pub capture_radius: f32,
}

impl Pocket {
    pub fn captures(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.capture_radius * self.capture_radius
    }
}

/// Immutable rectangle of cloth bounded by four rails, with pockets.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGeometry {
    width: f32,
    height: f32,
    rails: [Rail; 4],
    pockets: Vec<Pocket>,
}

impl TableGeometry {
    /// Standard six-pocket table: four corners and the middle of the long rails.
    pub fn new(width: f32, height: f32, capture_radius: f32) -> Result<Self, ConfigError> {
        require_positive("pocket_capture_radius", capture_radius)?;
        let hw = width / 2.0;
        let hh = height / 2.0;
        let pockets = [
            Vec2::new(-hw, hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(0.0, hh),
            Vec2::new(0.0, -hh),
        ]
        .into_iter()
        .map(|center| Pocket { center, capture_radius })
        .collect();
        Self::with_pockets(width, height, pockets)
    }

    /// Table with a custom pocket layout.
    pub fn with_pockets(width: f32, height: f32, pockets: Vec<Pocket>) -> Result<Self, ConfigError> {
        require_positive("table_width", width)?;
        require_positive("table_height", height)?;
        for pocket in &pockets {
            require_positive("pocket_capture_radius", pocket.capture_radius)?;
        }
        Ok(Self {
            width,
            height,
            rails: rails_for(width / 2.0, height / 2.0),
            pockets,
        })
    }

    pub fn from_config(config: &PhysicsConfig) -> Result<Self, ConfigError> {
        Self::new(config.table_width, config.table_height, config.pocket_capture_radius)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Top, right, bottom, left.
    pub fn rails(&self) -> &[Rail] {
        &self.rails
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    /// Whether a point lies on the cloth (boundary included).
    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.half_extents();
        point.x.abs() <= half.x && point.y.abs() <= half.y
    }

    /// Bounds a ball center of the given radius may occupy.
    pub fn cushion_bounds(&self, radius: f32) -> (Vec2, Vec2) {
        let half = self.half_extents() - Vec2::splat(radius);
        (-half, half)
    }

    /// Rails moved inward by `radius`: the lines a ball center touches when
    /// its edge meets a cushion.
    pub fn cushion_rails(&self, radius: f32) -> [Rail; 4] {
        let half = self.half_extents() - Vec2::splat(radius);
        rails_for(half.x, half.y)
    }

    /// Index of the first pocket that captures `point`.
    pub fn pocket_at(&self, point: Vec2) -> Option<usize> {
        self.pockets.iter().position(|p| p.captures(point))
    }
}

fn rails_for(hw: f32, hh: f32) -> [Rail; 4] {
    let top_left = Vec2::new(-hw, hh);
    let top_right = Vec2::new(hw, hh);
    let bottom_right = Vec2::new(hw, -hh);
    let bottom_left = Vec2::new(-hw, -hh);
    [
        Rail {
            side: RailSide::Top,
            segment: Segment::new(top_left, top_right),
            normal: Vec2::NEG_Y,
        },
        Rail {
            side: RailSide::Right,
            segment: Segment::new(top_right, bottom_right),
            normal: Vec2::NEG_X,
        },
        Rail {
            side: RailSide::Bottom,
            segment: Segment::new(bottom_right, bottom_left),
            normal: Vec2::Y,
        },
        Rail {
            side: RailSide::Left,
            segment: Segment::new(bottom_left, top_left),
            normal: Vec2::X,
        },
    ]
}
