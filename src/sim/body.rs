//! Dynamic bodies: pucks and rectangular blocks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, CircleMask};

/// Stable body identifier. Allocated monotonically and never reused, so it is
/// safe to keep in zone membership sets across pool rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Which pool a body belongs to. Pools share the same shape but follow
/// different rules once they slow down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Regular puck, removed when it comes to rest
    Puck,
    /// Settles in place and stays on the field when it comes to rest
    Settling,
    /// Launched heavy puck that turns into a regular puck once slowed
    Shooter,
    /// Rectangular blocker using the coarse rectangle response
    Block,
}

/// Collision shape
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(CircleMask),
    Rect { size: Vec2 },
}

/// A dynamic body
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    /// Visual radius, also used for zone coverage
    pub drawn_radius: f32,
    /// Radius used by the collision resolver
    pub collision_radius: f32,
    pub shape: Shape,
    pub active: bool,
}

impl Body {
    /// A circular body of any puck kind
    pub fn circle(
        id: BodyId,
        kind: BodyKind,
        pos: Vec2,
        vel: Vec2,
        mass: f32,
        drawn_radius: f32,
        collision_radius: f32,
    ) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            mass,
            drawn_radius,
            collision_radius,
            shape: Shape::Circle(CircleMask::new(collision_radius)),
            active: true,
        }
    }

    /// A rectangular block centered on `pos`
    pub fn block(id: BodyId, pos: Vec2, vel: Vec2, mass: f32, size: Vec2) -> Self {
        let half = size.min_element() * 0.5;
        Self {
            id,
            kind: BodyKind::Block,
            pos,
            vel,
            mass,
            drawn_radius: half,
            collision_radius: half,
            shape: Shape::Rect { size },
            active: true,
        }
    }

    #[inline]
    pub fn is_circle(&self) -> bool {
        matches!(self.shape, Shape::Circle(_))
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Distance from center to the playfield-facing edge on each axis
    pub fn half_extents(&self) -> Vec2 {
        match &self.shape {
            Shape::Circle(_) => Vec2::splat(self.drawn_radius),
            Shape::Rect { size } => *size * 0.5,
        }
    }

    /// Square around the drawn circle, used for zone coverage
    pub fn bounding_square(&self) -> Aabb {
        Aabb::from_center_size(self.pos, Vec2::splat(self.drawn_radius * 2.0))
    }

    /// Rectangle used by the coarse rectangle response
    pub fn collision_rect(&self) -> Aabb {
        match &self.shape {
            Shape::Circle(_) => Aabb::from_center_size(self.pos, Vec2::splat(self.collision_radius * 2.0)),
            Shape::Rect { size } => Aabb::from_center_size(self.pos, *size),
        }
    }

    /// Exact overlap test: pixel masks for two circles, rectangles otherwise
    pub fn overlaps(&self, other: &Body) -> bool {
        match (&self.shape, &other.shape) {
            (Shape::Circle(a), Shape::Circle(b)) => a.overlaps_at(self.pos, b, other.pos),
            _ => self.collision_rect().intersection(&other.collision_rect()).is_some(),
        }
    }
}
