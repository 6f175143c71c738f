//! Collision detection and response between dynamic bodies
//!
//! Pucks use an impulse exchange along the center-to-center normal, damped by
//! a slipperiness factor. Anything involving a rectangle falls back to a coarse
//! push-out along the axis of least penetration.

use glam::Vec2;

use super::body::{Body, Shape};
use crate::consts::{NUDGE_DIVISOR, SLIPPERINESS};

/// Tunables for the resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionParams {
    /// Fraction of the elastic impulse exchanged (< 1 loses energy)
    pub slipperiness: f32,
    /// Each body moves `(2r - distance) / nudge_divisor` when depenetrating
    pub nudge_divisor: f32,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            slipperiness: SLIPPERINESS,
            nudge_divisor: NUDGE_DIVISOR,
        }
    }
}

/// Resolve a pair of bodies in place. Returns whether they overlapped.
pub fn resolve_pair(a: &mut Body, b: &mut Body, params: &CollisionParams) -> bool {
    match (&a.shape, &b.shape) {
        (Shape::Circle(_), Shape::Circle(_)) => resolve_circles(a, b, params),
        _ => resolve_rects(a, b),
    }
}

/// Puck-vs-puck: exact mask test, depenetration nudge, one-sided impulse
pub fn resolve_circles(a: &mut Body, b: &mut Body, params: &CollisionParams) -> bool {
    if !a.overlaps(b) {
        return false;
    }

    let contact = 2.0 * a.collision_radius.min(b.collision_radius);
    let distance = (b.pos - a.pos).length();
    if distance < contact {
        // Coincident centers leave the direction at zero: no nudge, no NaN
        let dir = (b.pos - a.pos).normalize_or_zero();
        let nudge = (contact - distance) / params.nudge_divisor;
        a.pos -= dir * nudge;
        b.pos += dir * nudge;
    }

    let normal = (b.pos - a.pos).normalize_or_zero();
    if normal == Vec2::ZERO {
        return true;
    }

    let dot = (a.vel - b.vel).dot(normal);
    // Only bodies closing on each other exchange momentum
    if dot > 0.0 {
        let impulse = 2.0 * dot / (a.mass + b.mass) * params.slipperiness;
        a.vel -= normal * impulse * b.mass;
        b.vel += normal * impulse * a.mass;
    }

    true
}

/// Coarse response for blocks: push `a` out along the shorter overlap axis and
/// reverse both velocities.
pub fn resolve_rects(a: &mut Body, b: &mut Body) -> bool {
    let ra = a.collision_rect();
    let rb = b.collision_rect();
    let Some(clip) = ra.intersection(&rb) else {
        return false;
    };

    let shift = if clip.width() < clip.height() {
        if ra.min.x < rb.min.x {
            Vec2::new(rb.min.x - ra.max.x, 0.0)
        } else {
            Vec2::new(rb.max.x - ra.min.x, 0.0)
        }
    } else if ra.min.y < rb.min.y {
        Vec2::new(0.0, rb.min.y - ra.max.y)
    } else {
        Vec2::new(0.0, rb.max.y - ra.min.y)
    };

    a.pos = ra.center() + shift;
    a.vel = -a.vel;
    b.vel = -b.vel;
    true
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Total kinetic energy of a set of bodies
pub fn kinetic_energy<'a>(bodies: impl IntoIterator<Item = &'a Body>) -> f32 {
    bodies.into_iter().map(Body::kinetic_energy).sum()
}
