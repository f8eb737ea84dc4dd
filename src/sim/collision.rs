//! Overlap tests between circular bodies
//!
//! Everything in the arena is a circle: player, enemies, boss, projectiles.
//! Collision resolution itself (who takes damage) lives in the tick.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the surface of `b` (if hit)
    pub point: Vec2,
    /// Surface normal at contact, pointing from `b` toward `a`
    pub normal: Vec2,
    /// Overlap depth
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between two circles `a` and `b`
pub fn circle_collision(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = a_pos - b_pos;
    let reach = a_radius + b_radius;
    let dist_sq = delta.length_squared();
    if dist_sq > reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // Concentric circles: pick an arbitrary but stable normal
    let normal = if dist > 0.0 { delta / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        point: b_pos + normal * b_radius,
        normal,
        penetration: reach - dist,
    }
}

/// Cheap boolean overlap (touching counts)
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= reach * reach
}

/// Clamp a circle so it stays fully inside an axis-aligned rectangle
pub fn clamp_to_rect(pos: Vec2, radius: f32, min: Vec2, max: Vec2) -> Vec2 {
    let lo = min + Vec2::splat(radius);
    let hi = (max - Vec2::splat(radius)).max(lo);
    pos.clamp(lo, hi)
}
