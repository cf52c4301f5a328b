//! Spatial math for the arena
//!
//! Pure functions; the only randomness comes from the caller's RNG so the
//! simulation stays reproducible for a given seed.

use glam::Vec2;
use rand::Rng;

use crate::consts::{PURSUIT_EPSILON, SPAWN_MARGIN};

/// Check whether two circles overlap
///
/// True iff the distance between centers is strictly less than the sum of
/// the radii.
#[inline]
pub fn collides(a: Vec2, b: Vec2, radius_a: f32, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Pick a spawn point just outside one of the four arena edges
///
/// The edge is chosen uniformly, then the position along it is uniform.
/// The arena is centered on the origin.
pub fn spawn_position_on_perimeter(width: f32, height: f32, rng: &mut impl Rng) -> Vec2 {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let along: f32 = rng.random::<f32>() - 0.5;

    match rng.random_range(0..4u8) {
        // Top
        0 => Vec2::new(along * width, half_h + SPAWN_MARGIN),
        // Right
        1 => Vec2::new(half_w + SPAWN_MARGIN, along * height),
        // Bottom
        2 => Vec2::new(along * width, -half_h - SPAWN_MARGIN),
        // Left
        _ => Vec2::new(-half_w - SPAWN_MARGIN, along * height),
    }
}

/// Velocity aimed from `from` at `to` with magnitude `speed`
///
/// Returns zero when the points (nearly) coincide instead of dividing by a
/// vanishing distance.
pub fn pursuit_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance < PURSUIT_EPSILON || !distance.is_finite() {
        return Vec2::ZERO;
    }
    delta / distance * speed
}

/// Whether a point lies further than `margin` outside the arena
#[inline]
pub fn is_out_of_bounds(pos: Vec2, half_extents: Vec2, margin: f32) -> bool {
    pos.x.abs() > half_extents.x + margin || pos.y.abs() > half_extents.y + margin
}

/// Clamp a point to the arena shrunk by `margin` on every side
#[inline]
pub fn clamp_to_arena(pos: Vec2, half_extents: Vec2, margin: f32) -> Vec2 {
    let limit = (half_extents - Vec2::splat(margin)).max(Vec2::ZERO);
    pos.clamp(-limit, limit)
}
