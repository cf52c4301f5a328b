//! Sky Strike - an arena arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, combat, particles)
//! - `catalog`: Enemy archetype catalog
//! - `session`: Host-side owner of the simulation and its collaborators
//! - `platform`: Frame clock, input snapshot, browser glue
//! - `tuning`: Data-driven game balance

pub mod catalog;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use catalog::{Archetype, ArchetypeCatalog, StaticCatalog};
pub use session::Session;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Duration of one nominal display frame (60 Hz)
    pub const NOMINAL_FRAME_MS: f64 = 16.67;
    /// Largest simulation step, in nominal frames, a single tick may take
    pub const MAX_STEP: f32 = 2.0;

    /// Arena dimensions in world units, centered on the origin
    pub const ARENA_WIDTH: f32 = 80.0;
    pub const ARENA_HEIGHT: f32 = 60.0;

    /// Distance outside the arena edge where enemies appear
    pub const SPAWN_MARGIN: f32 = 8.0;
    /// Entities further than this outside the arena are discarded
    pub const CULL_MARGIN: f32 = 10.0;
    /// Pursuit targets closer than this count as coincident
    pub const PURSUIT_EPSILON: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_START: Vec2 = Vec2::new(0.0, -20.0);
    pub const PLAYER_RADIUS: f32 = 2.5;
    /// Keeps the craft fully on screen
    pub const PLAYER_EDGE_MARGIN: f32 = 3.0;
    pub const MAX_HEALTH: u32 = 100;
    pub const MAX_BOOST_ENERGY: f32 = 100.0;

    /// Projectiles spawn this far ahead of the shooter
    pub const MUZZLE_OFFSET: f32 = 3.0;
    pub const PROJECTILE_RADIUS: f32 = 0.5;

    /// Idle time after the last kill before the combo resets
    pub const COMBO_WINDOW_MS: f64 = 2000.0;
}

/// Half extents of the arena
#[inline]
pub fn arena_half_extents() -> Vec2 {
    Vec2::new(consts::ARENA_WIDTH / 2.0, consts::ARENA_HEIGHT / 2.0)
}

/// Convert a frame delta to a simulation step in nominal frames.
///
/// Clamped to [0, `MAX_STEP`] so a stalled tab cannot launch entities
/// across the arena in one tick.
#[inline]
pub fn effective_step(delta_ms: f64) -> f32 {
    let step = (delta_ms / consts::NOMINAL_FRAME_MS) as f32;
    if step.is_finite() {
        step.clamp(0.0, consts::MAX_STEP)
    } else {
        0.0
    }
}

/// Unit vector for a facing angle (radians, 0 = +x, counter-clockwise)
#[inline]
pub fn heading_to_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_step_clamped() {
        assert!((effective_step(consts::NOMINAL_FRAME_MS) - 1.0).abs() < 1e-6);
        assert_eq!(effective_step(10_000.0), consts::MAX_STEP);
        assert_eq!(effective_step(-5.0), 0.0);
        assert_eq!(effective_step(f64::NAN), 0.0);
    }

    #[test]
    fn test_heading_to_vec() {
        let up = heading_to_vec(std::f32::consts::FRAC_PI_2);
        assert!(up.x.abs() < 1e-6);
        assert!((up.y - 1.0).abs() < 1e-6);
    }
}
