//! Read-only frame view for renderers and UI
//!
//! The snapshot borrows from `GameState`, so taking one is free; serializing
//! it produces the JSON handed to the browser each frame.

use serde::Serialize;

use super::particles::Particle;
use super::state::{Enemy, GamePhase, GameState, Player, Projectile};

/// Bumped whenever the serialized shape changes
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    pub version: u32,
    pub phase: GamePhase,
    pub score: u64,
    pub combo: u32,
    pub level: u32,
    pub health: u32,
    pub boost_energy: f32,
    /// Simulated time in ms
    pub clock_ms: f64,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
}

impl<'a> FrameSnapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            phase: state.phase,
            score: state.score,
            combo: state.combo,
            level: state.player.level,
            health: state.player.health,
            boost_energy: state.player.boost_energy,
            clock_ms: state.clock_ms,
            player: &state.player,
            enemies: &state.enemies,
            projectiles: &state.projectiles,
            particles: &state.particles,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl GameState {
    /// Borrowed view of the current frame
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot::of(self)
    }
}
