//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Logical clock only (advanced by the clamped frame step)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod events;
pub mod particles;
pub mod snapshot;
pub mod spatial;
pub mod state;
pub mod tick;

pub use events::{EventLog, GameEvent, GameListener};
pub use particles::{Particle, ParticleKind};
pub use snapshot::{FrameSnapshot, SNAPSHOT_VERSION};
pub use spatial::{clamp_to_arena, collides, is_out_of_bounds, pursuit_velocity, spawn_position_on_perimeter};
pub use state::{ComboTimer, Enemy, GamePhase, GameState, Owner, Player, Projectile};
pub use tick::{TickInput, tick};
