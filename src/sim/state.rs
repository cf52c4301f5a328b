//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`; the host only
//! ever reads it through a snapshot.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::Particle;
use crate::catalog::Archetype;
use crate::consts::*;
use crate::tuning::Tuning;

/// Coarse game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start command
    NotStarted,
    /// Active gameplay
    Running,
    /// Frozen; ticks are ignored
    Paused,
    /// Player health reached zero; only restart leaves this phase
    GameOver,
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Monotonic entity id source shared by all entity kinds
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_id: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl IdAllocator {
    /// Allocate a new entity ID
    pub fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }
}

/// The player's craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// 0-100
    pub health: u32,
    /// Derived from score
    pub level: u32,
    /// Facing angle in radians (0 = +x); starts pointing up
    pub facing: f32,
    /// 0-100 gauge; drains while boosting, recharges otherwise
    pub boost_energy: f32,
    /// Logical time of the last shot
    pub last_fire_ms: Option<f64>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            health: MAX_HEALTH,
            level: 1,
            facing: std::f32::consts::FRAC_PI_2,
            boost_energy: MAX_BOOST_ENERGY,
            last_fire_ms: None,
        }
    }
}

impl Player {
    /// Speed multiplier for the current boost input
    ///
    /// Boost only applies while there is energy left in the gauge.
    pub fn speed_multiplier(&self, boost_held: bool, tuning: &Tuning) -> f32 {
        if boost_held && self.boost_energy > 0.0 {
            tuning.boost_multiplier
        } else {
            1.0
        }
    }

    /// Whether the fire cooldown has elapsed at logical time `now_ms`
    pub fn can_fire(&self, now_ms: f64, tuning: &Tuning) -> bool {
        match self.last_fire_ms {
            None => true,
            Some(last) => now_ms - last > tuning.fire_cooldown_ms(self.level),
        }
    }

    /// Apply damage, saturating at zero
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// A hostile craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub color: String,
    /// Collision radius
    pub size: f32,
    pub points: u64,
    /// Archetype type tag
    pub kind: String,
    /// Logical spawn time
    pub spawned_ms: f64,
    /// Randomized per-enemy delay between shots
    pub fire_cooldown_ms: f64,
    pub last_fired_ms: Option<f64>,
}

impl Enemy {
    /// Instantiate an archetype
    pub fn from_archetype(
        id: u32,
        archetype: &Archetype,
        pos: Vec2,
        vel: Vec2,
        now_ms: f64,
        fire_cooldown_ms: f64,
    ) -> Self {
        Self {
            id,
            pos,
            vel,
            health: archetype.health,
            max_health: archetype.health,
            color: archetype.color.clone(),
            size: archetype.size,
            points: archetype.points,
            kind: archetype.kind.clone(),
            spawned_ms: now_ms,
            fire_cooldown_ms,
            last_fired_ms: None,
        }
    }

    /// Whether this enemy's weapon has cooled down
    pub fn ready_to_fire(&self, now_ms: f64) -> bool {
        let since = self.last_fired_ms.unwrap_or(self.spawned_ms);
        now_ms - since > self.fire_cooldown_ms
    }
}

/// A shot in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: u32,
    pub owner: Owner,
}

/// Single-shot combo decay deadline on the logical clock
///
/// Re-arming replaces the deadline; there is never more than one pending.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComboTimer {
    deadline_ms: Option<f64>,
}

impl ComboTimer {
    /// (Re)start the idle window from `now_ms`
    pub fn arm(&mut self, now_ms: f64) {
        self.deadline_ms = Some(now_ms + COMBO_WINDOW_MS);
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    /// Returns true exactly once when the deadline has passed
    pub fn fire_if_expired(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance parameters
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    pub player: Player,
    /// Live enemies (ordered by id)
    pub enemies: Vec<Enemy>,
    /// Live projectiles (ordered by id)
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub score: u64,
    /// Consecutive kills inside the combo window
    pub combo: u32,
    pub combo_timer: ComboTimer,
    /// Accumulated simulated time (ms); the only clock gameplay reads
    pub clock_ms: f64,
    /// Logical time of the last spawn attempt
    pub last_spawn_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ids: IdAllocator,
    pub rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed, waiting for `start`
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            tuning,
            phase: GamePhase::NotStarted,
            player: Player::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            score: 0,
            combo: 0,
            combo_timer: ComboTimer::default(),
            clock_ms: 0.0,
            last_spawn_ms: 0.0,
            time_ticks: 0,
            ids: IdAllocator::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Begin a mission: empty arena, fresh player, zeroed counters
    pub fn start(&mut self) {
        self.player = Player::default();
        self.enemies.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.score = 0;
        self.combo = 0;
        self.combo_timer.cancel();
        self.clock_ms = 0.0;
        self.last_spawn_ms = 0.0;
        self.time_ticks = 0;
        self.phase = GamePhase::Running;
        log::info!("Mission started (seed {})", self.seed);
    }

    /// Leave game over (or abandon a run) and start again
    pub fn restart(&mut self) {
        self.start();
    }

    /// Pause gate; only meaningful while running or paused
    pub fn set_paused(&mut self, paused: bool) {
        self.phase = match (self.phase, paused) {
            (GamePhase::Running, true) => GamePhase::Paused,
            (GamePhase::Paused, false) => GamePhase::Running,
            (phase, _) => phase,
        };
    }

    pub fn toggle_pause(&mut self) {
        let paused = self.is_paused();
        self.set_paused(!paused);
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn level(&self) -> u32 {
        self.player.level
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next()
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}
