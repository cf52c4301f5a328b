//! Data-driven game balance
//!
//! Every balance number that varied between iterations of the game lives
//! here instead of being hard-coded in the simulation. Loaded from JSON;
//! missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player movement ===
    /// Base movement speed (units per nominal frame)
    pub player_base_speed: f32,
    /// Extra speed per level
    pub player_speed_per_level: f32,
    /// Speed multiplier while boosting
    pub boost_multiplier: f32,
    /// Energy drained per nominal frame of boost
    pub boost_drain: f32,
    /// Energy recovered per nominal frame without boost
    pub boost_recharge: f32,

    // === Player weapons ===
    /// Fire cooldown at level 0 (ms)
    pub fire_cooldown_base_ms: f64,
    /// Cooldown reduction per level (ms)
    pub fire_cooldown_per_level_ms: f64,
    /// Shortest fire cooldown (ms)
    pub fire_cooldown_min_ms: f64,
    /// Player projectile speed (units per nominal frame)
    pub projectile_base_speed: f32,
    pub projectile_speed_per_level: f32,
    /// Levels needed per extra point of projectile damage
    pub levels_per_damage_step: u32,

    // === Enemies ===
    /// Spawn interval at level 0 (ms)
    pub spawn_interval_base_ms: f64,
    pub spawn_interval_per_level_ms: f64,
    pub spawn_interval_min_ms: f64,
    /// Archetype speeds are multiplied by this
    pub enemy_speed_scale: f32,
    /// Enemies only shoot at a player closer than this
    pub enemy_engagement_range: f32,
    /// Randomized enemy fire cooldown bounds (ms)
    pub enemy_fire_cooldown_min_ms: f64,
    pub enemy_fire_cooldown_max_ms: f64,
    pub enemy_projectile_speed: f32,
    pub enemy_projectile_damage: u32,
    /// Health lost when an enemy rams the player
    pub collision_damage: u32,

    // === Progression ===
    /// Score needed per level
    pub points_per_level: u64,

    // === Effects ===
    /// Particle life lost per nominal frame
    pub particle_decay: f32,
    /// Cap on live particles (oldest dropped first)
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_base_speed: 0.5,
            player_speed_per_level: 0.05,
            boost_multiplier: 1.8,
            boost_drain: 1.5,
            boost_recharge: 0.4,

            fire_cooldown_base_ms: 250.0,
            fire_cooldown_per_level_ms: 10.0,
            fire_cooldown_min_ms: 150.0,
            projectile_base_speed: 0.8,
            projectile_speed_per_level: 0.1,
            levels_per_damage_step: 3,

            spawn_interval_base_ms: 2000.0,
            spawn_interval_per_level_ms: 100.0,
            spawn_interval_min_ms: 1000.0,
            enemy_speed_scale: 0.1,
            enemy_engagement_range: 40.0,
            enemy_fire_cooldown_min_ms: 1500.0,
            enemy_fire_cooldown_max_ms: 3500.0,
            enemy_projectile_speed: 0.6,
            enemy_projectile_damage: 10,
            collision_damage: 20,

            points_per_level: 1000,

            particle_decay: 0.02,
            max_particles: 1500,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Movement speed for a level, before boost
    pub fn player_speed(&self, level: u32) -> f32 {
        self.player_base_speed + level as f32 * self.player_speed_per_level
    }

    /// Time between player shots for a level
    pub fn fire_cooldown_ms(&self, level: u32) -> f64 {
        (self.fire_cooldown_base_ms - level as f64 * self.fire_cooldown_per_level_ms)
            .max(self.fire_cooldown_min_ms)
    }

    /// Player projectile speed for a level
    pub fn projectile_speed(&self, level: u32) -> f32 {
        self.projectile_base_speed + level as f32 * self.projectile_speed_per_level
    }

    /// Player projectile damage: 1, stepping up every few levels
    pub fn projectile_damage(&self, level: u32) -> u32 {
        1 + level / self.levels_per_damage_step.max(1)
    }

    /// Time between enemy spawns for a level
    pub fn spawn_interval_ms(&self, level: u32) -> f64 {
        (self.spawn_interval_base_ms - level as f64 * self.spawn_interval_per_level_ms)
            .max(self.spawn_interval_min_ms)
    }

    /// Level reached at a score (starts at 1)
    pub fn level_for_score(&self, score: u64) -> u32 {
        (score / self.points_per_level.max(1)) as u32 + 1
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sky_strike_tuning";

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring malformed tuning overrides: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_curves_are_bounded() {
        let tuning = Tuning::default();
        assert_eq!(tuning.fire_cooldown_ms(1), 240.0);
        assert_eq!(tuning.fire_cooldown_ms(50), tuning.fire_cooldown_min_ms);
        assert_eq!(tuning.spawn_interval_ms(1), 1900.0);
        assert_eq!(tuning.spawn_interval_ms(50), tuning.spawn_interval_min_ms);
    }

    #[test]
    fn test_damage_steps_with_level() {
        let tuning = Tuning::default();
        assert_eq!(tuning.projectile_damage(1), 1);
        assert_eq!(tuning.projectile_damage(2), 1);
        assert_eq!(tuning.projectile_damage(3), 2);
        assert_eq!(tuning.projectile_damage(6), 3);
    }

    #[test]
    fn test_level_for_score() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level_for_score(0), 1);
        assert_eq!(tuning.level_for_score(999), 1);
        assert_eq!(tuning.level_for_score(1000), 2);
        assert_eq!(tuning.level_for_score(4500), 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "boost_multiplier": 2.5 }"#).unwrap();
        assert_eq!(tuning.boost_multiplier, 2.5);
        assert_eq!(tuning.collision_damage, Tuning::default().collision_damage);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ boost").is_err());
    }
}
