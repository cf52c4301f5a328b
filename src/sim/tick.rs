//! Per-frame simulation tick
//!
//! Advances the game state by one frame's elapsed time. The tick takes the
//! state and an explicit input value; it never reads the wall clock. All
//! gameplay timing runs on `GameState::clock_ms`, the accumulated simulated
//! time.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::particles::{self, spawn_engine_trail, spawn_explosion};
use super::spatial::{
    clamp_to_arena, collides, is_out_of_bounds, pursuit_velocity, spawn_position_on_perimeter,
};
use super::state::{Enemy, GamePhase, GameState, Owner, Projectile};
use crate::catalog::ArchetypeCatalog;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{arena_half_extents, effective_step, heading_to_vec};

/// Exhaust color of the player's craft
const PLAYER_TRAIL_COLOR: &str = "#FFB347";

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Desired movement direction (+y is up); normalized by the tick
    pub movement: Vec2,
    /// Fire button held
    pub fire: bool,
    /// Boost held
    pub boost: bool,
    /// World-space point the craft should face
    pub aim: Option<Vec2>,
}

/// Advance the game state by one frame
///
/// `delta_ms` is the wall-clock gap since the previous frame; it is clamped
/// to at most two nominal frames. Returns the events produced, in order.
/// Does nothing unless the game is running.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    catalog: &(impl ArchetypeCatalog + ?Sized),
    delta_ms: f64,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    let step = effective_step(delta_ms);
    state.time_ticks += 1;
    state.clock_ms += step as f64 * NOMINAL_FRAME_MS;
    let now = state.clock_ms;

    let score_before = state.score;
    let health_before = state.player.health;

    if state.combo_timer.fire_if_expired(now) && state.combo != 0 {
        state.combo = 0;
        events.push(GameEvent::ComboChanged(0));
    }

    update_player(state, input, step);
    fire_player_weapon(state, input, now);
    integrate_projectiles(&mut state.projectiles, step);
    spawn_enemy(state, catalog, now);
    update_enemies(state, step, now);

    resolve_enemy_rams(state, &mut events);
    resolve_projectile_hits(state, now, &mut events);
    resolve_hits_on_player(state);

    particles::integrate(&mut state.particles, step, state.tuning.particle_decay);
    cull_out_of_bounds(state);
    particles::enforce_cap(&mut state.particles, state.tuning.max_particles);

    if state.score != score_before {
        events.push(GameEvent::ScoreChanged(state.score));
    }

    let level = state.tuning.level_for_score(state.score);
    if level != state.player.level {
        log::info!("Level {} reached (score {})", level, state.score);
        state.player.level = level;
        events.push(GameEvent::LevelChanged(level));
    }

    if state.player.health != health_before {
        events.push(GameEvent::HealthChanged(state.player.health));
    }

    if !state.player.is_alive() {
        log::info!("Game over: score {}, level {}", state.score, state.player.level);
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
    }

    // Ensure deterministic ordering
    state.normalize_order();

    events
}

/// Movement, boost gauge, facing and engine trail
fn update_player(state: &mut GameState, input: &TickInput, step: f32) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    let direction = input.movement.normalize_or_zero();
    let boosting = input.boost && player.boost_energy > 0.0;
    let speed = tuning.player_speed(player.level) * player.speed_multiplier(input.boost, tuning);

    player.boost_energy = if boosting {
        (player.boost_energy - tuning.boost_drain * step).max(0.0)
    } else {
        (player.boost_energy + tuning.boost_recharge * step).min(MAX_BOOST_ENERGY)
    };

    player.pos = clamp_to_arena(
        player.pos + direction * speed * step,
        arena_half_extents(),
        PLAYER_EDGE_MARGIN,
    );

    if let Some(aim) = input.aim {
        let to_aim = aim - player.pos;
        if to_aim.length() >= PURSUIT_EPSILON {
            player.facing = to_aim.y.atan2(to_aim.x);
        }
    }

    if direction != Vec2::ZERO && step > 0.0 {
        let intensity = if boosting { 2.0 } else { 1.0 };
        let exhaust = player.pos - direction * PLAYER_RADIUS;
        spawn_engine_trail(
            &mut state.particles,
            &mut state.ids,
            &mut state.rng,
            exhaust,
            direction,
            PLAYER_TRAIL_COLOR,
            intensity,
        );
    }
}

/// Spawn a player projectile along the craft's facing if the cooldown allows
fn fire_player_weapon(state: &mut GameState, input: &TickInput, now: f64) {
    if !input.fire || !state.player.can_fire(now, &state.tuning) {
        return;
    }

    let level = state.player.level;
    let heading = heading_to_vec(state.player.facing);
    let id = state.ids.next();
    state.projectiles.push(Projectile {
        id,
        pos: state.player.pos + heading * MUZZLE_OFFSET,
        vel: heading * state.tuning.projectile_speed(level),
        damage: state.tuning.projectile_damage(level),
        owner: Owner::Player,
    });
    state.player.last_fire_ms = Some(now);
}

fn integrate_projectiles(projectiles: &mut Vec<Projectile>, step: f32) {
    let half = arena_half_extents();
    for projectile in projectiles.iter_mut() {
        projectile.pos += projectile.vel * step;
    }
    projectiles.retain(|p| !is_out_of_bounds(p.pos, half, CULL_MARGIN));
}

/// Spawn one enemy per elapsed spawn interval; an empty catalog spawns nothing
fn spawn_enemy(state: &mut GameState, catalog: &(impl ArchetypeCatalog + ?Sized), now: f64) {
    let interval = state.tuning.spawn_interval_ms(state.player.level);
    if now - state.last_spawn_ms <= interval {
        return;
    }
    state.last_spawn_ms = now;

    let archetypes = catalog.list_archetypes();
    if archetypes.is_empty() {
        return;
    }

    let archetype = &archetypes[state.rng.random_range(0..archetypes.len())];
    let pos = spawn_position_on_perimeter(ARENA_WIDTH, ARENA_HEIGHT, &mut state.rng);
    let vel = pursuit_velocity(
        pos,
        state.player.pos,
        archetype.speed * state.tuning.enemy_speed_scale,
    );
    let cooldown = roll_enemy_fire_cooldown(&mut state.rng, &state.tuning);
    let id = state.ids.next();

    log::debug!("Spawned {} #{} at ({:.1}, {:.1})", archetype.kind, id, pos.x, pos.y);
    state
        .enemies
        .push(Enemy::from_archetype(id, archetype, pos, vel, now, cooldown));
}

fn roll_enemy_fire_cooldown(rng: &mut impl Rng, tuning: &Tuning) -> f64 {
    let min = tuning.enemy_fire_cooldown_min_ms;
    let max = tuning.enemy_fire_cooldown_max_ms;
    if max > min { rng.random_range(min..max) } else { min }
}

/// Move enemies and let each one decide whether to shoot at the player
fn update_enemies(state: &mut GameState, step: f32, now: f64) {
    let player_pos = state.player.pos;
    let range = state.tuning.enemy_engagement_range;
    let shot_speed = state.tuning.enemy_projectile_speed;
    let mut shots = Vec::new();

    for enemy in state.enemies.iter_mut() {
        enemy.pos += enemy.vel * step;

        if enemy.ready_to_fire(now) && enemy.pos.distance(player_pos) <= range {
            let vel = pursuit_velocity(enemy.pos, player_pos, shot_speed);
            if vel != Vec2::ZERO {
                shots.push((enemy.pos, vel));
            }
            enemy.last_fired_ms = Some(now);
            enemy.fire_cooldown_ms = roll_enemy_fire_cooldown(&mut state.rng, &state.tuning);
        }
    }

    for (pos, vel) in shots {
        let id = state.ids.next();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel,
            damage: state.tuning.enemy_projectile_damage,
            owner: Owner::Enemy,
        });
    }
}

/// Enemies touching the player explode and cost the player health
fn resolve_enemy_rams(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player_pos = state.player.pos;
    let (rammers, survivors): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| collides(e.pos, player_pos, e.size, PLAYER_RADIUS));
    state.enemies = survivors;

    for enemy in rammers {
        state.player.take_damage(state.tuning.collision_damage);
        explode(state, enemy.pos, &enemy.color, events);
    }
}

/// Outcome of the player-projectile pass, computed before anything changes
#[derive(Debug, Default)]
struct HitPlan {
    /// Projectiles that struck something
    consumed: Vec<u32>,
    /// Enemy health after all hits, indexed like the enemy list
    health: Vec<u32>,
    /// Enemies destroyed this pass, indexed like the enemy list
    killed: Vec<bool>,
}

/// Match each player projectile against the first live enemy it overlaps
fn plan_projectile_hits(projectiles: &[Projectile], enemies: &[Enemy]) -> HitPlan {
    let mut plan = HitPlan {
        consumed: Vec::new(),
        health: enemies.iter().map(|e| e.health).collect(),
        killed: vec![false; enemies.len()],
    };

    for projectile in projectiles.iter().filter(|p| p.owner == Owner::Player) {
        let target = enemies.iter().enumerate().position(|(i, enemy)| {
            !plan.killed[i] && collides(projectile.pos, enemy.pos, PROJECTILE_RADIUS, enemy.size)
        });

        if let Some(i) = target {
            plan.consumed.push(projectile.id);
            plan.health[i] = plan.health[i].saturating_sub(projectile.damage);
            plan.killed[i] = plan.health[i] == 0;
        }
    }

    plan
}

/// Apply projectile damage; kills award points, feed the combo and explode
fn resolve_projectile_hits(state: &mut GameState, now: f64, events: &mut Vec<GameEvent>) {
    let plan = plan_projectile_hits(&state.projectiles, &state.enemies);
    if plan.consumed.is_empty() {
        return;
    }

    state.projectiles.retain(|p| !plan.consumed.contains(&p.id));

    let mut kills = Vec::new();
    let enemies = std::mem::take(&mut state.enemies);
    for ((mut enemy, health), killed) in enemies.into_iter().zip(plan.health).zip(plan.killed) {
        if killed {
            kills.push(enemy);
        } else {
            enemy.health = health;
            state.enemies.push(enemy);
        }
    }

    for enemy in kills {
        state.score += enemy.points;
        state.combo += 1;
        state.combo_timer.arm(now);
        events.push(GameEvent::ComboChanged(state.combo));
        explode(state, enemy.pos, &enemy.color, events);
    }
}

/// Enemy projectiles that reach the player deal damage and disappear
fn resolve_hits_on_player(state: &mut GameState) {
    let player_pos = state.player.pos;
    let (hits, misses): (Vec<Projectile>, Vec<Projectile>) =
        std::mem::take(&mut state.projectiles)
            .into_iter()
            .partition(|p| {
                p.owner == Owner::Enemy
                    && collides(p.pos, player_pos, PROJECTILE_RADIUS, PLAYER_RADIUS)
            });
    state.projectiles = misses;

    for projectile in hits {
        state.player.take_damage(projectile.damage);
    }
}

fn cull_out_of_bounds(state: &mut GameState) {
    let half = arena_half_extents();
    state
        .enemies
        .retain(|e| !is_out_of_bounds(e.pos, half, CULL_MARGIN));
    state
        .projectiles
        .retain(|p| !is_out_of_bounds(p.pos, half, CULL_MARGIN));
}

fn explode(state: &mut GameState, pos: Vec2, color: &str, events: &mut Vec<GameEvent>) {
    spawn_explosion(&mut state.particles, &mut state.ids, &mut state.rng, pos, color);
    events.push(GameEvent::Explosion {
        pos,
        color: color.to_string(),
    });
}
