//! Cosmetic particle effects
//!
//! Explosions and engine trails. Particles never feed back into gameplay;
//! they are generated as a side effect of events and decay on their own.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::IdAllocator;

/// Particles per explosion
pub const EXPLOSION_PARTICLES: usize = 25;

/// Visual hint for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Explosion,
    Trail,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life, decreases each tick; removed at zero
    pub life: f32,
    /// Life at creation (for fading)
    pub max_life: f32,
    pub kind: ParticleKind,
    pub color: String,
    pub size: f32,
}

/// Burst of particles flying outward from `position`
pub fn spawn_explosion(
    particles: &mut Vec<Particle>,
    ids: &mut IdAllocator,
    rng: &mut impl Rng,
    position: Vec2,
    color: &str,
) {
    particles.reserve(EXPLOSION_PARTICLES);
    for _ in 0..EXPLOSION_PARTICLES {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = rng.random::<f32>() * 0.4 + 0.15;
        let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 0.5;
        let life = rng.random::<f32>() * 0.8 + 0.8;

        particles.push(Particle {
            id: ids.next(),
            pos: position + jitter,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life,
            max_life: life,
            kind: ParticleKind::Explosion,
            color: color.to_string(),
            size: rng.random::<f32>() + 0.5,
        });
    }
}

/// Exhaust puffs streaming out behind a craft moving along `heading`
///
/// `intensity` scales count, spread, speed, life and size (1.0 cruising,
/// 2.0 boosting). A zero heading trails downward.
pub fn spawn_engine_trail(
    particles: &mut Vec<Particle>,
    ids: &mut IdAllocator,
    rng: &mut impl Rng,
    position: Vec2,
    heading: Vec2,
    color: &str,
    intensity: f32,
) {
    if intensity.is_nan() || intensity <= 0.0 {
        return;
    }

    let count = (4.0 * intensity).ceil() as usize;
    let backward = -heading.try_normalize().unwrap_or(Vec2::Y);
    let lateral = backward.perp();
    let spread = 0.5 + intensity * 0.3;
    let lateral_range = 0.12 + intensity * 0.1;
    let color = if intensity > 2.0 {
        "#00FFAA"
    } else if intensity > 1.5 {
        "#00D4FF"
    } else {
        color
    };

    particles.reserve(count);
    for _ in 0..count {
        let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * spread;
        let push = rng.random::<f32>() * (0.25 + intensity * 0.2) + 0.1;
        let drift = (rng.random::<f32>() - 0.5) * lateral_range;
        let life = rng.random::<f32>() * (0.6 + intensity * 0.5) + 0.6;

        particles.push(Particle {
            id: ids.next(),
            pos: position + offset,
            vel: backward * push + lateral * drift,
            life,
            max_life: life,
            kind: ParticleKind::Trail,
            color: color.to_string(),
            size: rng.random::<f32>() * (0.4 + intensity * 0.25) + 0.25,
        });
    }
}

/// Advance particles by `step` nominal frames and drop the dead ones
pub fn integrate(particles: &mut Vec<Particle>, step: f32, decay: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * step;
        particle.life -= decay * step;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Drop the oldest particles beyond `max`
pub fn enforce_cap(particles: &mut Vec<Particle>, max: usize) {
    if particles.len() > max {
        let excess = particles.len() - max;
        particles.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Vec<Particle>, IdAllocator, Pcg32) {
        (Vec::new(), IdAllocator::default(), Pcg32::seed_from_u64(42))
    }

    #[test]
    fn test_explosion_batch() {
        let (mut particles, mut ids, mut rng) = setup();
        let center = Vec2::new(5.0, -3.0);
        spawn_explosion(&mut particles, &mut ids, &mut rng, center, "#FF0000");

        assert_eq!(particles.len(), EXPLOSION_PARTICLES);
        for p in &particles {
            assert_eq!(p.kind, ParticleKind::Explosion);
            assert!(p.pos.distance(center) <= 0.5);
            assert!(p.life >= 0.8 && p.life <= 1.6);
            assert!(p.vel.length() >= 0.15 && p.vel.length() <= 0.55 + 1e-5);
        }

        let mut unique: Vec<u32> = particles.iter().map(|p| p.id).collect();
        unique.dedup();
        assert_eq!(unique.len(), EXPLOSION_PARTICLES);
    }

    #[test]
    fn test_trail_points_backward() {
        let (mut particles, mut ids, mut rng) = setup();
        spawn_engine_trail(&mut particles, &mut ids, &mut rng, Vec2::ZERO, Vec2::X, "#FFFFFF", 1.0);

        assert_eq!(particles.len(), 4);
        for p in &particles {
            assert_eq!(p.kind, ParticleKind::Trail);
            assert!(p.vel.x < 0.0, "trail should stream opposite to travel");
            assert_eq!(p.color, "#FFFFFF");
        }
    }

    #[test]
    fn test_trail_intensity_scales_count_and_color() {
        let (mut particles, mut ids, mut rng) = setup();
        spawn_engine_trail(&mut particles, &mut ids, &mut rng, Vec2::ZERO, Vec2::Y, "#FFFFFF", 2.5);
        assert_eq!(particles.len(), 10);
        assert!(particles.iter().all(|p| p.color == "#00FFAA"));

        particles.clear();
        spawn_engine_trail(&mut particles, &mut ids, &mut rng, Vec2::ZERO, Vec2::Y, "#FFFFFF", 0.0);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_integrate_decays_and_removes() {
        let (mut particles, mut ids, mut rng) = setup();
        spawn_explosion(&mut particles, &mut ids, &mut rng, Vec2::ZERO, "#FF0000");
        let before: Vec<Vec2> = particles.iter().map(|p| p.pos).collect();

        integrate(&mut particles, 1.0, 0.02);
        for (p, old) in particles.iter().zip(&before) {
            assert!((p.pos - (*old + p.vel)).length() < 1e-5);
        }

        // Max life is 1.6, so 100 frames at 0.02 kills everything
        for _ in 0..100 {
            integrate(&mut particles, 1.0, 0.02);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let (mut particles, mut ids, mut rng) = setup();
        spawn_explosion(&mut particles, &mut ids, &mut rng, Vec2::ZERO, "#FF0000");
        let newest = particles.last().map(|p| p.id);

        enforce_cap(&mut particles, 10);
        assert_eq!(particles.len(), 10);
        assert_eq!(particles.last().map(|p| p.id), newest);
    }
}
