//! Exhaust particle pool.
//!
//! Fixed-capacity ring buffer: emission always claims the slot under the
//! wrapping cursor, reclaiming the oldest particle even if it is still
//! alive. This caps memory and live-particle count at the pool size, at the
//! cost of occasionally cutting an old particle short.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::safe_dir;

/// Pool size used by the viewer.
pub const POOL_CAPACITY: usize = 4000;

/// Exhaust emission rate in particles per second.
pub const EXHAUST_RATE: f32 = 280.0;

const LIFETIME_MIN: f32 = 0.6;
const LIFETIME_SPAN: f32 = 0.6;
const SIZE_MIN: f32 = 0.8;
const SIZE_SPAN: f32 = 0.6;
const SPEED_MIN: f32 = 25.0;
const SPEED_SPAN: f32 = 10.0;
const CONE_SPREAD: f32 = 0.4;
const JITTER_BLEND: f32 = 0.2;
const NOZZLE_OFFSET: f32 = 0.2;

const DEFAULT_SEED: u64 = 0x51a7;

#[derive(Clone, Copy, Debug, Default)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    pub lifetime: f32,
    pub size: f32,
    pub alive: bool,
}

/// One alive particle, compacted for GPU upload.
#[derive(Clone, Copy, Debug)]
pub struct ParticleSprite {
    pub position: Vec3,
    pub size: f32,
    pub alpha: f32,
}

pub struct ParticleSystem {
    pool: Vec<Particle>,
    head: usize,
    alive_count: usize,
    emit_accumulator: f32,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(capacity: usize) -> Self {
        Self::with_seed(capacity, DEFAULT_SEED)
    }

    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self {
            pool: vec![Particle::default(); capacity],
            head: 0,
            alive_count: 0,
            emit_accumulator: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.pool.len()
    }

    /// Alive tally as of the last `update`.
    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Emit `rate * dt` particles, carrying the fractional remainder to the
    /// next call so low rates and uneven frame times still average out.
    pub fn emit(&mut self, emitter_position: Vec3, emitter_direction: Vec3, rate: f32, dt: f32) {
        if self.pool.is_empty() {
            return;
        }

        self.emit_accumulator += rate * dt;
        let count = self.emit_accumulator.floor().max(0.0) as usize;
        self.emit_accumulator -= count as f32;
        if count == 0 {
            return;
        }

        let dir = safe_dir(emitter_direction, Vec3::NEG_Z);
        let tangent = safe_dir(dir.cross(Vec3::Y), Vec3::X);
        let bitangent = tangent.cross(dir);

        for _ in 0..count {
            let slot = self.head;
            self.head = (self.head + 1) % self.pool.len();

            let lifetime = LIFETIME_MIN + self.unit() * LIFETIME_SPAN;
            let size = SIZE_MIN + self.unit() * SIZE_SPAN;

            // Disk sample inside the emission cone.
            let angle = self.unit() * std::f32::consts::TAU;
            let radius = self.unit() * CONE_SPREAD;
            let jitter = tangent * (angle.cos() * radius) + bitangent * (angle.sin() * radius);
            let speed = SPEED_MIN + self.unit() * SPEED_SPAN;

            self.pool[slot] = Particle {
                position: emitter_position + dir * NOZZLE_OFFSET,
                velocity: (dir + jitter * JITTER_BLEND) * speed,
                age: 0.0,
                lifetime,
                size,
                alive: true,
            };
        }
    }

    /// Age and integrate every alive particle; `dt <= 0` is a no-op.
    /// A particle whose age reaches its lifetime dies on that step.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 || self.pool.is_empty() {
            return;
        }

        let mut alive = 0;
        for particle in &mut self.pool {
            if !particle.alive {
                continue;
            }
            particle.age += dt;
            if particle.age >= particle.lifetime {
                particle.alive = false;
                continue;
            }
            particle.position += particle.velocity * dt;
            alive += 1;
        }
        self.alive_count = alive;
    }

    /// Compact the alive particles for upload, fading alpha linearly from
    /// one to zero over each particle's lifetime.
    pub fn snapshot(&self) -> Vec<ParticleSprite> {
        let mut sprites = Vec::with_capacity(self.alive_count);
        for particle in &self.pool {
            if !particle.alive {
                continue;
            }
            sprites.push(ParticleSprite {
                position: particle.position,
                size: particle.size,
                alpha: 1.0 - particle.age / particle.lifetime,
            });
        }
        sprites
    }

    fn unit(&mut self) -> f32 {
        self.rng.random_range(0.0..1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alive_never_exceeds_capacity() {
        let mut system = ParticleSystem::with_seed(100, 1);
        // Far more emissions than slots in a single accumulation step.
        system.emit(Vec3::ZERO, Vec3::NEG_Y, 100_000.0, 1.0);
        system.update(0.01);

        assert_eq!(system.capacity(), 100);
        assert!(system.alive_count() <= 100);
        assert!(system.snapshot().len() <= 100);
    }

    #[test]
    fn fractional_emission_carries_between_calls() {
        let mut system = ParticleSystem::with_seed(16, 2);
        system.emit(Vec3::ZERO, Vec3::NEG_Y, 0.5, 1.0);
        system.update(0.01);
        assert_eq!(system.alive_count(), 0);

        system.emit(Vec3::ZERO, Vec3::NEG_Y, 0.5, 1.0);
        system.update(0.01);
        assert_eq!(system.alive_count(), 1);
    }

    #[test]
    fn emission_rate_is_accurate_over_time() {
        // 10 steps of 0.05 s at 73/s: 36.5 emissions accumulated, so within
        // one of 36 by the end. Total sim time stays under the minimum
        // lifetime so nothing dies while we count.
        let mut system = ParticleSystem::with_seed(4000, 3);
        for _ in 0..10 {
            system.emit(Vec3::ZERO, Vec3::NEG_Y, 73.0, 0.05);
            system.update(0.05);
        }
        let alive = system.alive_count();
        assert!((35..=37).contains(&alive), "alive = {alive}");
    }

    #[test]
    fn particles_die_after_their_lifetime() {
        let mut system = ParticleSystem::with_seed(64, 4);
        system.emit(Vec3::ZERO, Vec3::NEG_Y, 32.0, 1.0);
        system.update(0.01);
        assert!(system.alive_count() > 0);

        // Longest possible lifetime is 1.2 s.
        system.update(1.3);
        assert_eq!(system.alive_count(), 0);
        assert!(system.snapshot().is_empty());
    }

    #[test]
    fn age_equal_to_lifetime_kills() {
        let mut system = ParticleSystem::with_seed(4, 5);
        system.pool[0] = Particle {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            age: 0.5,
            lifetime: 0.75,
            size: 1.0,
            alive: true,
        };

        // 0.5 + 0.25 lands exactly on the lifetime.
        system.update(0.25);
        assert_eq!(system.alive_count(), 0);
        assert!(!system.pool[0].alive);
    }

    #[test]
    fn alpha_fades_monotonically() {
        let mut system = ParticleSystem::with_seed(4, 6);
        system.emit(Vec3::ZERO, Vec3::NEG_Y, 1.0, 1.0);

        let mut last_alpha = f32::INFINITY;
        loop {
            system.update(0.05);
            let snapshot = system.snapshot();
            let Some(sprite) = snapshot.first() else {
                break;
            };
            assert!(sprite.alpha > 0.0 && sprite.alpha < last_alpha);
            last_alpha = sprite.alpha;
        }
    }

    #[test]
    fn ring_cursor_reclaims_oldest_slots() {
        let mut system = ParticleSystem::with_seed(4, 7);
        system.emit(Vec3::ZERO, Vec3::NEG_Y, 4.0, 1.0);
        system.update(0.1);
        let first_round: Vec<f32> = system.pool.iter().map(|p| p.age).collect();
        assert!(first_round.iter().all(|&age| age > 0.0));

        // Two more emissions wrap the cursor onto the two oldest slots.
        system.emit(Vec3::ZERO, Vec3::NEG_Y, 2.0, 1.0);
        assert_eq!(system.pool[0].age, 0.0);
        assert_eq!(system.pool[1].age, 0.0);
        assert!(system.pool[2].age > 0.0);
        assert!(system.pool[3].age > 0.0);
    }

    #[test]
    fn update_ignores_non_positive_dt() {
        let mut system = ParticleSystem::with_seed(8, 8);
        system.emit(Vec3::ZERO, Vec3::NEG_Y, 8.0, 1.0);
        system.update(0.1);
        let before: Vec<Vec3> = system.pool.iter().map(|p| p.position).collect();

        system.update(0.0);
        system.update(-0.5);
        let after: Vec<Vec3> = system.pool.iter().map(|p| p.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn emitted_velocity_points_roughly_along_direction() {
        let mut system = ParticleSystem::with_seed(32, 9);
        let dir = Vec3::new(0.0, -1.0, 0.0);
        system.emit(Vec3::ZERO, dir, 32.0, 1.0);

        for particle in system.pool.iter().filter(|p| p.alive) {
            let speed = particle.velocity.length();
            assert!(speed > SPEED_MIN * 0.9 && speed < (SPEED_MIN + SPEED_SPAN) * 1.1);
            assert!(particle.velocity.normalize().dot(dir) > 0.9);
            assert!(particle.lifetime >= LIFETIME_MIN);
            assert!(particle.lifetime <= LIFETIME_MIN + LIFETIME_SPAN);
            assert!(particle.size >= SIZE_MIN);
            assert!(particle.size <= SIZE_MIN + SIZE_SPAN);
        }
    }
}
