//! Decorative engine trail.

use serde::{Deserialize, Serialize};
use starlane_common::{unit_from_angle, Vec2};

/// Maximum live particles per ship.
pub const MAX_THRUST_PARTICLES: usize = 10;

/// Particles only spawn above this speed.
pub const THRUST_SPEED_THRESHOLD: f32 = 5.0;

/// Particle lifetime in seconds.
pub const THRUST_PARTICLE_LIFE: f32 = 0.5;

/// Distance from ship centre to the engine mount.
const ENGINE_OFFSET: f32 = 12.0;

/// Random spread around the engine mount.
const JITTER: f32 = 3.0;

/// One trail particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrustParticle {
    /// World position
    pub position: Vec2,
    /// Remaining life in seconds
    pub life: f32,
}

/// Bounded list of trail particles.
#[derive(Debug, Clone)]
pub struct ThrustTrail {
    particles: Vec<ThrustParticle>,
    rng: fastrand::Rng,
}

impl ThrustTrail {
    /// Creates an empty trail with its own jitter RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_THRUST_PARTICLES),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Ages existing particles and spawns one behind the ship if it is moving fast enough.
    pub fn update(&mut self, dt: f32, position: Vec2, rotation: f32, speed: f32) {
        for particle in &mut self.particles {
            particle.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);

        if speed > THRUST_SPEED_THRESHOLD {
            if self.particles.len() >= MAX_THRUST_PARTICLES {
                self.particles.remove(0);
            }
            let mount = position - unit_from_angle(rotation) * ENGINE_OFFSET;
            let jitter = Vec2::new(
                (self.rng.f32() - 0.5) * 2.0 * JITTER,
                (self.rng.f32() - 0.5) * 2.0 * JITTER,
            );
            self.particles.push(ThrustParticle {
                position: mount + jitter,
                life: THRUST_PARTICLE_LIFE,
            });
        }
    }

    /// Live particles, oldest first.
    #[must_use]
    pub fn particles(&self) -> &[ThrustParticle] {
        &self.particles
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_is_bounded() {
        let mut trail = ThrustTrail::new(1);
        for _ in 0..100 {
            trail.update(0.01, Vec2::ZERO, 0.0, 100.0);
        }
        assert_eq!(trail.particles().len(), MAX_THRUST_PARTICLES);
    }

    #[test]
    fn test_particles_spawn_behind_engine() {
        let mut trail = ThrustTrail::new(7);
        trail.update(0.01, Vec2::new(100.0, 0.0), 0.0, 50.0);
        let particle = trail.particles()[0];
        assert!(particle.position.x < 100.0 - ENGINE_OFFSET + JITTER + 0.01);
    }

    #[test]
    fn test_slow_ship_leaves_no_trail() {
        let mut trail = ThrustTrail::new(3);
        trail.update(0.1, Vec2::ZERO, 0.0, 50.0);
        assert_eq!(trail.particles().len(), 1);
        for _ in 0..10 {
            trail.update(0.1, Vec2::ZERO, 0.0, 1.0);
        }
        assert!(trail.particles().is_empty());
    }
}
