// Simple particle struct to keep track of individual position, velocity, and
// the visual attributes that are fixed when it is spawned

use rand::Rng;
use vecmath::Vector2;

use crate::color::Hsl;
use crate::config::FieldConfig;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    pub opacity: f64,
    pub hue: f64,
}

impl Particle {
    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64, opacity: f64, hue: f64) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            opacity,
            hue,
        }
    }

    // Random position inside the bounds, small random drift, and visual
    // attributes drawn from the configured ranges
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64, config: &FieldConfig) -> Particle {
        let pos_x = rng.gen::<f64>() * width;
        let pos_y = rng.gen::<f64>() * height;
        let vel_x = (rng.gen::<f64>() - 0.5) * config.initial_speed;
        let vel_y = (rng.gen::<f64>() - 0.5) * config.initial_speed;
        Particle::new(
            [pos_x, pos_y],
            [vel_x, vel_y],
            config.radius.lerp(rng.gen::<f64>()),
            config.opacity.lerp(rng.gen::<f64>()),
            config.hue.lerp(rng.gen::<f64>()),
        )
    }

    pub fn fill(&self, config: &FieldConfig) -> Hsl {
        Hsl::new(self.hue, config.saturation, config.lightness)
    }
}

/// Number of particles a `width` x `height` canvas holds.
pub fn particle_count(width: f64, height: f64, area_per_particle: f64) -> usize {
    let area = width * height;
    if !(area > 0.0) || !(area_per_particle > 0.0) {
        return 0;
    }
    (area / area_per_particle).floor() as usize
}

/// Builds a fresh collection for the given bounds. Pure apart from the
/// injected generator, so a seeded rng gives a reproducible field.
pub fn spawn_particles<R: Rng>(
    rng: &mut R,
    count: usize,
    width: f64,
    height: f64,
    config: &FieldConfig,
) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(count);
    for _ in 0..count {
        particles.push(Particle::random(rng, width, height, config));
    }
    particles
}
