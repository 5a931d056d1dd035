//! The particle field: a swarm of slow particles on a torus the size of the
//! canvas, pulled gently toward the pointer and joined by faint lines when
//! they pass close to each other.
//!
//! Physics is plain Euler integration with one frame as the time step. There
//! is no frame-rate compensation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use vecmath::Vector2;

use crate::config::FieldConfig;
use crate::particle::{particle_count, spawn_particles, Particle};
use crate::pointer::PointerState;
use crate::surface::Surface;

/// What a single frame drew.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub links: usize,
}

pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    pointer: PointerState,
    config: FieldConfig,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(width: f64, height: f64, config: FieldConfig) -> ParticleField {
        ParticleField::with_rng(width, height, config, StdRng::from_entropy())
    }

    /// Same as `new` with the generator used for every (re)population.
    pub fn with_rng(width: f64, height: f64, config: FieldConfig, rng: StdRng) -> ParticleField {
        let mut field = ParticleField {
            width,
            height,
            particles: Vec::new(),
            pointer: PointerState::default(),
            config,
            rng,
        };
        field.populate();
        field
    }

    /// Throws away the current particles and spawns a new set sized for the
    /// new bounds.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.populate();
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer.move_to(x, y);
    }

    /// Replaces the collection wholesale, e.g. to place particles by hand.
    /// The count no longer follows the density rule until the next resize.
    pub fn set_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Advances and draws one frame.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        surface.clear(self.width, self.height);

        let config = &self.config;
        for particle in self.particles.iter_mut() {
            step(particle, &self.pointer, self.width, self.height, config);
            let fill = particle.fill(config).to_css();
            surface.fill_circle(particle.pos, particle.radius, particle.opacity, &fill);
        }

        let links = self.draw_links(surface);
        let stats = FrameStats {
            particles: self.particles.len(),
            links,
        };
        log::trace!("frame: {:?}", stats);
        stats
    }

    // O(n^2) over all unordered pairs; this is what bounds the density
    fn draw_links<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        let max_distance = self.config.link_distance;
        let stroke = self.config.link_color.to_css();
        let mut links = 0;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = vecmath::vec2_len(vecmath::vec2_sub(a.pos, b.pos));
                if distance < max_distance {
                    let alpha = (max_distance - distance) / max_distance * self.config.link_max_alpha;
                    surface.stroke_line(a.pos, b.pos, alpha, &stroke, self.config.link_width);
                    links += 1;
                }
            }
        }
        links
    }

    fn populate(&mut self) {
        let count = particle_count(self.width, self.height, self.config.area_per_particle);
        self.particles = spawn_particles(&mut self.rng, count, self.width, self.height, &self.config);
        log::info!(
            "particle field {}x{}: {} particles",
            self.width,
            self.height,
            self.particles.len()
        );
    }
}

// Move, pull toward the pointer, apply drag, then wrap onto the torus
fn step(particle: &mut Particle, pointer: &PointerState, width: f64, height: f64, config: &FieldConfig) {
    particle.pos = vecmath::vec2_add(particle.pos, particle.vel);

    if let Some(pull) = pointer.attraction(particle.pos, config.attraction_radius, config.attraction_strength) {
        particle.vel = vecmath::vec2_add(particle.vel, pull);
    }

    particle.vel = vecmath::vec2_scale(particle.vel, config.damping);

    particle.pos = wrap(particle.pos, width, height);
}

fn wrap(pos: Vector2<f64>, width: f64, height: f64) -> Vector2<f64> {
    [wrap_axis(pos[0], width), wrap_axis(pos[1], height)]
}

// Past the far edge restarts at 0, past the near edge restarts just inside
// the far edge, so the coordinate stays in [0, bound)
fn wrap_axis(value: f64, bound: f64) -> f64 {
    if !(bound > 0.0) {
        0.0
    } else if value < 0.0 {
        below(bound)
    } else if value >= bound {
        0.0
    } else {
        value
    }
}

// Largest f64 strictly less than a positive bound
fn below(bound: f64) -> f64 {
    f64::from_bits(bound.to_bits() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{DrawCall, RecordingSurface};

    const FAR: [f64; 2] = [9999.0, 9999.0];

    fn seeded(width: f64, height: f64) -> ParticleField {
        ParticleField::with_rng(width, height, FieldConfig::default(), StdRng::seed_from_u64(1))
    }

    fn still(x: f64, y: f64) -> Particle {
        Particle::new([x, y], [0.0, 0.0], 2.0, 0.5, 150.0)
    }

    fn line_alphas(surface: &RecordingSurface) -> Vec<f64> {
        surface
            .lines()
            .into_iter()
            .map(|c| match c {
                DrawCall::Line { alpha, .. } => *alpha,
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn count_matches_density_on_create_and_resize() {
        for &(w, h) in &[(1000.0, 1000.0), (1920.0, 1080.0), (375.0, 667.0), (10.0, 10.0)] {
            let mut field = seeded(w, h);
            assert_eq!(field.len(), particle_count(w, h, 10_000.0));
            field.resize(h, w);
            assert_eq!(field.len(), particle_count(h, w, 10_000.0));
        }
        assert_eq!(seeded(1000.0, 1000.0).len(), 100);
    }

    #[test]
    fn resize_twice_keeps_count_and_bounds() {
        let mut field = seeded(800.0, 600.0);
        field.resize(1280.0, 720.0);
        let first = field.particles().to_vec();
        field.resize(1280.0, 720.0);
        assert_eq!(field.len(), first.len());
        assert_eq!(field.len(), 92);
        assert_ne!(field.particles(), &first[..]);
        for p in field.particles() {
            assert!(p.pos[0] < 1280.0 && p.pos[1] < 720.0);
        }
    }

    #[test]
    fn empty_viewport_ticks_cleanly() {
        let mut field = seeded(0.0, 0.0);
        let mut surface = RecordingSurface::default();
        let stats = field.tick(&mut surface);
        assert_eq!(stats, FrameStats::default());
        assert_eq!(surface.calls, vec![DrawCall::Clear(0.0, 0.0)]);
    }

    #[test]
    fn nearby_pair_is_linked_with_faded_alpha() {
        let mut field = seeded(1000.0, 1000.0);
        assert_eq!(field.len(), 100);
        field.set_particles(vec![still(0.0, 0.0), still(50.0, 0.0)]);
        field.on_pointer_move(FAR[0], FAR[1]);

        let mut surface = RecordingSurface::default();
        let stats = field.tick(&mut surface);

        assert_eq!(field.particles()[0].pos, [0.0, 0.0]);
        assert_eq!(field.particles()[1].pos, [50.0, 0.0]);
        assert_eq!(stats, FrameStats { particles: 2, links: 1 });
        let alphas = line_alphas(&surface);
        assert_eq!(alphas.len(), 1);
        assert!((alphas[0] - 0.1).abs() < 1e-12);
        match surface.lines()[0] {
            DrawCall::Line { from, to, stroke, width, .. } => {
                assert_eq!(*from, [0.0, 0.0]);
                assert_eq!(*to, [50.0, 0.0]);
                assert_eq!(stroke, "#00ff88");
                assert_eq!(*width, 1.0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn link_threshold_is_strict() {
        let mut field = seeded(1000.0, 1000.0);
        field.on_pointer_move(FAR[0], FAR[1]);
        let mut surface = RecordingSurface::default();

        field.set_particles(vec![still(200.0, 200.0), still(299.0, 200.0)]);
        assert_eq!(field.tick(&mut surface).links, 1);

        surface.take();
        field.set_particles(vec![still(200.0, 200.0), still(301.0, 200.0)]);
        assert_eq!(field.tick(&mut surface).links, 0);
        assert!(surface.lines().is_empty());

        field.set_particles(vec![still(200.0, 200.0), still(300.0, 200.0)]);
        assert_eq!(field.tick(&mut surface).links, 0);
    }

    #[test]
    fn each_pair_linked_once() {
        let mut field = seeded(1000.0, 1000.0);
        field.on_pointer_move(FAR[0], FAR[1]);
        field.set_particles(vec![still(100.0, 100.0), still(130.0, 100.0), still(100.0, 140.0)]);
        let mut surface = RecordingSurface::default();
        assert_eq!(field.tick(&mut surface).links, 3);
    }

    #[test]
    fn particles_drawn_in_order_with_fixed_look() {
        let mut field = seeded(1000.0, 1000.0);
        field.on_pointer_move(FAR[0], FAR[1]);
        field.set_particles(vec![
            Particle::new([10.0, 10.0], [0.0, 0.0], 1.5, 0.3, 120.0),
            Particle::new([700.0, 700.0], [0.0, 0.0], 2.5, 0.6, 179.0),
        ]);
        let mut surface = RecordingSurface::default();
        field.tick(&mut surface);

        assert_eq!(surface.calls[0], DrawCall::Clear(1000.0, 1000.0));
        assert_eq!(
            surface.circles(),
            vec![
                &DrawCall::Circle {
                    center: [10.0, 10.0],
                    radius: 1.5,
                    alpha: 0.3,
                    fill: "hsl(120, 100%, 50%)".into(),
                },
                &DrawCall::Circle {
                    center: [700.0, 700.0],
                    radius: 2.5,
                    alpha: 0.6,
                    fill: "hsl(179, 100%, 50%)".into(),
                },
            ]
        );
    }

    #[test]
    fn drag_shrinks_speed_each_frame() {
        let mut field = seeded(1000.0, 1000.0);
        field.on_pointer_move(FAR[0], FAR[1]);
        field.set_particles(vec![Particle::new([500.0, 500.0], [3.0, 4.0], 2.0, 0.5, 150.0)]);
        let mut surface = RecordingSurface::default();

        let mut speed = 5.0;
        for _ in 0..10 {
            field.tick(&mut surface);
            let p = field.particles()[0];
            let now = vecmath::vec2_len(p.vel);
            assert!((now - 0.99 * speed).abs() < 1e-12);
            speed = now;
        }
    }

    #[test]
    fn moves_before_it_feels_the_pointer() {
        let mut field = seeded(1000.0, 1000.0);
        field.on_pointer_move(60.0, 50.0);
        field.set_particles(vec![still(50.0, 50.0)]);
        let mut surface = RecordingSurface::default();

        field.tick(&mut surface);
        let p = field.particles()[0];
        assert_eq!(p.pos, [50.0, 50.0]);
        let expected = 10.0 * 0.9 * 0.0005 * 0.99;
        assert!((p.vel[0] - expected).abs() < 1e-15);
        assert_eq!(p.vel[1], 0.0);

        field.tick(&mut surface);
        assert!(field.particles()[0].pos[0] > 50.0);
    }

    #[test]
    fn pointer_starts_at_origin_and_pulls() {
        let mut field = seeded(1000.0, 1000.0);
        assert_eq!(field.pointer().pos, [0.0, 0.0]);
        field.set_particles(vec![still(30.0, 40.0)]);
        field.tick(&mut RecordingSurface::default());
        let v = field.particles()[0].vel;
        assert!(v[0] < 0.0 && v[1] < 0.0);
    }

    #[test]
    fn wraps_past_far_edge_to_zero() {
        let mut field = seeded(1000.0, 1000.0);
        field.on_pointer_move(FAR[0], FAR[1]);
        field.set_particles(vec![Particle::new([999.5, 500.0], [1.0, 0.0], 2.0, 0.5, 150.0)]);
        field.tick(&mut RecordingSurface::default());
        assert_eq!(field.particles()[0].pos, [0.0, 500.0]);
    }

    #[test]
    fn wraps_past_near_edge_to_just_inside() {
        let mut field = seeded(1000.0, 1000.0);
        field.on_pointer_move(FAR[0], FAR[1]);
        field.set_particles(vec![Particle::new([300.0, 0.2], [0.0, -1.0], 2.0, 0.5, 150.0)]);
        field.tick(&mut RecordingSurface::default());
        let y = field.particles()[0].pos[1];
        assert!(y < 1000.0 && y > 999.0);
    }

    #[test]
    fn stays_on_torus_over_many_frames() {
        let mut field = seeded(800.0, 600.0);
        field.on_pointer_move(400.0, 300.0);
        // speed particles up so plenty of them cross an edge
        let fast: Vec<Particle> = field
            .particles()
            .iter()
            .map(|p| Particle { vel: vecmath::vec2_scale(p.vel, 200.0), ..*p })
            .collect();
        field.set_particles(fast);

        let mut surface = RecordingSurface::default();
        for _ in 0..300 {
            field.tick(&mut surface);
            surface.take();
            for p in field.particles() {
                assert!(p.pos[0] >= 0.0 && p.pos[0] < 800.0, "x out of range: {}", p.pos[0]);
                assert!(p.pos[1] >= 0.0 && p.pos[1] < 600.0, "y out of range: {}", p.pos[1]);
            }
        }
    }

    #[test]
    fn wrap_axis_edges() {
        assert_eq!(wrap_axis(0.0, 10.0), 0.0);
        assert_eq!(wrap_axis(10.0, 10.0), 0.0);
        assert_eq!(wrap_axis(9.75, 10.0), 9.75);
        assert!(wrap_axis(-0.0001, 10.0) < 10.0);
        assert_eq!(wrap_axis(5.0, 0.0), 0.0);
    }
}
