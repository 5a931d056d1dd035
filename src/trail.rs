// Short-lived dots following the pointer. Each pointer move leaves a point at
// full life; every frame the points fade a little and dead ones are dropped.

use std::collections::VecDeque;

use vecmath::Vector2;

use crate::config::TrailConfig;
use crate::surface::Surface;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrailPoint {
    pub pos: Vector2<f64>,
    pub life: f64,
}

pub struct MouseTrail {
    points: VecDeque<TrailPoint>,
    config: TrailConfig,
}

impl MouseTrail {
    pub fn new(config: TrailConfig) -> Self {
        MouseTrail {
            points: VecDeque::with_capacity(config.capacity + 1),
            config,
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.points.push_back(TrailPoint { pos: [x, y], life: 1.0 });
        while self.points.len() > self.config.capacity {
            self.points.pop_front();
        }
    }

    /// Fades every point, draws the ones still alive, then drops the dead.
    /// Returns how many points were drawn.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let color = self.config.color.to_css();
        let mut drawn = 0;
        for point in self.points.iter_mut() {
            point.life -= self.config.decay;
            if point.life > 0.0 {
                surface.fill_circle(point.pos, self.config.radius, point.life, &color);
                drawn += 1;
            }
        }
        self.points.retain(|p| p.life > 0.0);
        drawn
    }

    pub fn points(&self) -> impl Iterator<Item = &TrailPoint> + '_ {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
