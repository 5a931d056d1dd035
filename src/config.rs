//! Tunables for the particle field and the pointer trail.
//!
//! `Default` gives the values the background ships with. Every struct is
//! `#[serde(default)]`, so a partial JSON object only overrides the keys it
//! names.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::BackgroundError;

/// Half-open `[min, max)` range a random attribute is drawn from.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Range {
        Range { min, max }
    }

    /// Maps a unit sample `u` in `[0, 1)` into the range.
    pub fn lerp(&self, u: f64) -> f64 {
        self.min + u * (self.max - self.min)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Canvas area, in square pixels, per particle.
    pub area_per_particle: f64,
    /// Pairs closer than this get a connecting line.
    pub link_distance: f64,
    /// Alpha of a connection between two coincident particles.
    pub link_max_alpha: f64,
    pub link_color: Color,
    pub link_width: f64,
    pub attraction_radius: f64,
    pub attraction_strength: f64,
    /// Per-frame velocity multiplier.
    pub damping: f64,
    /// Spread of each initial velocity component, centred on zero.
    pub initial_speed: f64,
    pub radius: Range,
    pub opacity: Range,
    pub hue: Range,
    pub saturation: f64,
    pub lightness: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            area_per_particle: 10_000.0,
            link_distance: 100.0,
            link_max_alpha: 0.2,
            link_color: Color::from_u32(0x00ff88ff),
            link_width: 1.0,
            attraction_radius: 100.0,
            attraction_strength: 0.0005,
            damping: 0.99,
            initial_speed: 0.5,
            radius: Range::new(1.0, 3.0),
            opacity: Range::new(0.2, 0.7),
            hue: Range::new(120.0, 180.0),
            saturation: 100.0,
            lightness: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Most recent pointer samples kept.
    pub capacity: usize,
    /// Life lost per frame. Points start at 1.0.
    pub decay: f64,
    pub radius: f64,
    pub color: Color,
}

impl Default for TrailConfig {
    fn default() -> Self {
        TrailConfig {
            capacity: 10,
            decay: 0.05,
            radius: 3.0,
            color: Color::from_u32(0x00ff88ff),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Id of the element the canvas is appended to.
    pub container_id: String,
    pub mouse_trail: bool,
    pub field: FieldConfig,
    pub trail: TrailConfig,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        BackgroundConfig {
            container_id: "particles-container".to_owned(),
            mouse_trail: false,
            field: FieldConfig::default(),
            trail: TrailConfig::default(),
        }
    }
}

impl BackgroundConfig {
    pub fn from_json(json: &str) -> Result<BackgroundConfig, BackgroundError> {
        Ok(serde_json::from_str(json)?)
    }
}
