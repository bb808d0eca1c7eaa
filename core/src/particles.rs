use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Desynchronizes fall speed between particles.
    pub density: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    pub count: usize,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Phase advance per frame.
    pub phase_step: f64,
    /// Horizontal drift amplitude per frame.
    pub drift: f64,
    /// How far past the side edges a particle may go.
    pub margin: f64,
    /// Height above the top edge where recycled particles re-enter.
    pub top_entry: f64,
    /// One in this many slots re-enters from the side instead of the top.
    pub side_entry_every: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 100,
            min_radius: 1.0,
            max_radius: 4.0,
            phase_step: 0.01,
            drift: 2.0,
            margin: 5.0,
            top_entry: 10.0,
            side_entry_every: 3,
        }
    }
}

/// Falling snow: a fixed pool of particles drifting down a viewport.
#[derive(Clone, Debug)]
pub struct ParticleField {
    config: ParticleConfig,
    particles: Vec<Particle>,
    phase: f64,
    size: Size,
    rng: SmallRng,
}

impl ParticleField {
    pub fn new(config: ParticleConfig, size: Size, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (width, height) = size;
        let radius_span = (config.max_radius - config.min_radius).max(0.0);

        let particles = (0..config.count)
            .map(|_| Particle {
                x: rng.random::<f64>() * width,
                y: rng.random::<f64>() * height,
                radius: rng.random::<f64>() * radius_span + config.min_radius,
                density: rng.random::<f64>() * config.count as f64,
            })
            .collect();

        Self {
            config,
            particles,
            phase: 0.0,
            size,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Current horizontal drift, positive when blowing to the right.
    pub fn wind(&self) -> f64 {
        self.phase.sin()
    }

    /// Changes the bounds. Particle positions are left where they are.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn is_out_of_bounds(&self, particle: &Particle) -> bool {
        let (width, height) = self.size;
        let margin = self.config.margin;
        particle.x > width + margin
            || particle.x < -margin
            || particle.y > height
            || particle.y < -(self.config.top_entry + margin)
    }

    /// Advances every particle by one frame and recycles the ones that left.
    pub fn step(&mut self) {
        self.phase += self.config.phase_step;
        let phase = self.phase;
        let wind = phase.sin();

        for i in 0..self.particles.len() {
            let particle = &mut self.particles[i];
            particle.y += (phase + particle.density).cos() + 1.0 + particle.radius / 2.0;
            particle.x += wind * self.config.drift;

            if self.is_out_of_bounds(&self.particles[i]) {
                self.recycle(i, wind);
            }
        }
    }

    fn recycle(&mut self, i: usize, wind: f64) {
        let (width, height) = self.size;
        let margin = self.config.margin;
        let from_side = self.config.side_entry_every > 0 && i % self.config.side_entry_every == 0;
        let particle = &mut self.particles[i];

        if !from_side {
            particle.x = self.rng.random::<f64>() * width;
            particle.y = -self.config.top_entry;
        } else {
            // enter from whichever side the wind blows from
            particle.x = if wind > 0.0 { -margin } else { width + margin };
            particle.y = self.rng.random::<f64>() * height;
        }
    }
}
