//! Ambient snowfall simulation. Pure numeric state so it can run and be
//! tested off the browser; drawing lives with the wasm page wiring.

use std::f32::consts::PI;

/// Fixed population for the lifetime of a surface size.
pub const PARTICLE_COUNT: usize = 150;

/// Respawned flakes start just above the visible area.
pub const RESPAWN_Y: f32 = -20.0;

/// A flake is recycled once it falls this far past the bottom edge.
pub const RECYCLE_MARGIN: f32 = 10.0;

/// Truncates a millisecond wall-clock timestamp into an LCG seed,
/// keeping the fast-moving low bits. A plain f64 to u32 `as` cast would
/// saturate (timestamps exceed `u32::MAX`) and pin every seed to the
/// same value.
pub fn seed_from_millis(ms: f64) -> u32 {
    ms as u64 as u32
}

/// Small LCG so the field is seedable without a JS `Math.random` import.
#[derive(Clone)]
pub(crate) struct Rng {
    state: u32,
}

impl Rng {
    pub(crate) fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform sample in `[0, 1)`.
    pub(crate) fn next(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        (self.state >> 8) as f32 / ((u32::MAX >> 8) as f32 + 1.0)
    }
}

/// One snowflake. `depth` is a parallax proxy drawn once per lifetime
/// segment; size, fall speed, and opacity all derive from it.
#[derive(Clone, Copy)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
    pub sway_phase: f32,
    pub sway_rate: f32,
}

impl Particle {
    /// Spawn rule shared by first generation and recycling. Recycled
    /// flakes always start at `RESPAWN_Y`.
    fn spawn(rng: &mut Rng, width: f32) -> Self {
        Self {
            x: rng.next() * width,
            y: RESPAWN_Y,
            depth: rng.next(),
            sway_phase: rng.next() * 2.0 * PI,
            sway_rate: rng.next() * 0.02,
        }
    }

    pub fn size(&self) -> f32 {
        self.depth * 3.0 + 0.5
    }

    pub fn fall_speed(&self) -> f32 {
        self.depth * 1.2 + 0.6
    }

    pub fn opacity(&self) -> f32 {
        self.depth * 0.4 + 0.1
    }
}

/// Fixed-count field of recycling flakes. Particles are never destroyed,
/// only respawned in place once they leave the visible range.
pub struct ParticleField {
    width: f32,
    height: f32,
    particles: Vec<Particle>,
    rng: Rng,
}

impl ParticleField {
    pub fn new(width: f32, height: f32, count: usize, seed: u32) -> Self {
        let mut field = Self {
            width,
            height,
            particles: Vec::with_capacity(count),
            rng: Rng::new(seed),
        };
        field.populate(count);
        field
    }

    /// Rebuild the population for a new surface size. The count stays
    /// fixed; every flake respawns, so a resize reads as a fresh start.
    pub fn initialize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        let count = self.particles.len();
        self.populate(count);
    }

    fn populate(&mut self, count: usize) {
        self.particles.clear();
        for _ in 0..count {
            let mut p = Particle::spawn(&mut self.rng, self.width);
            // First generation only: scatter over the full height so the
            // opening frame is not a single wave starting at the top.
            p.y = self.rng.next() * self.height;
            self.particles.push(p);
        }
    }

    /// One simulation tick: sway, fall, recycle.
    pub fn advance(&mut self) {
        for p in &mut self.particles {
            p.sway_phase += p.sway_rate;
            p.x += p.sway_phase.sin() * p.depth * 0.8;
            p.y += p.fall_speed();
            if p.y > self.height + RECYCLE_MARGIN {
                *p = Particle::spawn(&mut self.rng, self.width);
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}
