//! Particle field: rest positions of the air particles.

use glam::DVec2;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Fraction of the particle area, from the left, kept free of particles.
///
/// The speaker cone sits at this boundary; keep in sync with
/// `limits::MAX_AMPLITUDE_FRACTION` so particles are never pushed past it.
pub const MARGIN_FRACTION: f64 = 0.1;

/// Number of particles (in canonical order) drawn highlighted
pub const HIGHLIGHT_COUNT: usize = 3;

/// Rectangle in rendering coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Left edge of the particle spawn region (the speaker cone position)
    pub fn margin_x(&self) -> f64 {
        self.left + self.width * MARGIN_FRACTION
    }
}

/// A particle at rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub origin: DVec2,
}

/// Particles in insertion (canonical) order, plus a lazily built x-sorted view
pub struct ParticleField {
    particles: Vec<Particle>,
    /// Indices into `particles`, ascending by origin x; `None` once stale
    sorted: Option<Vec<usize>>,
    rng: SmallRng,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Deterministic field for tests and benchmarks
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            particles: Vec::new(),
            sorted: Some(Vec::new()),
            rng,
        }
    }

    /// Grow or shrink to `target` particles.
    ///
    /// Growing appends new particles sampled uniformly from the spawn region of
    /// `bounds`; shrinking truncates from the end. Existing particles never move
    /// or reorder, and an unchanged count draws no new samples.
    pub fn resize(&mut self, target: usize, bounds: &Bounds) {
        let current = self.particles.len();
        if target == current {
            return;
        }

        if target < current {
            self.particles.truncate(target);
            // Release memory after a big shrink
            if self.particles.capacity() > 2 * target.max(64) {
                self.particles.shrink_to_fit();
            }
        } else {
            let x_min = bounds.margin_x();
            let x_max = bounds.right();
            let y_min = bounds.top;
            let y_max = bounds.bottom();

            self.particles.reserve(target - current);
            for _ in current..target {
                let x = sample(&mut self.rng, x_min, x_max);
                let y = sample(&mut self.rng, y_min, y_max);
                self.particles.push(Particle {
                    origin: DVec2::new(x, y),
                });
            }
        }

        self.sorted = None;
        debug!("Particle field resized: {} -> {}", current, target);
    }

    /// Drop every particle and sample `count` new ones inside `bounds`
    pub fn regenerate(&mut self, count: usize, bounds: &Bounds) {
        self.particles.clear();
        self.sorted = None;
        self.resize(count, bounds);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles in canonical (insertion) order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Whether the particle at canonical `index` is highlighted
    pub fn is_highlighted(index: usize) -> bool {
        index < HIGHLIGHT_COUNT
    }

    /// The highlighted particles: the first few in canonical order
    pub fn highlighted(&self) -> &[Particle] {
        &self.particles[..self.particles.len().min(HIGHLIGHT_COUNT)]
    }

    /// Canonical indices ordered by ascending origin x
    pub fn sorted_indices(&mut self) -> &[usize] {
        let particles = &self.particles;
        self.sorted
            .get_or_insert_with(|| sort_by_x(particles))
            .as_slice()
    }

    /// Particles by ascending origin x (for curve polylines)
    pub fn iter_sorted(&mut self) -> impl Iterator<Item = &Particle> + '_ {
        let particles = &self.particles;
        let sorted = self.sorted.get_or_insert_with(|| sort_by_x(particles));
        sorted.iter().map(move |&i| &particles[i])
    }
}

fn sort_by_x(particles: &[Particle]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..particles.len()).collect();
    indices.sort_by(|&a, &b| particles[a].origin.x.total_cmp(&particles[b].origin.x));
    indices
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new()
    }
}

fn sample(rng: &mut SmallRng, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
