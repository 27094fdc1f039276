use glam::Vec2;
use rand::Rng;

use crate::{config::FieldConfig, particle::Particle};

/// Particle-density bucket chosen from the viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Narrow,
    Wide,
}

impl Tier {
    pub fn for_width(width: f32, cfg: &FieldConfig) -> Self {
        if width < cfg.narrow_breakpoint {
            Tier::Narrow
        } else {
            Tier::Wide
        }
    }

    pub fn count(self, cfg: &FieldConfig) -> usize {
        match self {
            Tier::Narrow => cfg.narrow_count,
            Tier::Wide => cfg.wide_count,
        }
    }
}

/// The particle collection for one viewport.
///
/// The number of particles is decided once in [`Field::new`] and can't
/// change afterwards: callers only ever get slices, never the `Vec`.
/// A resized viewport gets a brand new `Field`.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    particles: Vec<Particle>,
    size: Vec2,
}

impl Field {
    /// Number of particles a viewport of `size` receives.
    ///
    /// Degenerate viewports (zero, negative or NaN extents) get none.
    pub fn particle_count(size: Vec2, cfg: &FieldConfig) -> usize {
        if size.x > 0.0 && size.y > 0.0 {
            Tier::for_width(size.x, cfg).count(cfg)
        } else {
            0
        }
    }

    /// Creates a field of randomly placed particles for a viewport of `size`.
    ///
    /// The count comes from [`Field::particle_count`]; every particle is
    /// drawn with [`Particle::random`].
    ///
    /// ### Parameters
    /// - `size` - Viewport width and height in surface units.
    /// - `cfg` - Density tiers and attribute ranges.
    /// - `rng` - Source of randomness for positions and attributes.
    ///
    /// ### Returns
    /// A new [`Field`]; empty if either extent is not positive.
    pub fn new(size: Vec2, cfg: &FieldConfig, rng: &mut impl Rng) -> Self {
        let count = Self::particle_count(size, cfg);
        let particles = (0..count)
            .map(|_| Particle::random(size, cfg, rng))
            .collect();

        log::debug!(
            "created field {}x{} with {} particles",
            size.x,
            size.y,
            count
        );

        Self { particles, size }
    }

    /// Wraps an explicit particle list, e.g. for a deterministic scene.
    pub fn from_particles(size: Vec2, particles: Vec<Particle>) -> Self {
        Self { particles, size }
    }

    pub fn empty(size: Vec2) -> Self {
        Self::from_particles(size, Vec::new())
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access is limited to the simulator step.
    #[inline]
    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: crate::types::ParticleId) -> &Particle {
        &self.particles[id]
    }
}
