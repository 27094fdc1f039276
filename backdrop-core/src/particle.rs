use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::config::FieldConfig;

/// Visual recipe a particle is drawn with. Fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Stroked five-point polygon.
    Outline,
    /// Radial gradient disk.
    Glow,
    /// Small solid circle.
    Dot,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 3] = [Self::Outline, Self::Glow, Self::Dot];

    /// Picks one of the three kinds uniformly.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// One drifting element of the backdrop.
///
/// Only `pos` and `opacity` evolve over time, and only the simulator
/// moves them. `vel`, `size`, `kind`, `phase` and `frequency` are fixed
/// when the particle is created. Everything is exposed read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pos: Vec2,
    opacity: f32,
    vel: Vec2,
    size: f32,
    kind: ParticleKind,
    phase: f32,
    frequency: f32,
}

impl Particle {
    pub fn new(
        pos: Vec2,
        vel: Vec2,
        size: f32,
        kind: ParticleKind,
        phase: f32,
        frequency: f32,
        opacity: f32,
    ) -> Self {
        let mut p = Self {
            pos,
            opacity: 0.0,
            vel,
            size,
            kind,
            phase,
            frequency,
        };
        p.set_opacity(opacity);
        p
    }

    /// Creates a particle with every attribute drawn from `cfg`'s ranges.
    ///
    /// ### Parameters
    /// - `bounds` - Viewport extents; both must be positive. The position
    ///   is uniform over `[0, bounds.x) x [0, bounds.y)`.
    /// - `cfg` - Velocity, size, opacity, and frequency ranges.
    /// - `rng` - Source of randomness.
    pub fn random(bounds: Vec2, cfg: &FieldConfig, rng: &mut impl Rng) -> Self {
        let pos = Vec2::new(
            rng.random_range(0.0..bounds.x),
            rng.random_range(0.0..bounds.y),
        );
        let vel = Vec2::new(
            symmetric(rng, cfg.velocity.x),
            symmetric(rng, cfg.velocity.y),
        );

        Self::new(
            pos,
            vel,
            sample(rng, cfg.size),
            ParticleKind::random(rng),
            rng.random_range(0.0..TAU),
            sample(rng, cfg.frequency),
            sample(rng, cfg.initial_opacity),
        )
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub(crate) fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Sets the opacity, clamped into `[0, 1]`.
    #[inline]
    pub(crate) fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

fn sample(rng: &mut impl Rng, [min, max]: [f32; 2]) -> f32 {
    if min < max {
        rng.random_range(min..max)
    } else {
        min
    }
}

fn symmetric(rng: &mut impl Rng, half: f32) -> f32 {
    let half = half.abs();
    if half > 0.0 {
        rng.random_range(-half..half)
    } else {
        0.0
    }
}
