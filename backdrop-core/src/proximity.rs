//! Transient links between nearby particles.
//!
//! Links are rebuilt from scratch every frame into a caller-owned buffer
//! and never outlive it. Two strategies are provided behind
//! [`ProximityGraph`]:
//!
//! - [`PairwiseScan`] tests all `n * (n - 1) / 2` pairs. At the default
//!   densities (at most 40 particles, 780 pairs) this is the cheapest option.
//! - [`GridScan`] buckets particles into cells one link-distance wide and
//!   only tests neighbouring cells, which scales with density instead of
//!   with the square of the particle count.
//!
//! Both emit each unordered pair at most once, as `a < b`, sorted by
//! `(a, b)`.

use std::collections::HashMap;

use glam::Vec2;

use crate::{
    config::{FieldConfig, ProximityKind},
    field::Field,
    types::ParticleId,
};

/// A frame-scoped link between two particles of the same field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: ParticleId,
    pub b: ParticleId,
    pub opacity: f32,
}

/// Opacity of a link across distance `d`, or `None` at or beyond the
/// link distance.
///
/// Falls off linearly from `cfg.link_opacity` at zero to zero at
/// `cfg.link_distance`.
#[inline]
pub fn link_opacity(d: f32, cfg: &FieldConfig) -> Option<f32> {
    if d < cfg.link_distance {
        let o = (cfg.link_distance - d) / cfg.link_distance * cfg.link_opacity;
        Some(o.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Builds the connection set of a field.
pub trait ProximityGraph {
    /// Clears `out` and fills it with this frame's connections.
    fn build(&mut self, field: &Field, cfg: &FieldConfig, out: &mut Vec<Connection>);
}

/// Exhaustive O(n^2) pair test.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairwiseScan;

impl ProximityGraph for PairwiseScan {
    /// Tests every pair `(a, b)` with `a < b`, in index order.
    ///
    /// ### Parameters
    /// - `field` - Particles to link; only read access is required.
    /// - `cfg` - Link distance, link opacity, and the optional cap.
    /// - `out` - Cleared, then filled with connections sorted by `(a, b)`.
    fn build(&mut self, field: &Field, cfg: &FieldConfig, out: &mut Vec<Connection>) {
        out.clear();
        let ps = field.particles();
        for (a, pa) in ps.iter().enumerate() {
            for (b, pb) in ps.iter().enumerate().skip(a + 1) {
                if let Some(opacity) = link_opacity(pa.pos().distance(pb.pos()), cfg) {
                    out.push(Connection { a, b, opacity });
                }
            }
        }
        cap(out, cfg.max_connections);
    }
}

/// Uniform-grid bucketed pair test.
///
/// Only occupied cells are stored, keyed by integer cell coordinates, so
/// memory follows the particle count rather than the viewport area. The
/// map keeps its capacity between frames.
#[derive(Debug, Default)]
pub struct GridScan {
    cells: HashMap<(i64, i64), Vec<ParticleId>>,
}

/// Forward half of the 8-neighbourhood; with the same cell this visits
/// every adjacent cell pair exactly once.
const FORWARD: [(i64, i64); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

impl GridScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied cells after the last [`ProximityGraph::build`].
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn cell_of(p: Vec2, cell: f32) -> (i64, i64) {
        let q = (p / cell).floor();
        (q.x as i64, q.y as i64)
    }
}

impl ProximityGraph for GridScan {
    /// Buckets every particle into a cell one link distance wide, then
    /// tests each cell against itself and its forward neighbours.
    ///
    /// ### Parameters
    /// - `field` - Particles to link; only read access is required.
    /// - `cfg` - Provides the link distance (also the cell width), the
    ///   link opacity, and the optional connection cap.
    /// - `out` - Cleared, then filled with connections sorted by `(a, b)`.
    fn build(&mut self, field: &Field, cfg: &FieldConfig, out: &mut Vec<Connection>) {
        out.clear();
        self.cells.clear();
        let ps = field.particles();
        if ps.len() < 2 {
            return;
        }

        let cell = cfg.link_distance;
        for (id, p) in ps.iter().enumerate() {
            self.cells
                .entry(Self::cell_of(p.pos(), cell))
                .or_default()
                .push(id);
        }

        for (&(x, y), here) in &self.cells {
            for (i, &a) in here.iter().enumerate() {
                for &b in &here[i + 1..] {
                    push_link(ps[a].pos(), ps[b].pos(), a, b, cfg, out);
                }
            }

            for (dx, dy) in FORWARD {
                let Some(there) = self.cells.get(&(x + dx, y + dy)) else {
                    continue;
                };
                for &a in here {
                    for &b in there {
                        push_link(ps[a].pos(), ps[b].pos(), a, b, cfg, out);
                    }
                }
            }
        }

        out.sort_unstable_by_key(|c| (c.a, c.b));
        cap(out, cfg.max_connections);
    }
}

#[inline]
fn push_link(
    pa: Vec2,
    pb: Vec2,
    a: ParticleId,
    b: ParticleId,
    cfg: &FieldConfig,
    out: &mut Vec<Connection>,
) {
    if let Some(opacity) = link_opacity(pa.distance(pb), cfg) {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        out.push(Connection { a, b, opacity });
    }
}

/// Keeps the `max` most opaque (i.e. shortest) links.
fn cap(out: &mut Vec<Connection>, max: Option<usize>) {
    let Some(max) = max else {
        return;
    };
    if out.len() <= max {
        return;
    }
    log::debug!("capping {} connections to {}", out.len(), max);
    out.sort_by(|l, r| r.opacity.total_cmp(&l.opacity));
    out.truncate(max);
    out.sort_unstable_by_key(|c| (c.a, c.b));
}

/// Runtime-selected proximity strategy.
#[derive(Debug)]
pub enum Proximity {
    Pairwise(PairwiseScan),
    Grid(GridScan),
}

impl From<ProximityKind> for Proximity {
    fn from(kind: ProximityKind) -> Self {
        match kind {
            ProximityKind::Pairwise => Proximity::Pairwise(PairwiseScan),
            ProximityKind::Grid => Proximity::Grid(GridScan::new()),
        }
    }
}

impl ProximityGraph for Proximity {
    fn build(&mut self, field: &Field, cfg: &FieldConfig, out: &mut Vec<Connection>) {
        match self {
            Proximity::Pairwise(p) => p.build(field, cfg, out),
            Proximity::Grid(g) => g.build(field, cfg, out),
        }
    }
}
