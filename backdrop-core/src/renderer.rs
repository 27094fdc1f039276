//! Paints a field and its links onto a [`Surface`].
//!
//! Draw order per frame:
//! 1. clear the whole surface,
//! 2. every connection as a thin straight line,
//! 3. every particle with its kind's recipe.
//!
//! Each link and particle is drawn inside its own `save`/`restore` pair so
//! its alpha and translation never leak into the next draw.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    field::Field,
    particle::{Particle, ParticleKind},
    proximity::Connection,
    surface::{Color, GradientStop, Surface},
};

/// Vertex count of the [`ParticleKind::Outline`] polygon.
pub const OUTLINE_VERTICES: usize = 5;

const EMERALD: Color = Color::rgb(16, 185, 129);
const DEEP_EMERALD: Color = Color::rgb(5, 150, 105);

/// Colors and stroke widths of the backdrop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub link_color: Color,
    pub link_width: f32,
    pub outline_color: Color,
    pub outline_width: f32,
    pub glow_stops: Vec<GradientStop>,
    pub dot_color: Color,
    /// Dot radius as a fraction of particle size.
    pub dot_scale: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            link_color: EMERALD,
            link_width: 1.0,
            outline_color: EMERALD,
            outline_width: 2.0,
            glow_stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: EMERALD.with_alpha(0.8),
                },
                GradientStop {
                    offset: 0.5,
                    color: EMERALD.with_alpha(0.3),
                },
                GradientStop {
                    offset: 1.0,
                    color: EMERALD.with_alpha(0.0),
                },
            ],
            dot_color: DEEP_EMERALD,
            dot_scale: 0.4,
        }
    }
}

/// Draws one full frame.
///
/// ### Parameters
/// - `surface` - Target surface; fully cleared before anything is drawn.
/// - `field` - Particles to draw; only read access is required.
/// - `connections` - This frame's links, indexing into `field`.
/// - `style` - Colors and stroke widths.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    field: &Field,
    connections: &[Connection],
    style: &Style,
) {
    surface.clear_rect(Vec2::ZERO, field.size().max(Vec2::ZERO));

    let ps = field.particles();
    for c in connections {
        draw_connection(surface, ps[c.a].pos(), ps[c.b].pos(), c.opacity, style);
    }

    for p in ps {
        draw_particle(surface, p, style);
    }
}

fn draw_connection<S: Surface + ?Sized>(
    surface: &mut S,
    from: Vec2,
    to: Vec2,
    opacity: f32,
    style: &Style,
) {
    surface.save();
    surface.set_global_alpha(opacity);
    surface.stroke_polyline(&[from, to], false, style.link_width, style.link_color);
    surface.restore();
}

fn draw_particle<S: Surface + ?Sized>(surface: &mut S, p: &Particle, style: &Style) {
    surface.save();
    surface.set_global_alpha(p.opacity());
    surface.translate(p.pos());

    match p.kind() {
        ParticleKind::Outline => {
            let pts = outline_points(p.size(), p.phase());
            surface.stroke_polyline(&pts, true, style.outline_width, style.outline_color);
        }
        ParticleKind::Glow => {
            surface.fill_radial_gradient(Vec2::ZERO, p.size(), &style.glow_stops);
        }
        ParticleKind::Dot => {
            surface.fill_circle(Vec2::ZERO, p.size() * style.dot_scale, style.dot_color);
        }
    }

    surface.restore();
}

/// Vertices of the outline polygon around the origin.
///
/// Vertex `i` sits at angle `i / 5 * TAU + phase`, at radius
/// `size * (0.5 + sin(angle) * 0.3)`.
pub fn outline_points(size: f32, phase: f32) -> [Vec2; OUTLINE_VERTICES] {
    std::array::from_fn(|i| {
        let angle = i as f32 / OUTLINE_VERTICES as f32 * TAU + phase;
        let radius = size * (0.5 + angle.sin() * 0.3);
        Vec2::from_angle(angle) * radius
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::FieldConfig,
        proximity::{PairwiseScan, ProximityGraph},
        simulator,
        surface::{DrawCmd, RecordingSurface},
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn particle(pos: Vec2, kind: ParticleKind, opacity: f32) -> Particle {
        Particle::new(pos, Vec2::ZERO, 6.0, kind, 0.25, 0.02, opacity)
    }

    /// Replays the recorded state stack and returns the effective alpha
    /// and translation at every paint command.
    fn effective_state(cmds: &[DrawCmd]) -> Vec<(f32, Vec2)> {
        let mut alpha = 1.0;
        let mut offset = Vec2::ZERO;
        let mut stack = Vec::new();
        let mut out = Vec::new();
        for c in cmds {
            match c {
                DrawCmd::Save => stack.push((alpha, offset)),
                DrawCmd::Restore => (alpha, offset) = stack.pop().unwrap(),
                DrawCmd::GlobalAlpha(a) => alpha = *a,
                DrawCmd::Translate(t) => offset += *t,
                c if c.is_paint() => out.push((alpha, offset)),
                _ => {}
            }
        }
        assert!(stack.is_empty(), "unbalanced save/restore");
        out
    }

    #[test]
    fn frame_begins_with_full_surface_clear() {
        let size = Vec2::new(800.0, 600.0);
        let field = Field::from_particles(
            size,
            vec![particle(Vec2::new(10.0, 10.0), ParticleKind::Dot, 0.4)],
        );
        let mut surface = RecordingSurface::new();

        for _ in 0..2 {
            render(&mut surface, &field, &[], &Style::default());
            let cmds = surface.take();
            assert_eq!(
                cmds.first(),
                Some(&DrawCmd::Clear {
                    min: Vec2::ZERO,
                    max: size
                })
            );
            assert_eq!(
                cmds.iter()
                    .filter(|c| matches!(c, DrawCmd::Clear { .. }))
                    .count(),
                1
            );
        }
    }

    #[test]
    fn connections_are_drawn_before_particles() {
        let cfg = FieldConfig::default();
        let field = Field::from_particles(
            Vec2::new(400.0, 400.0),
            vec![
                particle(Vec2::new(100.0, 100.0), ParticleKind::Glow, 0.3),
                particle(Vec2::new(150.0, 100.0), ParticleKind::Outline, 0.2),
            ],
        );
        let mut links = Vec::new();
        PairwiseScan.build(&field, &cfg, &mut links);
        assert_eq!(links.len(), 1);

        let mut surface = RecordingSurface::new();
        render(&mut surface, &field, &links, &Style::default());

        let paints: Vec<_> = surface.commands.iter().filter(|c| c.is_paint()).collect();
        assert_eq!(paints.len(), 3);
        assert_eq!(
            paints[0],
            &DrawCmd::Polyline {
                points: vec![Vec2::new(100.0, 100.0), Vec2::new(150.0, 100.0)],
                closed: false,
                width: 1.0,
                color: Color::rgb(16, 185, 129),
            }
        );
        assert!(matches!(paints[1], DrawCmd::Gradient { .. }));
        assert!(matches!(paints[2], DrawCmd::Polyline { closed: true, .. }));
    }

    #[test]
    fn each_draw_uses_only_its_own_alpha() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = Field::new(Vec2::new(600.0, 400.0), &cfg, &mut rng);
        simulator::step(&mut field, 5_000.0, &cfg);
        let mut links = Vec::new();
        PairwiseScan.build(&field, &cfg, &mut links);

        let mut surface = RecordingSurface::new();
        render(&mut surface, &field, &links, &Style::default());
        let states = effective_state(&surface.commands);

        let expected: Vec<(f32, Vec2)> = links
            .iter()
            .map(|c| (c.opacity, Vec2::ZERO))
            .chain(field.particles().iter().map(|p| (p.opacity(), p.pos())))
            .collect();
        assert_eq!(states, expected);
    }

    #[test]
    fn kind_recipes_use_expected_geometry() {
        let field = Field::from_particles(
            Vec2::new(100.0, 100.0),
            vec![
                particle(Vec2::new(1.0, 2.0), ParticleKind::Outline, 0.5),
                particle(Vec2::new(3.0, 4.0), ParticleKind::Glow, 0.5),
                particle(Vec2::new(5.0, 6.0), ParticleKind::Dot, 0.5),
            ],
        );
        let style = Style::default();
        let mut surface = RecordingSurface::new();
        render(&mut surface, &field, &[], &style);

        let paints: Vec<_> = surface.commands.into_iter().filter(|c| c.is_paint()).collect();
        assert_eq!(
            paints,
            vec![
                DrawCmd::Polyline {
                    points: outline_points(6.0, 0.25).to_vec(),
                    closed: true,
                    width: 2.0,
                    color: Color::rgb(16, 185, 129),
                },
                DrawCmd::Gradient {
                    center: Vec2::ZERO,
                    radius: 6.0,
                    stops: style.glow_stops.clone(),
                },
                DrawCmd::Circle {
                    center: Vec2::ZERO,
                    radius: 6.0 * 0.4,
                    color: Color::rgb(5, 150, 105),
                },
            ]
        );
    }

    #[test]
    fn outline_radius_is_modulated_by_angle() {
        let size = 10.0;
        let phase = 0.0;
        for (i, v) in outline_points(size, phase).iter().enumerate() {
            let angle = i as f32 / 5.0 * TAU + phase;
            let expected = size * (0.5 + angle.sin() * 0.3);
            assert!((v.length() - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn glow_fades_to_transparent_rim() {
        let stops = Style::default().glow_stops;
        assert_eq!(stops.first().map(|s| s.offset), Some(0.0));
        assert_eq!(stops.last().map(|s| (s.offset, s.color.a)), Some((1.0, 0.0)));
    }

    #[test]
    fn empty_field_only_clears() {
        let field = Field::empty(Vec2::new(0.0, 0.0));
        let mut surface = RecordingSurface::new();
        render(&mut surface, &field, &[], &Style::default());
        assert_eq!(
            surface.commands,
            vec![DrawCmd::Clear {
                min: Vec2::ZERO,
                max: Vec2::ZERO
            }]
        );
    }
}
