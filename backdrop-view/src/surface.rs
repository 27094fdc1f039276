//! [`Surface`] implementation backed by an egui display list.
//!
//! egui paints immediately and forgets, while the backdrop expects a
//! canvas it can clear and redraw on its own schedule. [`ShapeSurface`]
//! bridges the two: draw calls append [`egui::Shape`]s in surface-local
//! coordinates, and [`ShapeSurface::paint`] replays the list into a
//! painter every egui frame.

use std::f32::consts::TAU;

use backdrop_core::surface::{Color, GradientStop, Surface};
use glam::Vec2;

/// Segments used to approximate a gradient ring.
const GRADIENT_SEGMENTS: u32 = 32;

/// Retained display list standing in for a canvas.
///
/// ### Fields
/// - `shapes` - Shapes drawn since the last full clear, surface-local.
/// - `size` - Surface extents; a clear covering them drops everything.
/// - `layer_opacity` - Opacity of the whole layer, applied on top of the
///   global alpha.
///
/// - `alpha` - Current global alpha.
/// - `offset` - Current translation.
/// - `stack` - Saved `(alpha, offset)` pairs.
#[derive(Debug)]
pub struct ShapeSurface {
    shapes: Vec<egui::Shape>,
    size: Vec2,
    layer_opacity: f32,
    alpha: f32,
    offset: Vec2,
    stack: Vec<(f32, Vec2)>,
}

impl ShapeSurface {
    pub fn new(size: Vec2, layer_opacity: f32) -> Self {
        Self {
            shapes: Vec::with_capacity(128),
            size,
            layer_opacity: layer_opacity.clamp(0.0, 1.0),
            alpha: 1.0,
            offset: Vec2::ZERO,
            stack: Vec::new(),
        }
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn shapes(&self) -> &[egui::Shape] {
        &self.shapes
    }

    /// Replays the display list with the surface origin at `origin`.
    pub fn paint(&self, painter: &egui::Painter, origin: egui::Pos2) {
        for shape in &self.shapes {
            let mut shape = shape.clone();
            shape.translate(origin.to_vec2());
            painter.add(shape);
        }
    }

    #[inline]
    fn pos(&self, p: Vec2) -> egui::Pos2 {
        let q = p + self.offset;
        egui::pos2(q.x, q.y)
    }

    fn color(&self, c: Color) -> egui::Color32 {
        let a = (c.a * self.alpha * self.layer_opacity).clamp(0.0, 1.0);
        egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, (a * 255.0).round() as u8)
    }
}

impl Surface for ShapeSurface {
    fn clear_rect(&mut self, min: Vec2, max: Vec2) {
        let (min, max) = (min + self.offset, max + self.offset);
        if min.cmple(Vec2::ZERO).all() && max.cmpge(self.size).all() {
            self.shapes.clear();
            return;
        }

        // Partial clear: drop shapes that lie entirely inside the rect.
        let rect = egui::Rect::from_min_max(egui::pos2(min.x, min.y), egui::pos2(max.x, max.y));
        self.shapes
            .retain(|s| !rect.contains_rect(s.visual_bounding_rect()));
    }

    fn save(&mut self) {
        self.stack.push((self.alpha, self.offset));
    }

    fn restore(&mut self) {
        if let Some((alpha, offset)) = self.stack.pop() {
            self.alpha = alpha;
            self.offset = offset;
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn translate(&mut self, offset: Vec2) {
        self.offset += offset;
    }

    fn stroke_polyline(&mut self, points: &[Vec2], closed: bool, width: f32, color: Color) {
        let pts: Vec<egui::Pos2> = points.iter().map(|&p| self.pos(p)).collect();
        let stroke = egui::Stroke::new(width, self.color(color));
        let shape = if closed {
            egui::Shape::closed_line(pts, stroke)
        } else {
            egui::Shape::line(pts, stroke)
        };
        self.shapes.push(shape);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let shape = egui::Shape::circle_filled(self.pos(center), radius, self.color(color));
        self.shapes.push(shape);
    }

    /// Builds a triangle fan from the first stop out to the center ring,
    /// then one quad strip per further stop.
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        let Some(first) = stops.first() else {
            return;
        };
        if radius <= 0.0 {
            return;
        }

        let c = self.pos(center);
        let mut mesh = egui::Mesh::default();
        mesh.colored_vertex(c, self.color(first.color));

        let mut prev: Option<u32> = None;
        for stop in stops.iter().filter(|s| s.offset > 0.0) {
            let base = mesh.vertices.len() as u32;
            let color = self.color(stop.color);
            let r = radius * stop.offset.min(1.0);

            for i in 0..GRADIENT_SEGMENTS {
                let a = i as f32 / GRADIENT_SEGMENTS as f32 * TAU;
                mesh.colored_vertex(c + egui::vec2(a.cos(), a.sin()) * r, color);
            }

            for i in 0..GRADIENT_SEGMENTS {
                let j = (i + 1) % GRADIENT_SEGMENTS;
                match prev {
                    None => mesh.add_triangle(0, base + i, base + j),
                    Some(p) => {
                        mesh.add_triangle(p + i, base + i, base + j);
                        mesh.add_triangle(p + i, base + j, p + j);
                    }
                }
            }
            prev = Some(base);
        }

        self.shapes.push(egui::Shape::mesh(mesh));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::{
        field::Field,
        particle::{Particle, ParticleKind},
        renderer::{self, Style},
    };

    fn particle(pos: Vec2, kind: ParticleKind, opacity: f32) -> Particle {
        Particle::new(pos, Vec2::ZERO, 6.0, kind, 0.0, 0.02, opacity)
    }

    #[test]
    fn render_produces_one_shape_per_particle() {
        let field = Field::from_particles(
            Vec2::new(300.0, 300.0),
            vec![
                particle(Vec2::new(10.0, 10.0), ParticleKind::Outline, 0.4),
                particle(Vec2::new(250.0, 250.0), ParticleKind::Glow, 0.4),
                particle(Vec2::new(290.0, 10.0), ParticleKind::Dot, 0.4),
            ],
        );
        let mut surface = ShapeSurface::new(field.size(), 1.0);

        renderer::render(&mut surface, &field, &[], &Style::default());
        assert_eq!(surface.shapes().len(), 3);

        renderer::render(&mut surface, &field, &[], &Style::default());
        assert_eq!(surface.shapes().len(), 3, "full clear drops last frame");
    }

    #[test]
    fn global_alpha_and_layer_opacity_multiply() {
        let mut surface = ShapeSurface::new(Vec2::new(100.0, 100.0), 0.5);
        surface.set_global_alpha(0.5);
        surface.fill_circle(Vec2::new(10.0, 10.0), 2.0, Color::rgb(5, 150, 105));

        match &surface.shapes()[0] {
            egui::Shape::Circle(c) => assert_eq!(c.fill.a(), 64),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn restore_resets_alpha_and_translation() {
        let mut surface = ShapeSurface::new(Vec2::new(100.0, 100.0), 1.0);
        surface.save();
        surface.set_global_alpha(0.1);
        surface.translate(Vec2::new(40.0, 50.0));
        surface.fill_circle(Vec2::ZERO, 1.0, Color::rgb(255, 0, 0));
        surface.restore();
        surface.fill_circle(Vec2::ZERO, 1.0, Color::rgb(255, 0, 0));

        let circles: Vec<_> = surface
            .shapes()
            .iter()
            .filter_map(|s| match s {
                egui::Shape::Circle(c) => Some((c.center, c.fill.a())),
                _ => None,
            })
            .collect();
        assert_eq!(
            circles,
            vec![(egui::pos2(40.0, 50.0), 26), (egui::pos2(0.0, 0.0), 255)]
        );
    }

    #[test]
    fn gradient_mesh_has_center_plus_one_ring_per_stop() {
        let mut surface = ShapeSurface::new(Vec2::new(100.0, 100.0), 1.0);
        surface.fill_radial_gradient(Vec2::new(50.0, 50.0), 8.0, &Style::default().glow_stops);

        match &surface.shapes()[0] {
            egui::Shape::Mesh(mesh) => {
                assert_eq!(mesh.vertices.len(), 1 + 2 * GRADIENT_SEGMENTS as usize);
                assert_eq!(mesh.indices.len(), 3 * 3 * GRADIENT_SEGMENTS as usize);
                let rim = mesh.vertices.last().unwrap();
                assert_eq!(rim.color.a(), 0);
            }
            other => panic!("expected mesh, got {other:?}"),
        }
    }

    #[test]
    fn partial_clear_keeps_shapes_outside_the_rect() {
        let mut surface = ShapeSurface::new(Vec2::new(100.0, 100.0), 1.0);
        surface.fill_circle(Vec2::new(10.0, 10.0), 2.0, Color::rgb(0, 0, 0));
        surface.fill_circle(Vec2::new(90.0, 90.0), 2.0, Color::rgb(0, 0, 0));

        surface.clear_rect(Vec2::ZERO, Vec2::new(50.0, 50.0));

        assert_eq!(surface.shapes().len(), 1);
    }
}
