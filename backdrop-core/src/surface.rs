//! The host-provided 2-D drawing surface.
//!
//! [`Surface`] mirrors the small subset of an immediate-mode canvas the
//! renderer needs: clearing, stroked polylines, filled circles, radial
//! gradients, a global alpha, and translation, with a save/restore stack
//! for the last two.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) color with a fractional alpha.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// One color stop of a radial gradient; `offset` runs from 0 (center)
/// to 1 (rim).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// Drawing operations the renderer issues.
///
/// Coordinates are in surface space, shifted by the current translation.
/// Every draw call is multiplied by the current global alpha.
pub trait Surface {
    fn clear_rect(&mut self, min: Vec2, max: Vec2);

    /// Pushes the current global alpha and translation.
    fn save(&mut self);
    /// Pops the state pushed by the matching [`Surface::save`].
    fn restore(&mut self);

    fn set_global_alpha(&mut self, alpha: f32);
    fn translate(&mut self, offset: Vec2);

    fn stroke_polyline(&mut self, points: &[Vec2], closed: bool, width: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);
}

/// A draw call captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Clear {
        min: Vec2,
        max: Vec2,
    },
    Save,
    Restore,
    GlobalAlpha(f32),
    Translate(Vec2),
    Polyline {
        points: Vec<Vec2>,
        closed: bool,
        width: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Gradient {
        center: Vec2,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl DrawCmd {
    /// `true` for commands that put pixels on the surface.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            DrawCmd::Polyline { .. } | DrawCmd::Circle { .. } | DrawCmd::Gradient { .. }
        )
    }
}

/// A headless surface that records every call, for tests and tooling.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCmd>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and forgets everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn clear_rect(&mut self, min: Vec2, max: Vec2) {
        self.commands.push(DrawCmd::Clear { min, max });
    }

    fn save(&mut self) {
        self.commands.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCmd::Restore);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCmd::GlobalAlpha(alpha));
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCmd::Translate(offset));
    }

    fn stroke_polyline(&mut self, points: &[Vec2], closed: bool, width: f32, color: Color) {
        self.commands.push(DrawCmd::Polyline {
            points: points.to_vec(),
            closed,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCmd::Gradient {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }
}
