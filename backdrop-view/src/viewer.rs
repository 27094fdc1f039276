//! Dashboard shell that mounts the particle backdrop behind its content.
//!
//! [`Viewer`] owns a [`Scheduler`] bound to a [`ShapeSurface`] and a
//! [`RepaintHost`]. Each egui frame it:
//! 1. mounts or unmounts the backdrop to match the toggle,
//! 2. forwards viewport size changes to [`Scheduler::on_resize`],
//! 3. delivers the due frame request to [`Scheduler::on_frame`],
//! 4. replays the surface's display list under the UI.

use backdrop_core::{
    field::Tier,
    scheduler::{FrameStats, Scheduler, SchedulerState},
};
use eframe::App;
use glam::Vec2;
use rand::{rng, rngs::ThreadRng};

use crate::{host::RepaintHost, settings::Settings, surface::ShapeSurface};

type Backdrop = Scheduler<ShapeSurface, RepaintHost, ThreadRng>;

/// Page background behind the backdrop layer.
const PAGE_FILL: egui::Color32 = egui::Color32::from_rgb(240, 253, 244);

/// Main application state for the backdrop viewer.
///
/// [`Viewer`] glues together:
/// - The backdrop core: a [`Scheduler`] bound to a [`ShapeSurface`] and
///   driven by a [`RepaintHost`].
/// - A mount toggle and the last observed viewport size.
/// - eframe/egui callbacks for the panels and the backdrop layer.
///
/// ### Fields
/// - `backdrop` - The scheduler; running while the backdrop is mounted.
/// - `settings` - Loaded settings, including the layer opacity used for
///   every new [`ShapeSurface`].
///
/// - `mounted` - Whether the user wants the backdrop mounted.
/// - `viewport` - Size of the central panel at the last sync.
///
/// - `last_stats` - Particle and link counts of the last tick (status bar).
/// - `last_frame_time` - egui time of the last tick, in seconds.
/// - `last_frame_dt` - Time between the last two ticks (display only).
pub struct Viewer {
    backdrop: Backdrop,
    settings: Settings,

    mounted: bool,
    viewport: Option<Vec2>,

    last_stats: FrameStats,
    last_frame_time: f64,
    last_frame_dt: f64,
}

impl Viewer {
    /// Creates a viewer with the backdrop stopped; it mounts on the first
    /// frame, once the central panel size is known.
    ///
    /// ### Parameters
    /// - `ctx` - egui context that frame requests repaint.
    /// - `settings` - Field, style, and layer settings.
    ///
    /// ### Returns
    /// A [`Viewer`] ready to be passed to `eframe::run_native`.
    pub fn new(ctx: &egui::Context, settings: Settings) -> Self {
        let backdrop = Scheduler::new(
            RepaintHost::new(ctx.clone()),
            rng(),
            settings.field.clone(),
            settings.style.clone(),
        );

        Self {
            backdrop,
            settings,
            mounted: true,
            viewport: None,
            last_stats: FrameStats::default(),
            last_frame_time: 0.0,
            last_frame_dt: 0.0,
        }
    }

    /// Starts the backdrop on a fresh surface of `size`.
    fn mount(&mut self, size: Vec2) {
        self.viewport = Some(size);
        let surface = ShapeSurface::new(size, self.settings.layer_opacity);
        self.backdrop.start(Some(surface), size);
    }

    fn unmount(&mut self) {
        self.backdrop.stop();
        self.last_stats = FrameStats::default();
    }

    /// Brings the scheduler in line with the toggle and the viewport size.
    fn sync(&mut self, size: Vec2) {
        match (self.mounted, self.backdrop.state()) {
            (true, SchedulerState::Stopped) => self.mount(size),
            (false, SchedulerState::Running) => self.unmount(),
            (true, SchedulerState::Running) if self.viewport != Some(size) => {
                self.viewport = Some(size);
                if let Some(surface) = self.backdrop.surface_mut() {
                    surface.set_size(size);
                }
                self.backdrop.on_resize(size);
            }
            _ => {}
        }
    }

    /// Delivers the due frame request, if any, at egui time `now` (seconds).
    fn advance(&mut self, now: f64) {
        let Some(id) = self.backdrop.host_mut().take_due() else {
            return;
        };
        if let Some(stats) = self.backdrop.on_frame(id, now * 1000.0) {
            if self.last_frame_time > 0.0 {
                self.last_frame_dt = now - self.last_frame_time;
            }
            self.last_frame_time = now;
            self.last_stats = stats;
        }
    }

    /// Builds the top panel (mount toggle, reseed).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.mounted, "Backdrop");

                let running = self.backdrop.state() == SchedulerState::Running;
                if ui
                    .add_enabled(running, egui::Button::new("Reseed"))
                    .clicked()
                    && let Some(size) = self.viewport
                {
                    self.backdrop.stop();
                    self.mount(size);
                }
            });
        });
    }

    /// Builds the bottom status bar (particles, links, frame time).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt = {:.3} s", self.last_frame_dt));
                ui.separator();
                ui.label(format!("links = {}", self.last_stats.connections));
                ui.label(format!("particles = {}", self.last_stats.particles));
                if let Some(size) = self.viewport {
                    ui.label(format!(
                        "tier = {:?}",
                        Tier::for_width(size.x, self.backdrop.config())
                    ));
                }
                ui.separator();
                ui.label(format!("{:?}", self.backdrop.state()));
            });
        });
    }

    /// Builds the central panel with the backdrop painted underneath.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(PAGE_FILL))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;

                self.sync(Vec2::new(rect.width(), rect.height()));
                self.advance(ctx.input(|i| i.time));

                if let Some(surface) = self.backdrop.surface() {
                    surface.paint(&ui.painter_at(rect), rect.min);
                }
            });
    }
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.backdrop.stop();
    }
}
