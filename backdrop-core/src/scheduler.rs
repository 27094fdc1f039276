//! Frame loop and lifecycle of the backdrop.
//!
//! The scheduler is a two-state machine, `Stopped -> Running -> Stopped`.
//! While running it holds the drawing surface, the [`Field`], and the id of
//! the single outstanding frame request. The host calls
//! [`Scheduler::on_frame`] when that request fires; the scheduler then runs
//! simulate -> connect -> render and requests the next frame.
//!
//! Everything is single-threaded. A tick always finishes before the next
//! frame is requested, so frames never overlap. A callback carrying any id
//! other than the outstanding one is ignored, which makes a late callback
//! from a previous start/stop cycle harmless.

use glam::Vec2;
use rand::Rng;

use crate::{
    config::FieldConfig,
    field::{Field, Tier},
    proximity::{Connection, Proximity, ProximityGraph},
    renderer::{self, Style},
    simulator,
    surface::Surface,
};

/// Handle of one frame request issued by a [`FrameHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// The host's "call me back on the next frame" primitive.
pub trait FrameHost {
    /// Schedules one callback to [`Scheduler::on_frame`] with the
    /// returned id.
    fn request_frame(&mut self) -> FrameId;
    /// Withdraws a request; its callback must not be delivered afterwards.
    fn cancel_frame(&mut self, id: FrameId);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// What one tick produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub connections: usize,
}

/// State that only exists between `start` and `stop`.
#[derive(Debug)]
struct Running<S> {
    surface: S,
    field: Field,
    pending: Option<FrameId>,
    /// Latest viewport size reported since the last tick.
    resize: Option<Vec2>,
}

/// Drives the simulate -> connect -> render pipeline once per host frame.
///
/// ### Fields
/// - `host` - Frame-scheduling primitive of the host.
/// - `rng` - Randomness for every field built on start or resize.
/// - `cfg` - Field generation, motion, and linking parameters.
/// - `style` - Render colors and stroke widths.
///
/// - `proximity` - Link builder selected by `cfg.proximity`.
/// - `connections` - Per-frame link buffer, emptied after rendering.
///
/// - `running` - Surface, field, and pending request; `None` while stopped.
pub struct Scheduler<S, H, R> {
    host: H,
    rng: R,
    cfg: FieldConfig,
    style: Style,
    proximity: Proximity,
    connections: Vec<Connection>,
    running: Option<Running<S>>,
}

impl<S: Surface, H: FrameHost, R: Rng> Scheduler<S, H, R> {
    /// Creates a stopped scheduler.
    ///
    /// ### Parameters
    /// - `host` - Frame-scheduling primitive used once started.
    /// - `rng` - Randomness for field generation.
    /// - `cfg` - Field configuration; also picks the proximity strategy.
    /// - `style` - Render style.
    pub fn new(host: H, rng: R, cfg: FieldConfig, style: Style) -> Self {
        let proximity = Proximity::from(cfg.proximity);
        Self {
            host,
            rng,
            cfg,
            style,
            proximity,
            connections: Vec::new(),
            running: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.running.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// Binds `surface`, builds a field for `size`, and requests the first
    /// frame.
    ///
    /// ### Parameters
    /// - `surface` - Drawing surface to bind. `None` leaves the scheduler
    ///   stopped and requests nothing.
    /// - `size` - Initial viewport size.
    ///
    /// Starting while already running stops the current run first.
    pub fn start(&mut self, surface: Option<S>, size: Vec2) {
        let Some(surface) = surface else {
            log::debug!("no drawing surface available, backdrop stays stopped");
            return;
        };
        if self.running.is_some() {
            self.stop();
        }

        let field = Field::new(size, &self.cfg, &mut self.rng);
        let pending = Some(self.host.request_frame());
        log::info!(
            "backdrop started: {}x{}, {:?} tier, {} particles",
            size.x,
            size.y,
            Tier::for_width(size.x, &self.cfg),
            field.len()
        );

        self.running = Some(Running {
            surface,
            field,
            pending,
            resize: None,
        });
    }

    /// Records a new viewport size; the field is rebuilt at the start of
    /// the next tick. Ignored while stopped.
    pub fn on_resize(&mut self, size: Vec2) {
        if let Some(run) = self.running.as_mut() {
            log::info!("viewport resized to {}x{}", size.x, size.y);
            run.resize = Some(size);
        }
    }

    /// Runs one tick for frame `id` at host time `now_ms`.
    ///
    /// A pending resize rebuilds the field first, then the tick runs
    /// [`simulator::step`], the proximity build, and [`renderer::render`],
    /// and finally requests the next frame.
    ///
    /// ### Parameters
    /// - `id` - Id of the request being delivered.
    /// - `now_ms` - Host timestamp in milliseconds.
    ///
    /// ### Returns
    /// - `Some(stats)` after a completed tick.
    /// - `None` without doing anything if stopped or if `id` is not the
    ///   outstanding request.
    pub fn on_frame(&mut self, id: FrameId, now_ms: f64) -> Option<FrameStats> {
        let run = self.running.as_mut()?;
        if run.pending != Some(id) {
            log::trace!("ignoring stale frame {:?}", id);
            return None;
        }
        run.pending = None;

        if let Some(size) = run.resize.take() {
            run.field = Field::new(size, &self.cfg, &mut self.rng);
        }

        simulator::step(&mut run.field, now_ms, &self.cfg);
        self.proximity
            .build(&run.field, &self.cfg, &mut self.connections);
        renderer::render(
            &mut run.surface,
            &run.field,
            &self.connections,
            &self.style,
        );

        let stats = FrameStats {
            particles: run.field.len(),
            connections: self.connections.len(),
        };
        log::trace!(
            "frame {:?}: {} particles, {} connections",
            id,
            stats.particles,
            stats.connections
        );
        self.connections.clear();

        run.pending = Some(self.host.request_frame());
        Some(stats)
    }

    /// Cancels the outstanding frame request and drops the field and
    /// surface. Safe to call while already stopped.
    pub fn stop(&mut self) {
        let Some(run) = self.running.take() else {
            return;
        };
        if let Some(id) = run.pending {
            self.host.cancel_frame(id);
        }
        log::info!("backdrop stopped");
    }

    pub fn field(&self) -> Option<&Field> {
        self.running.as_ref().map(|r| &r.field)
    }

    pub fn surface(&self) -> Option<&S> {
        self.running.as_ref().map(|r| &r.surface)
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.running.as_mut().map(|r| &mut r.surface)
    }

    /// The outstanding frame request, if any.
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.running.as_ref().and_then(|r| r.pending)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &FieldConfig {
        &self.cfg
    }
}
