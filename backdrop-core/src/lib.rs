//! Core simulation library for the ambient particle backdrop.
//!
//! Main components:
//! - [`particle`] — a single drifting visual element.
//! - [`field`] — the fixed-size particle collection for one viewport.
//! - [`simulator`] — per-frame drift, wobble, pulse, and wraparound.
//! - [`proximity`] — transient links between nearby particles.
//! - [`surface`] — the 2-D drawing surface the host provides.
//! - [`renderer`] — paints links and particles onto a [`surface::Surface`].
//! - [`scheduler`] — frame loop and start/resize/stop lifecycle.
//! - [`config`] — tunable constants for field generation and linking.
//! - [`error`] — configuration errors.
//! - [`types`] — shared type aliases and IDs.

pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod proximity;
pub mod renderer;
pub mod scheduler;
pub mod simulator;
pub mod surface;
pub mod types;

pub use config::{FieldConfig, ProximityKind};
pub use error::ConfigError;
pub use field::{Field, Tier};
pub use particle::{Particle, ParticleKind};
pub use proximity::{Connection, ProximityGraph};
pub use renderer::Style;
pub use scheduler::{FrameHost, FrameId, FrameStats, Scheduler, SchedulerState};
pub use surface::Surface;
