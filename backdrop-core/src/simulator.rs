//! Per-frame particle motion.
//!
//! Every particle is advanced independently:
//! 1. constant drift plus a sinusoidal wobble keyed on its phase,
//! 2. an opacity pulse that ignores position,
//! 3. toroidal wraparound one particle-size beyond each edge.
//!
//! No particle reads another, so iteration order does not matter.

use glam::Vec2;

use crate::{config::FieldConfig, field::Field, particle::Particle};

/// Advances every particle in `field` by one step at time `t_ms`.
///
/// ### Parameters
/// - `field` - The field to mutate; its size bounds the wraparound.
/// - `t_ms` - Host wall-clock time in milliseconds. Oscillation phases
///   are evaluated in `f64` so long-running sessions keep their precision.
/// - `cfg` - Wobble amplitudes and pulse parameters.
pub fn step(field: &mut Field, t_ms: f64, cfg: &FieldConfig) {
    let bounds = field.size();
    for p in field.particles_mut() {
        step_particle(p, bounds, t_ms, cfg);
    }
}

/// Advances a single particle inside a viewport of `bounds`.
pub fn step_particle(p: &mut Particle, bounds: Vec2, t_ms: f64, cfg: &FieldConfig) {
    let wave = t_ms * f64::from(p.frequency()) + f64::from(p.phase());
    let wobble = Vec2::new(wave.sin() as f32, wave.cos() as f32) * cfg.wobble;
    let pos = p.pos() + p.vel() + wobble;

    p.set_opacity(pulse(t_ms, p.phase(), cfg));

    let size = p.size();
    p.set_pos(Vec2::new(wrap(pos.x, size, bounds.x), wrap(pos.y, size, bounds.y)));
}

/// Opacity of the breathing pulse at `t_ms` for a particle with `phase`.
pub fn pulse(t_ms: f64, phase: f32, cfg: &FieldConfig) -> f32 {
    let s = (t_ms * f64::from(cfg.pulse_rate) + f64::from(phase)).sin() as f32;
    ((s + 1.0) * cfg.pulse_amplitude + cfg.pulse_floor).clamp(0.0, 1.0)
}

/// Moves a coordinate that left `[-margin, extent + margin]` to the
/// opposite side, fully off-screen.
#[inline]
fn wrap(v: f32, margin: f32, extent: f32) -> f32 {
    if v < -margin {
        extent + margin
    } else if v > extent + margin {
        -margin
    } else {
        v
    }
}
