use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which [`crate::proximity::ProximityGraph`] implementation builds links.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityKind {
    /// Test every unordered pair.
    #[default]
    Pairwise,
    /// Bucket particles into a uniform grid of link-distance cells.
    Grid,
}

/// Tunable constants for field generation, motion, and linking.
///
/// Ranges are stored as `[min, max]` and sampled half-open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Viewports narrower than this use the narrow tier.
    pub narrow_breakpoint: f32,
    pub narrow_count: usize,
    pub wide_count: usize,

    /// Half-range of the initial velocity per axis.
    pub velocity: Vec2,
    pub size: [f32; 2],
    pub initial_opacity: [f32; 2],
    pub frequency: [f32; 2],

    /// Amplitude of the per-step sinusoidal displacement per axis.
    pub wobble: Vec2,
    /// Angular rate of the opacity pulse, per millisecond.
    pub pulse_rate: f32,
    pub pulse_amplitude: f32,
    pub pulse_floor: f32,

    /// Particles strictly closer than this are linked.
    pub link_distance: f32,
    /// Link opacity at zero distance.
    pub link_opacity: f32,
    /// Upper bound on links per frame; `None` is unbounded.
    pub max_connections: Option<usize>,
    pub proximity: ProximityKind,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            narrow_breakpoint: 768.0,
            narrow_count: 25,
            wide_count: 40,
            velocity: Vec2::new(0.15, 0.10),
            size: [3.0, 9.0],
            initial_opacity: [0.2, 0.6],
            frequency: [0.01, 0.03],
            wobble: Vec2::new(0.5, 0.3),
            pulse_rate: 0.002,
            pulse_amplitude: 0.2,
            pulse_floor: 0.1,
            link_distance: 150.0,
            link_opacity: 0.2,
            max_connections: None,
            proximity: ProximityKind::Pairwise,
        }
    }
}

impl FieldConfig {
    /// Checks that every range is ordered and every opacity stays in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("narrow_breakpoint", self.narrow_breakpoint)?;
        finite("velocity.x", self.velocity.x)?;
        finite("velocity.y", self.velocity.y)?;
        finite("wobble.x", self.wobble.x)?;
        finite("wobble.y", self.wobble.y)?;
        finite("pulse_rate", self.pulse_rate)?;

        range("size", self.size)?;
        positive("size.min", self.size[0])?;
        range("initial_opacity", self.initial_opacity)?;
        unit("initial_opacity.min", self.initial_opacity[0])?;
        unit("initial_opacity.max", self.initial_opacity[1])?;
        range("frequency", self.frequency)?;
        positive("frequency.min", self.frequency[0])?;

        finite("pulse_amplitude", self.pulse_amplitude)?;
        finite("pulse_floor", self.pulse_floor)?;
        if self.pulse_amplitude < 0.0
            || self.pulse_floor < 0.0
            || self.pulse_floor + 2.0 * self.pulse_amplitude > 1.0
        {
            return Err(ConfigError::PulseOutOfRange {
                floor: self.pulse_floor,
                amplitude: self.pulse_amplitude,
            });
        }

        positive("link_distance", self.link_distance)?;
        unit("link_opacity", self.link_opacity)?;
        Ok(())
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OpacityOutOfRange { name, value })
    }
}

fn range(name: &'static str, [min, max]: [f32; 2]) -> Result<(), ConfigError> {
    finite(name, min)?;
    finite(name, max)?;
    if min < max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { name, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(FieldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_size_range_is_rejected() {
        let cfg = FieldConfig {
            size: [9.0, 3.0],
            ..FieldConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvertedRange {
                name: "size",
                min: 9.0,
                max: 3.0
            })
        );
    }

    #[test]
    fn pulse_that_can_exceed_one_is_rejected() {
        let cfg = FieldConfig {
            pulse_floor: 0.5,
            pulse_amplitude: 0.3,
            ..FieldConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::PulseOutOfRange { .. })
        ));
    }

    #[test]
    fn non_positive_link_distance_is_rejected() {
        let cfg = FieldConfig {
            link_distance: 0.0,
            ..FieldConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                name: "link_distance",
                value: 0.0
            })
        );
    }

    #[test]
    fn nan_wobble_is_rejected() {
        let mut cfg = FieldConfig::default();
        cfg.wobble.y = f32::NAN;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonFinite { name: "wobble.y" })
        );
    }

    #[test]
    fn link_opacity_above_one_is_rejected() {
        let cfg = FieldConfig {
            link_opacity: 1.5,
            ..FieldConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OpacityOutOfRange {
                name: "link_opacity",
                ..
            })
        ));
    }
}
