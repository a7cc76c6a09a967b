//! Sensor configuration

use crate::debug::DebugColor;
use crate::entity::{CategoryFilter, LayerMask};
use crate::error::{PerceptionError, Result};
use serde::{Deserialize, Serialize};

/// Largest half-angle a sensor can cover (full circle)
pub const FULL_CIRCLE_HALF_ANGLE: f32 = 180.0;

/// Configuration of one sensor. Read-only while the sensor queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Category the first hit must carry
    pub category: CategoryFilter,
    /// Layers the world query may report
    pub layers: LayerMask,
    /// Ignore the querying entity
    pub exclude_self: bool,
    /// Maximum sensing distance
    pub max_distance: f32,
    /// Half-angle of the sensing cone in degrees (180 = full circle)
    pub max_half_angle: f32,
    /// Number of directions probed by fan-based sensors
    pub ray_count: usize,
    /// Emit debug lines for every probe
    pub debug: bool,
    /// Color of the sensor's fan gizmo
    pub debug_color: DebugColor,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            category: CategoryFilter::Any,
            layers: LayerMask::ALL,
            exclude_self: true,
            max_distance: 5.0,
            max_half_angle: FULL_CIRCLE_HALF_ANGLE,
            ray_count: 1,
            debug: false,
            debug_color: DebugColor::WHITE,
        }
    }
}

impl SensorConfig {
    /// Sensor with the given reach and fan
    pub fn new(max_distance: f32, max_half_angle: f32, ray_count: usize) -> Self {
        Self {
            max_distance,
            max_half_angle,
            ray_count,
            ..Default::default()
        }
    }

    /// Only report entities tagged with `tag` (empty = everything)
    pub fn with_category(mut self, tag: &str) -> Self {
        self.category = CategoryFilter::tag(tag);
        self
    }

    /// Restrict the world query to these layers
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Enable debug lines
    pub fn with_debug(mut self, color: DebugColor) -> Self {
        self.debug = true;
        self.debug_color = color;
        self
    }

    /// Strict check for hosts that want to reject bad configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.max_distance >= 0.0) {
            return Err(PerceptionError::InvalidSensorConfig(format!(
                "max_distance must be >= 0, got {}",
                self.max_distance
            )));
        }
        if !(0.0..=FULL_CIRCLE_HALF_ANGLE).contains(&self.max_half_angle) {
            return Err(PerceptionError::InvalidSensorConfig(format!(
                "max_half_angle must be within 0..=180, got {}",
                self.max_half_angle
            )));
        }
        Ok(())
    }

    /// Copy with every value clamped into its documented range
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();

        if !(config.max_distance >= 0.0) {
            log::warn!("Sensor max_distance {} clamped to 0", config.max_distance);
            config.max_distance = 0.0;
        }

        if config.max_half_angle.is_nan() {
            log::warn!("Sensor max_half_angle is NaN, using full circle");
            config.max_half_angle = FULL_CIRCLE_HALF_ANGLE;
        } else if !(0.0..=FULL_CIRCLE_HALF_ANGLE).contains(&config.max_half_angle) {
            let clamped = config.max_half_angle.clamp(0.0, FULL_CIRCLE_HALF_ANGLE);
            log::warn!("Sensor max_half_angle {} clamped to {}", config.max_half_angle, clamped);
            config.max_half_angle = clamped;
        }

        config
    }
}
