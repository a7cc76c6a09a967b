//! Sensor abstraction
//!
//! A [`Perception`] turns world queries into an ordered list of perceived
//! entities. Behaviors only see this trait, so the sensing backend (ray fan,
//! spatial hash, trigger volumes) can change without touching them.

use crate::config::SensorConfig;
use crate::query::{PerceivedEntity, QueryContext, SensorOrigin};
use core::fmt;
use swarm_math::Vec3;

/// Directional sensor contract
pub trait Perception: Send + Sync + fmt::Debug {
    /// Configuration the sensor was built with
    fn config(&self) -> &SensorConfig;

    /// Every matching entity, in priority order (first = most relevant)
    fn query(&self, origin: &SensorOrigin, ctx: &QueryContext<'_>) -> Vec<PerceivedEntity>;

    /// Single probe along a world-space direction
    fn query_direction(
        &self,
        _origin: &SensorOrigin,
        _ctx: &QueryContext<'_>,
        _direction: Vec3,
    ) -> Option<PerceivedEntity> {
        None
    }

    /// First world-space direction of the sensor's fan with nothing in it.
    /// `None` when every direction is blocked or the sensor has no fan.
    fn find_open_direction(&self, _origin: &SensorOrigin, _ctx: &QueryContext<'_>) -> Option<Vec3> {
        None
    }
}

/// Draw the fan of a sensor (the gizmo view of its configuration)
pub fn draw_fan(directions: &[Vec3], origin: &SensorOrigin, config: &SensorConfig, ctx: &QueryContext<'_>) {
    for &local in directions {
        let world = origin.rotation * local;
        ctx.debug.ray(origin.position, world * config.max_distance, config.debug_color);
    }
}
