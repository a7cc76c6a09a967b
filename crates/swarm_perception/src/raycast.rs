//! Ray-fan sensor
//!
//! Casts one ray per fan direction and reports the first matching hit of
//! each. Results stay in fan order: direction 0 is forward, then directions
//! by increasing angle, so "first result" means "closest to facing".

use crate::config::SensorConfig;
use crate::debug::DebugColor;
use crate::perception::{draw_fan, Perception};
use crate::query::{PerceivedEntity, QueryContext, RaycastOptions, SensorOrigin};
use swarm_math::{directions_in_fan, Ray, Vec3};

/// Sensor that probes a fan of rays
#[derive(Debug, Clone)]
pub struct RaycastPerception {
    config: SensorConfig,
    /// Fan in the sensor's local frame, computed once
    directions: Vec<Vec3>,
}

impl RaycastPerception {
    /// Create a ray-fan sensor; the configuration is clamped into range
    pub fn new(config: SensorConfig) -> Self {
        let config = config.sanitized();
        let directions = directions_in_fan(config.ray_count, config.max_half_angle);
        Self { config, directions }
    }

    /// Local-frame fan directions
    pub fn local_directions(&self) -> &[Vec3] {
        &self.directions
    }

    /// Fan rotated into world space for `origin`
    pub fn world_directions<'a>(&'a self, origin: &'a SensorOrigin) -> impl Iterator<Item = Vec3> + 'a {
        self.directions.iter().map(move |&dir| origin.rotation * dir)
    }

    /// Draw the configured fan
    pub fn draw_gizmo(&self, origin: &SensorOrigin, ctx: &QueryContext<'_>) {
        draw_fan(&self.directions, origin, &self.config, ctx);
    }
}

impl Perception for RaycastPerception {
    fn config(&self) -> &SensorConfig {
        &self.config
    }

    fn query(&self, origin: &SensorOrigin, ctx: &QueryContext<'_>) -> Vec<PerceivedEntity> {
        self.world_directions(origin)
            .filter_map(|dir| self.query_direction(origin, ctx, dir))
            .collect()
    }

    fn query_direction(
        &self,
        origin: &SensorOrigin,
        ctx: &QueryContext<'_>,
        direction: Vec3,
    ) -> Option<PerceivedEntity> {
        let config = &self.config;
        if config.max_distance <= 0.0 {
            return None;
        }

        let ray = Ray::new(origin.position, direction);
        if !ray.is_valid() {
            return None;
        }

        let mut options = RaycastOptions::default()
            .with_max_distance(config.max_distance)
            .with_layers(config.layers);
        if config.exclude_self {
            options = options.exclude(origin.entity);
        }

        let Some(hit) = ctx.world.cast_ray(&ray, &options) else {
            if config.debug {
                ctx.debug.ray(ray.origin, ray.direction * config.max_distance, DebugColor::GREEN);
            }
            return None;
        };

        // a self hit counts as a miss even if the world forgot to exclude it
        if config.exclude_self && hit.entity == origin.entity {
            return None;
        }
        if !config.category.matches(&hit.category) {
            return None;
        }

        if config.debug {
            ctx.debug.ray(ray.origin, ray.direction * hit.distance, DebugColor::RED);
        }
        Some(hit.into_perceived())
    }

    fn find_open_direction(&self, origin: &SensorOrigin, ctx: &QueryContext<'_>) -> Option<Vec3> {
        self.world_directions(origin)
            .find(|&dir| self.query_direction(origin, ctx, dir).is_none())
    }
}
