//! Proximity sensor backed by the world's spatial hash
//!
//! Instead of casting rays it asks the world for every body within reach and
//! keeps those inside the sensing cone. Occlusion is ignored.

use crate::config::{SensorConfig, FULL_CIRCLE_HALF_ANGLE};
use crate::debug::DebugColor;
use crate::perception::{draw_fan, Perception};
use crate::query::{PerceivedEntity, QueryContext, SensorOrigin};
use std::cmp::Ordering;
use swarm_math::{angle_between, degrees, directions_in_fan, Vec3};

/// Default angular tolerance (degrees) of a directional probe
pub const DEFAULT_DIRECTION_TOLERANCE: f32 = 15.0;

/// Sensor that reports everything within reach, nearest bearing first
#[derive(Debug, Clone)]
pub struct ProximityPerception {
    config: SensorConfig,
    directions: Vec<Vec3>,
    direction_tolerance: f32,
}

impl ProximityPerception {
    pub fn new(config: SensorConfig) -> Self {
        let config = config.sanitized();
        let directions = directions_in_fan(config.ray_count, config.max_half_angle);
        Self {
            config,
            directions,
            direction_tolerance: DEFAULT_DIRECTION_TOLERANCE,
        }
    }

    /// Angular tolerance used by [`Perception::query_direction`], in degrees
    pub fn with_direction_tolerance(mut self, tolerance: f32) -> Self {
        self.direction_tolerance = if tolerance.is_nan() {
            DEFAULT_DIRECTION_TOLERANCE
        } else {
            tolerance.clamp(0.0, FULL_CIRCLE_HALF_ANGLE)
        };
        self
    }

    pub fn direction_tolerance(&self) -> f32 {
        self.direction_tolerance
    }

    pub fn draw_gizmo(&self, origin: &SensorOrigin, ctx: &QueryContext<'_>) {
        draw_fan(&self.directions, origin, &self.config, ctx);
    }

    /// Everything in reach that passes the self and category filters,
    /// paired with its bearing (degrees) from `reference`
    fn candidates(&self, origin: &SensorOrigin, ctx: &QueryContext<'_>, reference: Vec3) -> Vec<(f32, PerceivedEntity)> {
        let config = &self.config;
        if config.max_distance <= 0.0 {
            return Vec::new();
        }

        ctx.world
            .overlap_sphere(origin.position, config.max_distance, config.layers)
            .into_iter()
            .filter(|p| !(config.exclude_self && p.entity == origin.entity))
            .filter(|p| config.category.matches(&p.category))
            .map(|mut p| {
                let offset = p.position - origin.position;
                p.distance = offset.length();
                (degrees(angle_between(reference, offset)), p)
            })
            .collect()
    }
}

fn by_bearing_then_distance(a: &(f32, PerceivedEntity), b: &(f32, PerceivedEntity)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.distance.total_cmp(&b.1.distance))
}

impl Perception for ProximityPerception {
    fn config(&self) -> &SensorConfig {
        &self.config
    }

    fn query(&self, origin: &SensorOrigin, ctx: &QueryContext<'_>) -> Vec<PerceivedEntity> {
        // an empty fan senses nothing, same as the ray sensor
        if self.directions.is_empty() {
            return Vec::new();
        }

        let half_angle = self.config.max_half_angle;
        let mut seen: Vec<_> = self
            .candidates(origin, ctx, origin.forward())
            .into_iter()
            .filter(|(bearing, _)| half_angle >= FULL_CIRCLE_HALF_ANGLE || *bearing <= half_angle + 1e-3)
            .collect();
        seen.sort_by(by_bearing_then_distance);

        if self.config.debug {
            for (_, p) in &seen {
                ctx.debug.line(origin.position, p.position, DebugColor::RED);
            }
        }

        seen.into_iter().map(|(_, p)| p).collect()
    }

    fn query_direction(
        &self,
        origin: &SensorOrigin,
        ctx: &QueryContext<'_>,
        direction: Vec3,
    ) -> Option<PerceivedEntity> {
        if direction.length_squared() == 0.0 || !direction.is_finite() {
            return None;
        }

        let tolerance = self.direction_tolerance;
        let nearest = self
            .candidates(origin, ctx, direction)
            .into_iter()
            .filter(|(bearing, _)| *bearing <= tolerance)
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance).then(a.1.entity.cmp(&b.1.entity)))
            .map(|(_, p)| p);

        if self.config.debug {
            let color = if nearest.is_some() { DebugColor::RED } else { DebugColor::GREEN };
            ctx.debug.ray(origin.position, direction.normalize() * self.config.max_distance, color);
        }
        nearest
    }

    fn find_open_direction(&self, origin: &SensorOrigin, ctx: &QueryContext<'_>) -> Option<Vec3> {
        self.directions
            .iter()
            .map(|&local| origin.rotation * local)
            .find(|&dir| self.query_direction(origin, ctx, dir).is_none())
    }
}
