//! World bounds applied after integration

use crate::config::{SimulationConfig, WrapMode};
use swarm_math::{wrap_to_bounds, wrap_xz, Vec3};

/// Keeps integrated positions inside the playable area
pub trait WorldBounds: Send + Sync {
    fn wrap(&self, position: Vec3) -> Vec3;
}

/// No bounds at all
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl WorldBounds for Unbounded {
    #[inline]
    fn wrap(&self, position: Vec3) -> Vec3 {
        position
    }
}

/// Flat arena: X and Z wrap around, Y is clamped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapXZ {
    pub min: Vec3,
    pub max: Vec3,
}

impl WrapXZ {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

impl WorldBounds for WrapXZ {
    fn wrap(&self, position: Vec3) -> Vec3 {
        wrap_xz(position, self.min, self.max)
    }
}

/// Every axis wraps around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapAll {
    pub min: Vec3,
    pub max: Vec3,
}

impl WrapAll {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

impl WorldBounds for WrapAll {
    fn wrap(&self, position: Vec3) -> Vec3 {
        wrap_to_bounds(position, self.min, self.max)
    }
}

/// Bounds described by a simulation config
pub fn from_config(config: &SimulationConfig) -> Box<dyn WorldBounds> {
    match config.wrap {
        WrapMode::None => Box::new(Unbounded),
        WrapMode::XZ => Box::new(WrapXZ::new(config.world_min, config.world_max)),
        WrapMode::All => Box::new(WrapAll::new(config.world_min, config.world_max)),
    }
}
