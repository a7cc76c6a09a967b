//! Point-mass motion model
//!
//! Forces accumulate into acceleration during the compute phase and are
//! folded into velocity and position by [`Movement::integrate`].

use crate::config::MovementConfig;
use swarm_math::{clamp_magnitude, Quat, Vec3};

/// Below this squared speed the agent is considered stationary
pub const FACING_EPSILON_SQ: f32 = 1e-4;

/// Kinematic state of one agent
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    /// Sum of forces applied since the last integration
    pub acceleration: Vec3,
    pub max_speed: f32,
    pub max_force: f32,
    pub clamp_velocity: bool,
}

impl Movement {
    pub fn new(position: Vec3, rotation: Quat, config: &MovementConfig) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            max_speed: config.max_speed.max(0.0),
            max_force: config.max_force.max(0.0),
            clamp_velocity: config.clamp_velocity,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Accumulate a force; forces applied in the same tick sum linearly
    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    /// Advance by `dt` seconds. Non-finite or negative steps count as zero.
    pub fn integrate(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        self.velocity += self.acceleration * dt;
        self.acceleration = Vec3::ZERO;
        if self.clamp_velocity {
            self.velocity = clamp_magnitude(self.velocity, self.max_speed);
        }
        self.position += self.velocity * dt;

        if self.velocity.length_squared() > 0.0 {
            self.rotation = Quat::look_rotation(self.velocity, Vec3::UP);
        }
    }

    /// Forward axis of the current orientation
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.rotation.forward().normalize()
    }

    /// Heading of travel, or the orientation when (almost) stationary
    pub fn facing(&self) -> Vec3 {
        if self.velocity.length_squared() > FACING_EPSILON_SQ {
            self.velocity.normalize()
        } else {
            self.direction()
        }
    }
}
