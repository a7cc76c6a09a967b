//! Steering behaviors
//!
//! Every behavior reduces to [`steering_force`]: pick a direction, ask for
//! full speed along it, and return the velocity change capped at the force
//! budget. Behaviors never touch the agent; the caller applies the result.

use crate::config::WanderConfig;
use crate::movement::Movement;
use rand::Rng;
use swarm_math::{clamp_magnitude, Quat, Vec3};
use swarm_perception::{PerceivedEntity, QueryContext};

/// Reynolds steering: `clamp(max_speed * normalize(direction) - velocity, max_force)`
///
/// A zero `direction` asks to stop, so the result brakes against the
/// current velocity.
pub fn steering_force(movement: &Movement, direction: Vec3) -> Vec3 {
    let desired = direction.normalize() * movement.max_speed;
    clamp_magnitude(desired - movement.velocity, movement.max_force)
}

/// Steer toward `target`
pub fn seek(movement: &Movement, target: Vec3) -> Vec3 {
    steering_force(movement, target - movement.position)
}

/// Steer away from `threat`
pub fn flee(movement: &Movement, threat: Vec3) -> Vec3 {
    steering_force(movement, movement.position - threat)
}

/// Steer toward the centroid of the neighbors
pub fn cohesion(movement: &Movement, neighbors: &[PerceivedEntity]) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }
    let centroid = neighbors.iter().map(|n| n.position).sum::<Vec3>() / neighbors.len() as f32;
    steering_force(movement, centroid - movement.position)
}

/// Steer away from neighbors closer than `radius`, the closer the stronger
pub fn separation(movement: &Movement, neighbors: &[PerceivedEntity], radius: f32) -> Vec3 {
    let mut push = Vec3::ZERO;
    for neighbor in neighbors {
        let away = movement.position - neighbor.position;
        let distance = away.length();
        if distance > 0.0 && distance < radius {
            push += away / distance;
        }
    }

    if push.length_squared() == 0.0 {
        Vec3::ZERO
    } else {
        steering_force(movement, push)
    }
}

/// Steer toward the average velocity of steerable neighbors
///
/// Neighbors the world reports no velocity for are skipped.
pub fn alignment(movement: &Movement, neighbors: &[PerceivedEntity], ctx: &QueryContext<'_>) -> Vec3 {
    let mut total = Vec3::ZERO;
    let mut count = 0usize;
    for velocity in neighbors.iter().filter_map(|n| ctx.world.velocity_of(n.entity)) {
        total += velocity;
        count += 1;
    }

    if count == 0 {
        return Vec3::ZERO;
    }
    steering_force(movement, total / count as f32)
}

/// Persistent random-walk heading of one agent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WanderState {
    /// Angle on the wander circle, in degrees
    pub angle: f32,
}

impl WanderState {
    /// Start at a random point of the circle
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            angle: rng.gen_range(0.0f32..360.0),
        }
    }

    /// Advance the walk and return the point the agent should head for,
    /// relative to its position
    pub fn next_target<R: Rng + ?Sized>(&mut self, rng: &mut R, forward: Vec3, config: &WanderConfig) -> Vec3 {
        let displacement = config.displacement.max(0.0);
        if displacement > 0.0 {
            // sample on the unit range so huge displacements cannot overflow the range width
            self.angle += rng.gen_range(-1.0f32..=1.0) * displacement;
        }
        // keep the angle bounded so precision does not degrade over long runs
        self.angle = self.angle.rem_euclid(360.0);
        if self.angle >= 360.0 {
            self.angle = 0.0;
        }

        let on_circle = Quat::from_rotation_y(self.angle.to_radians()) * (Vec3::FORWARD * config.radius);
        let center = forward * config.distance;
        center + on_circle
    }
}

/// Fallback behavior: steer toward a point walking around a circle ahead
pub fn wander<R: Rng + ?Sized>(
    movement: &Movement,
    state: &mut WanderState,
    rng: &mut R,
    config: &WanderConfig,
) -> Vec3 {
    let target = state.next_target(rng, movement.direction(), config);
    steering_force(movement, target)
}
