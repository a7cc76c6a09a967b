//! # swarm_steering - Autonomous Steering Agents
//!
//! Agents sense through `swarm_perception` sensors, blend steering behaviors
//! by an explicit priority plan, and integrate the result.
//!
//! # Features
//!
//! - Reynolds steering force with a per-agent force budget
//! - Seek, flee, cohesion, separation, alignment, wander
//! - Obstacle avoidance that pre-empts every other behavior
//! - Two-phase `Simulation` tick over a world snapshot, parallel via rayon
//! - Deterministic wander from per-agent seeded RNGs
//!
//! # Example
//!
//! ```ignore
//! use swarm_steering::prelude::*;
//!
//! let mut sim = Simulation::new(SimulationConfig::default())?;
//! sim.add_obstacle(Obstacle::sphere("rock", Vec3::new(0.0, 0.0, 4.0), 1.0));
//!
//! let config = AgentConfig::default()
//!     .with_obstacle_sensor(SensorSpec::ray_fan(SensorConfig::new(3.0, 90.0, 7).with_category("rock")));
//! let boid = sim.spawn_agent(Vec3::ZERO, Quat::IDENTITY, config);
//!
//! let report = sim.tick(1.0 / 60.0);
//! ```

pub mod agent;
pub mod behaviors;
pub mod bounds;
pub mod config;
pub mod error;
pub mod movement;
pub mod simulation;

pub use agent::{AutonomousAgent, Resolution, Sensors, Stage, StageSet, SteeringOutcome, STEERING_PLAN};
pub use behaviors::{alignment, cohesion, flee, seek, separation, steering_force, wander, WanderState};
pub use bounds::{Unbounded, WorldBounds, WrapAll, WrapXZ};
pub use config::{
    AgentConfig, BodyConfig, FlockWeights, MovementConfig, SensorKind, SensorSet, SensorSpec,
    SimulationConfig, WanderConfig, WrapMode, MAX_WEIGHT,
};
pub use error::{Result, SteeringError};
pub use movement::Movement;
pub use simulation::{Obstacle, Simulation, TickReport};

pub mod prelude {
    pub use crate::agent::{AutonomousAgent, Stage, SteeringOutcome};
    pub use crate::bounds::{WorldBounds, WrapAll, WrapXZ};
    pub use crate::config::{AgentConfig, SensorSpec, SimulationConfig, WrapMode};
    pub use crate::error::SteeringError;
    pub use crate::movement::Movement;
    pub use crate::simulation::{Obstacle, Simulation, TickReport};
    pub use swarm_perception::prelude::*;
}
