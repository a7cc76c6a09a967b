//! Agent and simulation configuration
//!
//! Plain serde structs read once at construction. Defaults mirror the
//! behavior a freshly added agent component has: unit speed and force,
//! unit wander circle, unit weights, one forward ray of reach 5.

use crate::error::{Result, SteeringError};
use serde::{Deserialize, Serialize};
use swarm_math::Vec3;
use swarm_perception::{
    Category, LayerMask, Perception, ProximityPerception, RaycastPerception, SensorConfig,
};

/// Upper bound of every behavior weight
pub const MAX_WEIGHT: f32 = 5.0;

fn clamp_weight(name: &str, value: f32) -> f32 {
    if value.is_nan() {
        log::warn!("{name} weight is NaN, using 0");
        return 0.0;
    }
    let clamped = value.clamp(0.0, MAX_WEIGHT);
    if clamped != value {
        log::warn!("{name} weight {value} clamped to {clamped}");
    }
    clamped
}

fn non_negative(name: &str, value: f32) -> f32 {
    if value >= 0.0 && value.is_finite() {
        value
    } else {
        log::warn!("{name} {value} clamped to 0");
        0.0
    }
}

/// Limits of the motion model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Magnitude of every desired velocity
    pub max_speed: f32,
    /// Largest steering force applied in one go
    pub max_force: f32,
    /// Also cap the integrated velocity at `max_speed`
    pub clamp_velocity: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_speed: 1.0,
            max_force: 1.0,
            clamp_velocity: false,
        }
    }
}

/// Weights of the flocking sub-behaviors, each in `0..=5`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockWeights {
    pub cohesion: f32,
    pub separation: f32,
    pub alignment: f32,
}

impl Default for FlockWeights {
    fn default() -> Self {
        Self {
            cohesion: 1.0,
            separation: 1.0,
            alignment: 1.0,
        }
    }
}

/// Wander circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    /// Radius of the circle the target point walks on
    pub radius: f32,
    /// How far ahead the circle is projected
    pub distance: f32,
    /// Largest change of the wander angle per tick, in degrees
    pub displacement: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            distance: 1.0,
            displacement: 1.0,
        }
    }
}

/// Which perception strategy backs a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SensorKind {
    /// One ray per fan direction
    #[default]
    RayFan,
    /// Sphere overlap filtered by the sensing cone
    Proximity,
}

/// A sensor to build for an agent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSpec {
    pub kind: SensorKind,
    pub config: SensorConfig,
}

impl SensorSpec {
    pub fn ray_fan(config: SensorConfig) -> Self {
        Self {
            kind: SensorKind::RayFan,
            config,
        }
    }

    pub fn proximity(config: SensorConfig) -> Self {
        Self {
            kind: SensorKind::Proximity,
            config,
        }
    }

    /// Instantiate the sensor
    pub fn build(&self) -> Box<dyn Perception> {
        match self.kind {
            SensorKind::RayFan => Box::new(RaycastPerception::new(self.config.clone())),
            SensorKind::Proximity => Box::new(ProximityPerception::new(self.config.clone())),
        }
    }
}

/// The optional sensors of an agent; a missing sensor skips its behavior
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSet {
    pub obstacle: Option<SensorSpec>,
    pub seek: Option<SensorSpec>,
    pub flee: Option<SensorSpec>,
    pub flock: Option<SensorSpec>,
}

/// How the agent appears to other agents' sensors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub radius: f32,
    pub category: Category,
    pub layers: LayerMask,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            category: Category::from("boid"),
            layers: LayerMask::ALL,
        }
    }
}

/// Everything an agent is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub movement: MovementConfig,
    pub flock_weights: FlockWeights,
    /// Scale of the obstacle-avoidance force, in `0..=5`
    pub obstacle_weight: f32,
    pub wander: WanderConfig,
    /// Neighbors closer than this push the agent away
    pub separation_radius: f32,
    pub body: BodyConfig,
    pub sensors: SensorSet,
    /// Wander RNG seed; the simulation derives one when unset
    pub seed: Option<u64>,
    /// Draw seek and wander targets through the debug collaborator
    pub debug: bool,
}

impl AgentConfig {
    pub fn with_movement(mut self, max_speed: f32, max_force: f32) -> Self {
        self.movement.max_speed = max_speed;
        self.movement.max_force = max_force;
        self
    }

    pub fn with_obstacle_sensor(mut self, spec: SensorSpec) -> Self {
        self.sensors.obstacle = Some(spec);
        self
    }

    pub fn with_seek_sensor(mut self, spec: SensorSpec) -> Self {
        self.sensors.seek = Some(spec);
        self
    }

    pub fn with_flee_sensor(mut self, spec: SensorSpec) -> Self {
        self.sensors.flee = Some(spec);
        self
    }

    pub fn with_flock_sensor(mut self, spec: SensorSpec) -> Self {
        self.sensors.flock = Some(spec);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Strict check for hosts that reject bad configuration up front
    pub fn validate(&self) -> Result<()> {
        let movement = &self.movement;
        for (name, value) in [
            ("max_speed", movement.max_speed),
            ("max_force", movement.max_force),
            ("separation_radius", self.separation_radius),
            ("wander.radius", self.wander.radius),
            ("wander.distance", self.wander.distance),
            ("wander.displacement", self.wander.displacement),
            ("body.radius", self.body.radius),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SteeringError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("cohesion", self.flock_weights.cohesion),
            ("separation", self.flock_weights.separation),
            ("alignment", self.flock_weights.alignment),
            ("obstacle", self.obstacle_weight),
        ] {
            if !(0.0..=MAX_WEIGHT).contains(&value) {
                return Err(SteeringError::InvalidConfig(format!(
                    "{name} weight must be within 0..=5, got {value}"
                )));
            }
        }

        let sensors = &self.sensors;
        for spec in [&sensors.obstacle, &sensors.seek, &sensors.flee, &sensors.flock]
            .into_iter()
            .flatten()
        {
            spec.config.validate()?;
        }
        Ok(())
    }

    /// Copy with every value clamped into range
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        config.movement.max_speed = non_negative("max_speed", config.movement.max_speed);
        config.movement.max_force = non_negative("max_force", config.movement.max_force);
        config.separation_radius = non_negative("separation_radius", config.separation_radius);
        config.wander.radius = non_negative("wander.radius", config.wander.radius);
        config.wander.distance = non_negative("wander.distance", config.wander.distance);
        config.wander.displacement = non_negative("wander.displacement", config.wander.displacement);
        config.body.radius = non_negative("body.radius", config.body.radius);

        config.flock_weights.cohesion = clamp_weight("cohesion", config.flock_weights.cohesion);
        config.flock_weights.separation = clamp_weight("separation", config.flock_weights.separation);
        config.flock_weights.alignment = clamp_weight("alignment", config.flock_weights.alignment);
        config.obstacle_weight = clamp_weight("obstacle", config.obstacle_weight);
        config
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            flock_weights: FlockWeights::default(),
            obstacle_weight: 1.0,
            wander: WanderConfig::default(),
            separation_radius: 1.0,
            body: BodyConfig::default(),
            sensors: SensorSet::default(),
            seed: None,
            debug: false,
        }
    }
}

/// Which axes the world wraps around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapMode {
    /// Unbounded world
    #[default]
    None,
    /// Wrap X and Z, clamp Y (flat arena)
    XZ,
    /// Wrap every axis
    All,
}

/// Settings of the simulation arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Cell size of the snapshot's spatial hash
    pub cell_size: f32,
    pub wrap: WrapMode,
    pub world_min: Vec3,
    pub world_max: Vec3,
    /// Run the compute phase on the rayon pool
    pub parallel: bool,
    /// Base seed for agents without their own
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cell_size: swarm_perception::DEFAULT_CELL_SIZE,
            wrap: WrapMode::None,
            world_min: Vec3::splat(-50.0),
            world_max: Vec3::splat(50.0),
            parallel: true,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size > 0.0 && self.cell_size.is_finite()) {
            return Err(SteeringError::InvalidConfig(format!(
                "cell_size must be finite and > 0, got {}",
                self.cell_size
            )));
        }
        if self.wrap != WrapMode::None
            && !(self.world_min.x < self.world_max.x
                && self.world_min.y <= self.world_max.y
                && self.world_min.z < self.world_max.z)
        {
            return Err(SteeringError::InvalidConfig(format!(
                "world bounds are empty: {:?}..{:?}",
                self.world_min, self.world_max
            )));
        }
        Ok(())
    }
}
