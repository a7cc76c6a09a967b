//! Autonomous agent: senses, decides, steers
//!
//! The per-tick decision is the [`STEERING_PLAN`] table walked top to bottom.
//! An exclusive stage that fires ends the tick, additive stages all
//! contribute, and a fallback stage only runs when nothing above sensed
//! anything.

use crate::behaviors::{alignment, cohesion, separation, steering_force, WanderState};
use crate::config::AgentConfig;
use crate::movement::{Movement, FACING_EPSILON_SQ};
use core::fmt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swarm_math::{Quat, Vec3};
use swarm_perception::{Body, DebugColor, EntityId, Perception, QueryContext, SensorOrigin};

/// One step of the per-tick plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ObstacleAvoidance,
    Seek,
    Flee,
    Flock,
    Wander,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::ObstacleAvoidance,
        Stage::Seek,
        Stage::Flee,
        Stage::Flock,
        Stage::Wander,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ObstacleAvoidance => "obstacle",
            Stage::Seek => "seek",
            Stage::Flee => "flee",
            Stage::Flock => "flock",
            Stage::Wander => "wander",
        };
        f.write_str(name)
    }
}

/// How a firing stage combines with the rest of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Applies alone and stops the plan
    Exclusive,
    /// Adds to whatever else fires
    Additive,
    /// Runs only when no earlier stage sensed anything
    Fallback,
}

/// Per-tick decision table, in priority order
pub const STEERING_PLAN: [(Stage, Resolution); 5] = [
    (Stage::ObstacleAvoidance, Resolution::Exclusive),
    (Stage::Seek, Resolution::Additive),
    (Stage::Flee, Resolution::Additive),
    (Stage::Flock, Resolution::Additive),
    (Stage::Wander, Resolution::Fallback),
];

/// Set of stages
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StageSet(u8);

impl StageSet {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub fn insert(&mut self, stage: Stage) {
        self.0 |= stage.bit();
    }

    #[inline]
    pub fn contains(self, stage: Stage) -> bool {
        self.0 & stage.bit() != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Stage> {
        Stage::ALL.into_iter().filter(move |&stage| self.contains(stage))
    }
}

impl fmt::Debug for StageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Stage> for StageSet {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for stage in iter {
            set.insert(stage);
        }
        set
    }
}

/// What one [`AutonomousAgent::steer`] call decided
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringOutcome {
    /// Total force applied this tick
    pub force: Vec3,
    /// Stages that fired
    pub fired: StageSet,
    /// Some additive stage sensed at least one entity
    pub has_target: bool,
}

/// The agent's sensors; a missing one skips its stage
#[derive(Debug, Default)]
pub struct Sensors {
    pub obstacle: Option<Box<dyn Perception>>,
    pub seek: Option<Box<dyn Perception>>,
    pub flee: Option<Box<dyn Perception>>,
    pub flock: Option<Box<dyn Perception>>,
}

/// A steerable agent owning its motion, sensors and wander state
#[derive(Debug)]
pub struct AutonomousAgent {
    id: EntityId,
    movement: Movement,
    config: AgentConfig,
    sensors: Sensors,
    wander: WanderState,
    rng: ChaCha8Rng,
}

impl AutonomousAgent {
    /// Build an agent at the given pose. `seed` is used unless the
    /// configuration carries its own.
    pub fn new(id: EntityId, position: Vec3, rotation: Quat, config: AgentConfig, seed: u64) -> Self {
        let config = config.sanitized();
        let spec = &config.sensors;
        let sensors = Sensors {
            obstacle: spec.obstacle.as_ref().map(|s| s.build()),
            seek: spec.seek.as_ref().map(|s| s.build()),
            flee: spec.flee.as_ref().map(|s| s.build()),
            flock: spec.flock.as_ref().map(|s| s.build()),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(seed));
        let wander = WanderState::random(&mut rng);

        Self {
            id,
            movement: Movement::new(position, rotation, &config.movement),
            config,
            sensors,
            wander,
            rng,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut Movement {
        &mut self.movement
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn sensors(&self) -> &Sensors {
        &self.sensors
    }

    /// Replace a stage's sensor; `None` disables the stage.
    /// Wander has no sensor and is left untouched.
    pub fn set_sensor(&mut self, stage: Stage, sensor: Option<Box<dyn Perception>>) {
        match stage {
            Stage::ObstacleAvoidance => self.sensors.obstacle = sensor,
            Stage::Seek => self.sensors.seek = sensor,
            Stage::Flee => self.sensors.flee = sensor,
            Stage::Flock => self.sensors.flock = sensor,
            Stage::Wander => {}
        }
    }

    pub fn wander_state(&self) -> WanderState {
        self.wander
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.movement.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.movement.velocity
    }

    pub fn sensor_origin(&self) -> SensorOrigin {
        SensorOrigin::new(self.id, self.movement.position, self.movement.rotation)
    }

    /// How the agent shows up in a world snapshot
    pub fn body(&self) -> Body {
        let body = &self.config.body;
        Body::sphere(self.id, body.category.clone(), self.movement.position, body.radius)
            .with_layers(body.layers)
            .with_velocity(self.movement.velocity)
    }

    /// Compute phase: walk the plan and accumulate this tick's force
    pub fn steer(&mut self, ctx: &QueryContext<'_>) -> SteeringOutcome {
        let origin = self.sensor_origin();
        let mut outcome = SteeringOutcome::default();

        for (stage, resolution) in STEERING_PLAN {
            if resolution == Resolution::Fallback && (outcome.has_target || !outcome.fired.is_empty()) {
                continue;
            }

            let Some(force) = self.evaluate(stage, &origin, ctx, &mut outcome) else {
                continue;
            };

            self.movement.apply_force(force);
            outcome.force += force;
            outcome.fired.insert(stage);

            if resolution == Resolution::Exclusive {
                break;
            }
        }

        log::trace!("{} steered {:?} -> {:?}", self.id, outcome.fired, outcome.force);
        outcome
    }

    /// Force of one stage, or `None` when the stage does not fire
    fn evaluate(
        &mut self,
        stage: Stage,
        origin: &SensorOrigin,
        ctx: &QueryContext<'_>,
        outcome: &mut SteeringOutcome,
    ) -> Option<Vec3> {
        let movement = &self.movement;
        match stage {
            Stage::ObstacleAvoidance => {
                let sensor = self.sensors.obstacle.as_deref()?;
                let facing = movement.facing();
                sensor.query_direction(origin, ctx, facing)?;

                match sensor.find_open_direction(origin, ctx) {
                    Some(open) if open.length_squared() > FACING_EPSILON_SQ => {
                        Some(steering_force(movement, open) * self.config.obstacle_weight)
                    }
                    _ => {
                        log::trace!("{} is boxed in, falling through", self.id);
                        None
                    }
                }
            }
            Stage::Seek => {
                let targets = self.sensors.seek.as_deref()?.query(origin, ctx);
                if self.config.debug {
                    for target in &targets {
                        ctx.debug.line(movement.position, target.position, DebugColor::KHAKI);
                    }
                }
                let target = targets.first()?;
                outcome.has_target = true;
                Some(steering_force(movement, target.position - movement.position))
            }
            Stage::Flee => {
                let threat = self.sensors.flee.as_deref()?.query(origin, ctx).into_iter().next()?;
                outcome.has_target = true;
                Some(steering_force(movement, movement.position - threat.position))
            }
            Stage::Flock => {
                let neighbors = self.sensors.flock.as_deref()?.query(origin, ctx);
                if neighbors.is_empty() {
                    return None;
                }
                outcome.has_target = true;
                let weights = &self.config.flock_weights;
                Some(
                    cohesion(movement, &neighbors) * weights.cohesion
                        + separation(movement, &neighbors, self.config.separation_radius) * weights.separation
                        + alignment(movement, &neighbors, ctx) * weights.alignment,
                )
            }
            Stage::Wander => {
                let forward = movement.direction();
                let target = self.wander.next_target(&mut self.rng, forward, &self.config.wander);
                if self.config.debug {
                    let center = movement.position + forward * self.config.wander.distance;
                    ctx.debug.line(movement.position, center, DebugColor::BLUE);
                    ctx.debug.line(center, movement.position + target, DebugColor::RED);
                }
                Some(steering_force(movement, target))
            }
        }
    }

    /// Integrate phase
    pub fn integrate(&mut self, dt: f32) {
        self.movement.integrate(dt);
    }
}
