//! Simulation arena and the two-phase tick
//!
//! ```text
//!  committed state ──snapshot──► SpatialWorld (read-only)
//!                                    │
//!        compute: every agent steers │ (rayon, no writes to shared state)
//!                                    ▼
//!        integrate: every agent moves, bounds wrap positions
//! ```
//!
//! No agent ever reads another agent's in-progress state: all queries go to
//! the snapshot taken before the compute phase.

use crate::agent::{AutonomousAgent, Stage, SteeringOutcome};
use crate::bounds::{self, WorldBounds};
use crate::config::{AgentConfig, SimulationConfig};
use crate::error::{Result, SteeringError};
use rayon::prelude::*;
use std::collections::HashMap;
use swarm_math::{Quat, Vec3};
use swarm_perception::{
    Body, BodyShape, Category, DebugDraw, EntityAllocator, EntityId, LayerMask, NullDebugDraw,
    QueryContext, SpatialWorld,
};

/// A static body agents can sense and avoid
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub category: Category,
    pub layers: LayerMask,
    pub shape: BodyShape,
    pub position: Vec3,
}

impl Obstacle {
    pub fn sphere(category: impl Into<Category>, position: Vec3, radius: f32) -> Self {
        Self {
            category: category.into(),
            layers: LayerMask::ALL,
            shape: BodyShape::Sphere { radius: radius.max(0.0) },
            position,
        }
    }

    /// Axis-aligned box
    pub fn cuboid(category: impl Into<Category>, position: Vec3, half_extents: Vec3) -> Self {
        Self {
            category: category.into(),
            layers: LayerMask::ALL,
            shape: BodyShape::Box {
                half_extents: half_extents.abs(),
            },
            position,
        }
    }

    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    fn body(&self, entity: EntityId) -> Body {
        Body {
            entity,
            category: self.category.clone(),
            layers: self.layers,
            shape: self.shape,
            position: self.position,
            velocity: None,
        }
    }
}

/// Summary of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Frame number after the tick
    pub frame: u64,
    /// Agents that stepped
    pub agents: usize,
    /// Agents that sensed a seek, flee or flock target
    pub with_target: usize,
    fired: [usize; 5],
}

impl TickReport {
    fn from_outcomes(frame: u64, outcomes: &[SteeringOutcome]) -> Self {
        let mut report = Self {
            frame,
            agents: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            if outcome.has_target {
                report.with_target += 1;
            }
            for stage in outcome.fired.iter() {
                report.fired[stage as usize] += 1;
            }
        }
        report
    }

    /// Number of agents in which `stage` fired
    pub fn count(&self, stage: Stage) -> usize {
        self.fired[stage as usize]
    }
}

/// Owns agents and obstacles and steps them
pub struct Simulation {
    config: SimulationConfig,
    allocator: EntityAllocator,
    agents: Vec<AutonomousAgent>,
    agent_slots: HashMap<EntityId, usize>,
    obstacles: Vec<(EntityId, Obstacle)>,
    bounds: Box<dyn WorldBounds>,
    frame: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let bounds = bounds::from_config(&config);
        Ok(Self {
            config,
            allocator: EntityAllocator::new(),
            agents: Vec::new(),
            agent_slots: HashMap::new(),
            obstacles: Vec::new(),
            bounds,
            frame: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replace the bounds derived from the configuration
    pub fn set_bounds(&mut self, bounds: Box<dyn WorldBounds>) {
        self.bounds = bounds;
    }

    /// Ticks completed so far
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Wander seed of an agent without its own
    fn derive_seed(&self, id: EntityId) -> u64 {
        self.config.seed ^ id.to_bits().wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    pub fn spawn_agent(&mut self, position: Vec3, rotation: Quat, config: AgentConfig) -> EntityId {
        let id = self.allocator.allocate();
        let seed = self.derive_seed(id);
        let agent = AutonomousAgent::new(id, position, rotation, config, seed);

        self.agent_slots.insert(id, self.agents.len());
        self.agents.push(agent);
        log::debug!("Spawned agent {id} at {position:?}");
        id
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> EntityId {
        let id = self.allocator.allocate();
        log::debug!("Added obstacle {id} ({}) at {:?}", obstacle.category, obstacle.position);
        self.obstacles.push((id, obstacle));
        id
    }

    pub fn remove_agent(&mut self, id: EntityId) -> Result<AutonomousAgent> {
        let slot = self.agent_slots.remove(&id).ok_or(SteeringError::AgentNotFound(id))?;
        let agent = self.agents.swap_remove(slot);
        if let Some(moved) = self.agents.get(slot) {
            self.agent_slots.insert(moved.id(), slot);
        }
        self.allocator.release(id);
        log::debug!("Removed agent {id}");
        Ok(agent)
    }

    pub fn remove_obstacle(&mut self, id: EntityId) -> Result<Obstacle> {
        let slot = self
            .obstacles
            .iter()
            .position(|(entity, _)| *entity == id)
            .ok_or(SteeringError::ObstacleNotFound(id))?;
        let (_, obstacle) = self.obstacles.swap_remove(slot);
        self.allocator.release(id);
        log::debug!("Removed obstacle {id}");
        Ok(obstacle)
    }

    pub fn agent(&self, id: EntityId) -> Result<&AutonomousAgent> {
        self.agent_slots
            .get(&id)
            .map(|&slot| &self.agents[slot])
            .ok_or(SteeringError::AgentNotFound(id))
    }

    pub fn agent_mut(&mut self, id: EntityId) -> Result<&mut AutonomousAgent> {
        match self.agent_slots.get(&id) {
            Some(&slot) => Ok(&mut self.agents[slot]),
            None => Err(SteeringError::AgentNotFound(id)),
        }
    }

    pub fn agents(&self) -> impl Iterator<Item = &AutonomousAgent> {
        self.agents.iter()
    }

    pub fn obstacles(&self) -> impl Iterator<Item = (EntityId, &Obstacle)> {
        self.obstacles.iter().map(|(id, obstacle)| (*id, obstacle))
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Read-only world built from the committed state
    pub fn snapshot(&self) -> SpatialWorld {
        let mut world = SpatialWorld::new(self.config.cell_size);
        let bodies = self
            .obstacles
            .iter()
            .map(|(id, obstacle)| obstacle.body(*id))
            .chain(self.agents.iter().map(AutonomousAgent::body));
        for body in bodies {
            if let Err(err) = world.insert(body) {
                log::warn!("Snapshot skipped a body: {err}");
            }
        }
        world
    }

    /// Step every agent by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> TickReport {
        self.tick_with_debug(dt, &NullDebugDraw)
    }

    /// Step every agent, routing sensor debug lines to `debug`
    pub fn tick_with_debug(&mut self, dt: f32, debug: &dyn DebugDraw) -> TickReport {
        let world = self.snapshot();
        let ctx = QueryContext::new(&world).with_debug(debug);

        let outcomes: Vec<SteeringOutcome> = if self.config.parallel {
            self.agents.par_iter_mut().map(|agent| agent.steer(&ctx)).collect()
        } else {
            self.agents.iter_mut().map(|agent| agent.steer(&ctx)).collect()
        };

        for agent in &mut self.agents {
            agent.integrate(dt);
            let movement = agent.movement_mut();
            movement.position = self.bounds.wrap(movement.position);
        }

        self.frame += 1;
        let report = TickReport::from_outcomes(self.frame, &outcomes);
        log::trace!(
            "Frame {}: {} agents, {} with target, {} avoiding, {} wandering",
            report.frame,
            report.agents,
            report.with_target,
            report.count(Stage::ObstacleAvoidance),
            report.count(Stage::Wander)
        );
        report
    }
}
