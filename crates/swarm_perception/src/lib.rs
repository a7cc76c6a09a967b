//! # swarm_perception - Sensing for Steering Agents
//!
//! Turns spatial queries into ordered lists of perceived entities.
//!
//! # Features
//!
//! - `Perception` trait with swappable strategies
//! - Ray-fan sensor (one ray per fan direction, fan order)
//! - Proximity sensor over a spatial hash (nearest bearing first)
//! - `WorldQuery` collaborator contract plus a reference `SpatialWorld`
//! - Category filters and layer masks
//! - Debug line output
//!
//! # Example
//!
//! ```ignore
//! use swarm_perception::prelude::*;
//!
//! let mut world = SpatialWorld::new(2.0);
//! world.insert(Body::sphere(EntityId::new(1, 0), "wall", Vec3::new(0.0, 0.0, 3.0), 1.0))?;
//!
//! let sensor = RaycastPerception::new(SensorConfig::new(5.0, 90.0, 5).with_category("wall"));
//! let origin = SensorOrigin::new(EntityId::new(0, 0), Vec3::ZERO, Quat::IDENTITY);
//! let seen = sensor.query(&origin, &QueryContext::new(&world));
//! ```

pub mod config;
pub mod debug;
pub mod entity;
pub mod error;
pub mod grid;
pub mod perception;
pub mod proximity;
pub mod query;
pub mod raycast;
pub mod world;

pub use config::{SensorConfig, FULL_CIRCLE_HALF_ANGLE};
pub use debug::{DebugColor, DebugDraw, DebugLine, DebugRecorder, NullDebugDraw};
pub use entity::{Category, CategoryFilter, EntityAllocator, EntityId, LayerMask};
pub use error::{PerceptionError, Result};
pub use grid::{GridQuery, SpatialHashGrid, DEFAULT_CELL_SIZE};
pub use perception::Perception;
pub use proximity::{ProximityPerception, DEFAULT_DIRECTION_TOLERANCE};
pub use query::{PerceivedEntity, QueryContext, RaycastHit, RaycastOptions, SensorOrigin, WorldQuery};
pub use raycast::RaycastPerception;
pub use world::{Body, BodyShape, SpatialWorld};

pub mod prelude {
    pub use crate::config::SensorConfig;
    pub use crate::debug::{DebugColor, DebugDraw, DebugRecorder, NullDebugDraw};
    pub use crate::entity::{Category, CategoryFilter, EntityId, LayerMask};
    pub use crate::error::PerceptionError;
    pub use crate::perception::Perception;
    pub use crate::proximity::ProximityPerception;
    pub use crate::query::{PerceivedEntity, QueryContext, SensorOrigin, WorldQuery};
    pub use crate::raycast::RaycastPerception;
    pub use crate::world::{Body, BodyShape, SpatialWorld};
    pub use swarm_math::prelude::*;
}
