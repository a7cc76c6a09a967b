//! World-query collaborator contract
//!
//! Sensors never intersect geometry themselves. They ask a [`WorldQuery`]
//! implementation "what is visible along this ray" or "what overlaps this
//! sphere" and interpret the answer.

use crate::debug::{DebugDraw, NullDebugDraw};
use crate::entity::{Category, EntityId, LayerMask};
use swarm_math::{Quat, Ray, Vec3};

/// Result of a raycast query
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastHit {
    /// The entity that was hit
    pub entity: EntityId,
    /// Category tag of the hit entity
    pub category: Category,
    /// Position of the hit entity
    pub position: Vec3,
    /// Hit point in world space
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

impl RaycastHit {
    /// View of the hit as a perceived entity
    pub fn into_perceived(self) -> PerceivedEntity {
        PerceivedEntity {
            entity: self.entity,
            category: self.category,
            position: self.position,
            distance: self.distance,
        }
    }
}

/// Options for raycast queries
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastOptions {
    /// Maximum distance for the ray
    pub max_distance: f32,
    /// Layers that may be hit
    pub layers: LayerMask,
    /// Entity to ignore (usually the caster)
    pub exclude: Option<EntityId>,
}

impl Default for RaycastOptions {
    fn default() -> Self {
        Self {
            max_distance: f32::MAX,
            layers: LayerMask::ALL,
            exclude: None,
        }
    }
}

impl RaycastOptions {
    /// Set maximum distance
    pub fn with_max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    /// Set the layer filter
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Ignore an entity
    pub fn exclude(mut self, entity: EntityId) -> Self {
        self.exclude = Some(entity);
        self
    }
}

/// An entity reported by a sensor
///
/// A copy of the entity's state from the snapshot the query ran against; it
/// is only meaningful for the current tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PerceivedEntity {
    pub entity: EntityId,
    pub category: Category,
    pub position: Vec3,
    /// Distance from the sensor when it was perceived
    pub distance: f32,
}

/// Read-only view of the world that sensors and behaviors query
///
/// Implementations must be reentrant: agents query in parallel.
pub trait WorldQuery: Send + Sync {
    /// First hit along `ray` within `options.max_distance`
    fn cast_ray(&self, ray: &Ray, options: &RaycastOptions) -> Option<RaycastHit>;

    /// Entities whose bodies overlap the sphere
    fn overlap_sphere(&self, _center: Vec3, _radius: f32, _layers: LayerMask) -> Vec<PerceivedEntity> {
        Vec::new()
    }

    /// Velocity of a steerable entity; `None` for static or unknown entities
    fn velocity_of(&self, _entity: EntityId) -> Option<Vec3> {
        None
    }
}

/// Pose of the querying entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorOrigin {
    pub entity: EntityId,
    pub position: Vec3,
    pub rotation: Quat,
}

impl SensorOrigin {
    pub fn new(entity: EntityId, position: Vec3, rotation: Quat) -> Self {
        Self { entity, position, rotation }
    }

    /// Facing direction of the sensor
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation.forward()
    }
}

static NULL_DEBUG: NullDebugDraw = NullDebugDraw;

/// Collaborators a sensor may use during a query
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub world: &'a dyn WorldQuery,
    pub debug: &'a dyn DebugDraw,
}

impl<'a> QueryContext<'a> {
    /// Context without debug output
    pub fn new(world: &'a dyn WorldQuery) -> Self {
        Self {
            world,
            debug: &NULL_DEBUG,
        }
    }

    /// Route debug lines to `debug`
    pub fn with_debug(mut self, debug: &'a dyn DebugDraw) -> Self {
        self.debug = debug;
        self
    }
}
