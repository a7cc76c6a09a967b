//! Reference world query
//!
//! [`SpatialWorld`] is a snapshot of bodies (spheres or boxes) indexed by a
//! [`SpatialHashGrid`]. It answers ray casts and sphere overlaps for the
//! sensors, and is what the simulation builds at the start of every tick.

use crate::entity::{Category, EntityId, LayerMask};
use crate::error::{PerceptionError, Result};
use crate::grid::{GridQuery, SpatialHashGrid};
use crate::query::{PerceivedEntity, RaycastHit, RaycastOptions, WorldQuery};
use std::collections::HashMap;
use swarm_math::{ray_aabb, ray_sphere_at, Ray, Vec3, AABB};

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Sphere { radius: f32 },
    /// Axis-aligned box
    Box { half_extents: Vec3 },
}

/// One entity in the world snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub entity: EntityId,
    pub category: Category,
    pub layers: LayerMask,
    pub shape: BodyShape,
    pub position: Vec3,
    /// Present only for steerable entities
    pub velocity: Option<Vec3>,
}

impl Body {
    /// Spherical body
    pub fn sphere(entity: EntityId, category: impl Into<Category>, position: Vec3, radius: f32) -> Self {
        Self {
            entity,
            category: category.into(),
            layers: LayerMask::ALL,
            shape: BodyShape::Sphere { radius: radius.max(0.0) },
            position,
            velocity: None,
        }
    }

    /// Axis-aligned box body
    pub fn cuboid(entity: EntityId, category: impl Into<Category>, position: Vec3, half_extents: Vec3) -> Self {
        Self {
            entity,
            category: category.into(),
            layers: LayerMask::ALL,
            shape: BodyShape::Box {
                half_extents: half_extents.abs(),
            },
            position,
            velocity: None,
        }
    }

    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Mark the body as steerable
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn aabb(&self) -> AABB {
        match self.shape {
            BodyShape::Sphere { radius } => AABB::from_center_half_extents(self.position, Vec3::splat(radius)),
            BodyShape::Box { half_extents } => AABB::from_center_half_extents(self.position, half_extents),
        }
    }

    /// Distance along `ray` to the body surface
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        match self.shape {
            BodyShape::Sphere { radius } => ray_sphere_at(ray, self.position, radius),
            BodyShape::Box { .. } => ray_aabb(ray, &self.aabb()),
        }
    }

    /// Whether the body touches the sphere
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        match self.shape {
            BodyShape::Sphere { radius: own } => {
                let reach = own + radius;
                self.position.distance_squared(center) <= reach * reach
            }
            BodyShape::Box { .. } => {
                let aabb = self.aabb();
                let closest = center.max(aabb.min).min(aabb.max);
                closest.distance_squared(center) <= radius * radius
            }
        }
    }
}

/// Bodies plus a spatial hash over their bounds
#[derive(Debug, Clone)]
pub struct SpatialWorld {
    bodies: Vec<Body>,
    index: HashMap<EntityId, usize>,
    grid: SpatialHashGrid,
    /// Slots whose bounds were too large for the grid
    oversized: Vec<usize>,
}

impl Default for SpatialWorld {
    fn default() -> Self {
        Self::with_grid(SpatialHashGrid::with_default_cell_size())
    }
}

impl SpatialWorld {
    /// Empty world; an invalid cell size falls back to the default
    pub fn new(cell_size: f32) -> Self {
        match SpatialHashGrid::new(cell_size) {
            Ok(grid) => Self::with_grid(grid),
            Err(err) => {
                log::warn!("{err}, using default cell size");
                Self::default()
            }
        }
    }

    fn with_grid(grid: SpatialHashGrid) -> Self {
        Self {
            bodies: Vec::new(),
            index: HashMap::new(),
            grid,
            oversized: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.index.clear();
        self.grid.clear();
        self.oversized.clear();
    }

    /// Add a body. Fails if its entity is already present.
    pub fn insert(&mut self, body: Body) -> Result<()> {
        if self.index.contains_key(&body.entity) {
            return Err(PerceptionError::DuplicateEntity(body.entity));
        }
        let slot = self.bodies.len();
        if !self.grid.insert_aabb(slot, &body.aabb()) {
            self.oversized.push(slot);
        }
        self.index.insert(body.entity, slot);
        self.bodies.push(body);
        Ok(())
    }

    /// Remove a body, returning it
    pub fn remove(&mut self, entity: EntityId) -> Option<Body> {
        let slot = self.index.remove(&entity)?;
        let body = self.bodies.swap_remove(slot);
        if let Some(moved) = self.bodies.get(slot) {
            self.index.insert(moved.entity, slot);
        }
        self.reindex();
        Some(body)
    }

    pub fn body(&self, entity: EntityId) -> Option<&Body> {
        self.index.get(&entity).map(|&slot| &self.bodies[slot])
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    fn reindex(&mut self) {
        self.oversized = self
            .grid
            .rebuild(self.bodies.iter().enumerate().map(|(slot, body)| (slot, body.aabb())));
    }

    /// Slots that may touch `region`
    fn candidates(&self, region: &AABB) -> Vec<usize> {
        match self.grid.query_aabb(region) {
            GridQuery::Candidates(mut slots) => {
                slots.extend_from_slice(&self.oversized);
                slots
            }
            GridQuery::Everything => (0..self.bodies.len()).collect(),
        }
    }
}

impl WorldQuery for SpatialWorld {
    fn cast_ray(&self, ray: &Ray, options: &RaycastOptions) -> Option<RaycastHit> {
        if !ray.is_valid() || !(options.max_distance >= 0.0) {
            return None;
        }

        let region = AABB::EMPTY
            .expand_to_include(ray.origin)
            .expand_to_include(ray.at(options.max_distance));

        let mut best: Option<(f32, &Body)> = None;
        for slot in self.candidates(&region) {
            let body = &self.bodies[slot];
            if options.exclude == Some(body.entity) || !options.layers.intersects(body.layers) {
                continue;
            }
            let Some(t) = body.intersect_ray(ray) else {
                continue;
            };
            if t > options.max_distance {
                continue;
            }
            let closer = match best {
                None => true,
                Some((best_t, best_body)) => t < best_t || (t == best_t && body.entity < best_body.entity),
            };
            if closer {
                best = Some((t, body));
            }
        }

        best.map(|(t, body)| RaycastHit {
            entity: body.entity,
            category: body.category.clone(),
            position: body.position,
            point: ray.at(t),
            distance: t,
        })
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, layers: LayerMask) -> Vec<PerceivedEntity> {
        if !(radius >= 0.0) || !center.is_finite() {
            return Vec::new();
        }

        let region = AABB::from_center_half_extents(center, Vec3::splat(radius));
        let mut found: Vec<PerceivedEntity> = self
            .candidates(&region)
            .into_iter()
            .map(|slot| &self.bodies[slot])
            .filter(|body| layers.intersects(body.layers) && body.overlaps_sphere(center, radius))
            .map(|body| PerceivedEntity {
                entity: body.entity,
                category: body.category.clone(),
                position: body.position,
                distance: body.position.distance(center),
            })
            .collect();
        found.sort_by_key(|p| p.entity);
        found
    }

    fn velocity_of(&self, entity: EntityId) -> Option<Vec3> {
        self.body(entity).and_then(|body| body.velocity)
    }
}
