//! Error types for the perception system

use crate::entity::EntityId;
use thiserror::Error;

/// Perception system errors
#[derive(Debug, Error)]
pub enum PerceptionError {
    /// Sensor configuration outside its documented range
    #[error("Invalid sensor configuration: {0}")]
    InvalidSensorConfig(String),

    /// A body with this id is already registered in the world
    #[error("Entity already present in spatial world: {0}")]
    DuplicateEntity(EntityId),

    /// Spatial hash cell size must be positive and finite
    #[error("Invalid grid cell size: {0}")]
    InvalidCellSize(f32),
}

/// Result type for perception operations
pub type Result<T> = std::result::Result<T, PerceptionError>;
