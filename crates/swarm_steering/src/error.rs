//! Error types for agents and the simulation arena

use swarm_perception::{EntityId, PerceptionError};
use thiserror::Error;

/// Steering system errors
#[derive(Debug, Error)]
pub enum SteeringError {
    /// No live agent with this id
    #[error("Agent not found: {0}")]
    AgentNotFound(EntityId),

    /// No live obstacle with this id
    #[error("Obstacle not found: {0}")]
    ObstacleNotFound(EntityId),

    /// Configuration rejected by a strict check
    #[error("Invalid steering configuration: {0}")]
    InvalidConfig(String),

    /// Sensor or world error surfaced from the perception layer
    #[error(transparent)]
    Perception(#[from] PerceptionError),
}

/// Result type for steering operations
pub type Result<T> = std::result::Result<T, SteeringError>;
