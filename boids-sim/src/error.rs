use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlockError {
    #[error("simulation bounds are empty: min {min} must be below max {max} on every axis")]
    InvalidBounds { min: Vec3, max: Vec3 },
    #[error("no collision-free spawn position found after {attempts} attempts")]
    SpawnExhausted { attempts: u32 },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
