use std::path::PathBuf;

use thiserror::Error;

use crate::types::{CharacterId, MeshId};

/// Errors raised while building level geometry from boundary polygons.
#[derive(Debug, Error, PartialEq)]
pub enum BoundaryError {
    #[error("boundary polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    #[error("perimeter has {perimeter} points but walkway has {walkway}; polygons must be index-aligned")]
    MismatchedPolygons { perimeter: usize, walkway: usize },
    #[error("boundary point {index} is not finite")]
    NonFinitePoint { index: usize },
}

/// Errors raised by the rigid body world.
#[derive(Debug, Error, PartialEq)]
pub enum PhysicsError {
    #[error("physics world has been destroyed")]
    Destroyed,
    #[error("mesh {0:?} already has a collider")]
    DuplicateMesh(MeshId),
    #[error("invalid collider shape: {0}")]
    InvalidShape(&'static str),
    #[error("invalid body mass {0}")]
    InvalidMass(f32),
    #[error("non-finite {0}")]
    NonFinite(&'static str),
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}

/// Errors raised by the combat target set.
#[derive(Debug, Error, PartialEq)]
pub enum TargetError {
    #[error("character {0:?} already has hit volumes attached")]
    AlreadyAttached(CharacterId),
    #[error("character {0:?} has no hit volumes attached")]
    NotAttached(CharacterId),
    #[error("hit volume slot {0} is out of range")]
    SlotOutOfRange(usize),
}

/// Errors raised while loading level configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read level config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level config")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level config: {0}")]
    Invalid(String),
}
