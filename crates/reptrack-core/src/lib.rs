//! # Reptrack-Core
//!
//! Core types and utilities for the rep tracker: the pose landmark schema
//! delivered by the external detector, per-frame landmark snapshots, joint
//! angle geometry and the shared error type.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
