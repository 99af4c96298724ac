//! Core game logic module
//!
//! This module contains the snake rules, the rival's heading heuristic and the
//! cube geometry, without any I/O or rendering dependencies.

pub mod config;
pub mod direction;
pub mod engine;
pub mod geometry;
pub mod policy;
pub mod state;

// Re-export commonly used types
pub use config::{Camera, GameConfig, Rgb};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use geometry::{CubeGeometry, FLOATS_PER_CUBE, VERTICES_PER_CUBE};
pub use policy::{seek_heading, HeadingPolicy};
pub use state::{Apple, CollisionType, GameState, Grid, Position, Snake, Wall};
