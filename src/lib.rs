//! Cube Snake - a two-snake game drawn as 3D cubes
//!
//! This library provides:
//! - Core game logic: snakes, the rival's heuristic, apple, wall and cube geometry (game module)
//! - The render sink boundary and a terminal wireframe renderer (render module)
//! - Keyboard mapping (input module)
//! - Session statistics (metrics module)
//! - The fixed-timestep driver plus interactive and headless modes (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
