use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::direction::Direction;
use super::state::{Grid, Position};

/// An RGB colour with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    /// Components scaled to 0..=255
    pub fn to_u8(&self) -> [u8; 3] {
        self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Perspective camera used to project the cube meshes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: 0.5 * std::f32::consts::PI,
            aspect: 1.0,
            near: 0.1,
            far: 2.0,
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid, border included
    pub grid_size: i32,
    /// Number of segments a snake starts with
    pub initial_length: usize,
    /// Head position of the player snake at the start of a round
    pub player_start: Position,
    /// Direction of the player snake at the start of a round
    pub player_direction: Direction,

    /// Delay between two ticks
    pub tick_interval_ms: u64,
    /// Delay before the first tick of a new round after the player died
    pub death_pause_ms: u64,
    /// Chance per tick that the rival consults its heading heuristic
    pub seek_probability: f64,
    /// Fixed RNG seed; a fresh entropy seed is used when absent
    pub seed: Option<u64>,

    /// z coordinate of the front face of every cube
    pub depth: f32,
    pub camera: Camera,

    pub player_color: Rgb,
    pub apple_color: Rgb,
    pub wall_color: Rgb,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 50,
            initial_length: 4,
            player_start: Position::new(10, 25),
            player_direction: Direction::Right,
            tick_interval_ms: 50,
            death_pause_ms: 1000,
            seek_probability: 0.7,
            seed: None,
            depth: -1.05,
            camera: Camera::default(),
            player_color: Rgb::new(0.9, 0.9, 0.9),
            apple_color: Rgb::new(1.0, 0.0, 0.0),
            wall_color: Rgb::new(0.4, 0.2, 0.0),
        }
    }
}

impl GameConfig {
    /// Create a configuration with a fixed RNG seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Read a JSON configuration file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size)
    }

    /// Check that a round can actually be started with these settings
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_size >= 8,
            "grid_size must be at least 8, got {}",
            self.grid_size
        );
        ensure!(self.initial_length >= 1, "initial_length must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&self.seek_probability),
            "seek_probability must be within [0, 1], got {}",
            self.seek_probability
        );
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be positive");

        let grid = self.grid();
        let (dx, dy) = self.player_direction.delta();
        let length = match i32::try_from(self.initial_length) {
            Ok(length) if length <= self.grid_size => length,
            _ => bail!(
                "initial_length {} does not fit on a grid of size {}",
                self.initial_length,
                self.grid_size
            ),
        };
        let back = length - 1;
        let tail = self.player_start.moved_by(-dx * back, -dy * back);
        ensure!(
            grid.is_interior(self.player_start) && grid.is_interior(tail),
            "player snake starting at ({}, {}) does not fit inside the grid",
            self.player_start.x,
            self.player_start.y
        );
        Ok(())
    }
}
