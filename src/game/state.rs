use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::RangeInclusive;

use super::config::Rgb;
use super::direction::Direction;
use super::geometry::CubeGeometry;
use super::policy::HeadingPolicy;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Square grid whose outermost ring of cells is wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: i32,
}

impl Grid {
    pub fn new(size: i32) -> Self {
        Self { size }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Cells a snake head may occupy without dying
    pub fn interior(&self) -> RangeInclusive<i32> {
        1..=self.size - 2
    }

    pub fn is_interior(&self, pos: Position) -> bool {
        let range = self.interior();
        range.contains(&pos.x) && range.contains(&pos.y)
    }

    /// Coordinates used when placing apples and rival snakes
    pub fn spawn_range(&self) -> RangeInclusive<i32> {
        2..=self.size - 2
    }

    /// Border cells: top row, left column, bottom row, then right column
    pub fn border(&self) -> Vec<Position> {
        let last = self.size - 1;
        let mut cells = Vec::with_capacity(4 * last as usize);
        cells.extend((0..self.size).map(|x| Position::new(x, 0)));
        cells.extend((1..self.size).map(|y| Position::new(0, y)));
        cells.extend((1..self.size).map(|x| Position::new(x, last)));
        cells.extend((1..last).map(|y| Position::new(last, y)));
        cells
    }
}

/// Why a snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the interior grid
    OutOfBounds,
    /// Head ran into the snake's own body
    SelfCollision,
    /// Head ran into the other snake
    HitRival,
}

/// A snake on the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Segments from tail (front) to head (back)
    body: VecDeque<Position>,
    direction: Direction,
    next_direction: Direction,
    color: Rgb,
    policy: HeadingPolicy,
}

impl Snake {
    /// Create a snake with its head at `head` and `length - 1` segments
    /// trailing behind it
    pub fn new(
        head: Position,
        direction: Direction,
        length: usize,
        color: Rgb,
        policy: HeadingPolicy,
    ) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .rev()
            .map(|back| head.moved_by(-dx * back, -dy * back))
            .collect();

        Self {
            body,
            direction,
            next_direction: direction,
            color,
            policy,
        }
    }

    pub fn head(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn tail(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true for a constructed snake)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Segments from tail to head
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn policy(&self) -> HeadingPolicy {
        self.policy
    }

    /// Queue a heading change for the next advance. Only the latest request
    /// is kept, and it is dropped then unless it is perpendicular to the
    /// direction of travel.
    pub fn heading(&mut self, direction: Direction) {
        self.next_direction = direction;
    }

    /// Let the heading policy pick a heading toward `target`
    pub fn steer(&mut self, target: Position) {
        if let Some(direction) = self.policy.suggest(self.head(), target) {
            self.heading(direction);
        }
    }

    /// Move one cell forward. Returns true if the new head landed on
    /// `target`, in which case the tail stays and the snake grows by one.
    pub fn advance(&mut self, target: Position) -> bool {
        if self.direction.is_perpendicular(self.next_direction) {
            self.direction = self.next_direction;
        }

        let new_head = self.head().moved_in_direction(self.direction);
        self.body.push_back(new_head);

        if new_head == target {
            return true;
        }

        self.body.pop_front();
        false
    }

    /// True if this snake's head lies on any segment of `other`
    pub fn collides_with(&self, other: &Snake) -> bool {
        other.body.contains(&self.head())
    }

    /// Why this snake is dead, if it is
    pub fn death_cause(&self, grid: Grid) -> Option<CollisionType> {
        let head = self.head();
        if !grid.is_interior(head) {
            return Some(CollisionType::OutOfBounds);
        }
        if self.body.iter().rev().skip(1).any(|&segment| segment == head) {
            return Some(CollisionType::SelfCollision);
        }
        None
    }

    pub fn is_dead(&self, grid: Grid) -> bool {
        self.death_cause(grid).is_some()
    }
}

/// The apple both snakes chase
#[derive(Debug, Clone, PartialEq)]
pub struct Apple {
    position: Position,
    color: Rgb,
    buffer: Vec<f32>,
}

impl Apple {
    pub fn new(position: Position, color: Rgb, geometry: &CubeGeometry) -> Self {
        Self {
            position,
            color,
            buffer: geometry.cube(position).to_vec(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Cube vertices for the current position
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Move the apple and rebuild its cube
    pub fn relocate(&mut self, position: Position, geometry: &CubeGeometry) {
        self.position = position;
        self.buffer.clear();
        self.buffer.extend_from_slice(&geometry.cube(position));
    }
}

/// Static border around the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    cells: Vec<Position>,
    color: Rgb,
    buffer: Vec<f32>,
}

impl Wall {
    pub fn new(grid: Grid, color: Rgb, geometry: &CubeGeometry) -> Self {
        let cells = grid.border();
        let buffer = geometry.mesh(cells.iter().copied());
        Self {
            cells,
            color,
            buffer,
        }
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    pub geometry: CubeGeometry,
    pub player: Snake,
    pub rival: Snake,
    pub apple: Apple,
    pub wall: Wall,
    /// Apples eaten by the player this round
    pub score: u32,
    /// Ticks since the start of the round
    pub ticks: u64,
}
