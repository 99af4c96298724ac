use serde::{Deserialize, Serialize};

/// Direction a snake can move in. The y axis grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// Returns true if `other` moves along the other axis.
    ///
    /// Turns are only honoured when this holds, which rules out both
    /// reversals and no-op requests along the current axis.
    pub fn is_perpendicular(&self, other: Direction) -> bool {
        let (dx, dy) = self.delta();
        let (ox, oy) = other.delta();
        (dx != 0 && oy != 0) || (dy != 0 && ox != 0)
    }
}
