use super::direction::Direction;
use super::state::Position;

/// How a snake picks its heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingPolicy {
    /// Headings only come from the input source
    Input,
    /// Greedy chase toward a target cell
    SeekTarget,
}

impl HeadingPolicy {
    /// Heading this policy would request for a snake at `head` chasing `target`
    pub fn suggest(&self, head: Position, target: Position) -> Option<Direction> {
        match self {
            HeadingPolicy::Input => None,
            HeadingPolicy::SeekTarget => seek_heading(head, target),
        }
    }
}

/// Single-axis step from `head` toward `target`.
///
/// Each axis delta collapses to its sign. The horizontal axis wins over the
/// vertical one, so a target off on both axes is approached along x first.
/// Returns `None` when head and target coincide.
pub fn seek_heading(head: Position, target: Position) -> Option<Direction> {
    let dx = (target.x - head.x).signum();
    let dy = (target.y - head.y).signum();

    match (dx, dy) {
        (-1, _) => Some(Direction::Left),
        (1, _) => Some(Direction::Right),
        (_, -1) => Some(Direction::Up),
        (_, 1) => Some(Direction::Down),
        _ => None,
    }
}
