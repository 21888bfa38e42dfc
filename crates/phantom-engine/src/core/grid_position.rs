use serde::{Deserialize, Serialize};

/// A cell coordinate on the board.
///
/// `x` grows to the right and `y` grows upward: row `0` is the bottom row,
/// which is where blocks come to rest when they fall.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step in `direction`.
    ///
    /// The result may lie outside the board; bounds are the board's concern.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the position `rows` cells below this one.
    #[must_use]
    pub const fn below(self, rows: i32) -> Self {
        Self {
            x: self.x,
            y: self.y - rows,
        }
    }

    /// Returns `true` if `other` shares an edge with this position.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        Direction::between(self, other).is_some()
    }
}

impl From<(i32, i32)> for GridPosition {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// One of the four orthogonal directions on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit `(dx, dy)` offset for this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Resolves the direction that leads from `from` to `to`.
    ///
    /// Only exact 4-neighbours resolve. Identical positions, diagonal
    /// neighbours and anything further apart return `None`.
    #[must_use]
    pub fn between(from: GridPosition, to: GridPosition) -> Option<Self> {
        match (to.x - from.x, to.y - from.y) {
            (0, 1) => Some(Self::Up),
            (0, -1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_vertical_axis() {
        let origin = GridPosition::new(2, 2);
        assert_eq!(
            Direction::between(origin, GridPosition::new(2, 3)),
            Some(Direction::Up)
        );
        assert_eq!(
            Direction::between(origin, GridPosition::new(2, 1)),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_between_horizontal_axis() {
        let origin = GridPosition::new(2, 2);
        assert_eq!(
            Direction::between(origin, GridPosition::new(1, 2)),
            Some(Direction::Left)
        );
        assert_eq!(
            Direction::between(origin, GridPosition::new(3, 2)),
            Some(Direction::Right)
        );
    }

    #[test]
    fn test_between_rejects_non_neighbours() {
        let origin = GridPosition::new(2, 2);
        for target in [
            GridPosition::new(2, 2),
            GridPosition::new(3, 3),
            GridPosition::new(1, 1),
            GridPosition::new(4, 2),
            GridPosition::new(2, 0),
        ] {
            assert_eq!(Direction::between(origin, target), None, "{target:?}");
        }
    }

    #[test]
    fn test_step_matches_between() {
        let origin = GridPosition::new(5, 5);
        for direction in Direction::ALL {
            let next = origin.step(direction);
            assert_eq!(Direction::between(origin, next), Some(direction));
            assert_eq!(next.step(direction.opposite()), origin);
        }
    }
}
