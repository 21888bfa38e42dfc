use std::collections::BTreeSet;

use crate::{Board, BlockType, Direction, GridPosition, TileGrid};

/// Positions flagged by a detection pass, ordered by column then row.
pub type MatchSet = BTreeSet<GridPosition>;

/// Finds runs of same-typed blocks.
///
/// Every cell is judged on its own: a cell matches when the vertical or the
/// horizontal run through it reaches the threshold. Runs are counted outward
/// from the cell, so each member of a qualifying run is flagged by its own
/// evaluation and no extra closure step is needed.
///
/// # Example
///
/// ```
/// use phantom_engine::{Board, BoardConfig, GridPosition, MatchDetector};
///
/// let board = Board::from_rows(&BoardConfig::default(), &["GRB", "RRR", "BGB"]).unwrap();
/// let detector = MatchDetector::default();
/// let matches = detector.find_matches(&board);
/// assert_eq!(matches.len(), 3);
/// assert!(matches.iter().all(|p| p.y == 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchDetector {
    threshold: usize,
}

impl Default for MatchDetector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl MatchDetector {
    pub const DEFAULT_THRESHOLD: usize = 3;

    /// Creates a detector. Thresholds below 2 are raised to 2.
    #[must_use]
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(2),
        }
    }

    /// Detector using the threshold from the board's configuration.
    #[must_use]
    pub fn for_board(board: &Board) -> Self {
        Self::new(board.config().match_threshold)
    }

    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Counts consecutive cells of `kind` starting at the neighbour of
    /// `origin` in `direction`. The origin itself is not counted.
    #[must_use]
    pub fn count_run<G>(
        grid: &G,
        origin: GridPosition,
        direction: Direction,
        kind: BlockType,
    ) -> usize
    where
        G: TileGrid + ?Sized,
    {
        if kind.is_none() {
            return 0;
        }
        let mut count = 0;
        let mut position = origin.step(direction);
        while grid.contains(position) && grid.kind_at(position).matches(kind) {
            count += 1;
            position = position.step(direction);
        }
        count
    }

    /// Returns the vertical and horizontal run lengths through `position`.
    ///
    /// Both are zero for an empty or out-of-range cell.
    #[must_use]
    pub fn run_lengths<G>(grid: &G, position: GridPosition) -> (usize, usize)
    where
        G: TileGrid + ?Sized,
    {
        let kind = grid.kind_at(position);
        if kind.is_none() {
            return (0, 0);
        }
        let run = |direction| Self::count_run(grid, position, direction, kind);
        let vertical = 1 + run(Direction::Up) + run(Direction::Down);
        let horizontal = 1 + run(Direction::Right) + run(Direction::Left);
        (vertical, horizontal)
    }

    #[must_use]
    pub fn is_match<G>(&self, grid: &G, position: GridPosition) -> bool
    where
        G: TileGrid + ?Sized,
    {
        let (vertical, horizontal) = Self::run_lengths(grid, position);
        vertical >= self.threshold || horizontal >= self.threshold
    }

    #[must_use]
    pub fn find_matches<G>(&self, grid: &G) -> MatchSet
    where
        G: TileGrid,
    {
        grid.positions()
            .filter(|&position| self.is_match(grid, position))
            .collect()
    }

    #[must_use]
    pub fn has_matches<G>(&self, grid: &G) -> bool
    where
        G: TileGrid,
    {
        grid.positions().any(|position| self.is_match(grid, position))
    }
}

/// A grid seen with two cells exchanged, without touching the underlying grid.
#[derive(Debug, Clone, Copy)]
pub struct SwappedView<'a, G: ?Sized> {
    grid: &'a G,
    a: GridPosition,
    b: GridPosition,
}

impl<'a, G> SwappedView<'a, G>
where
    G: TileGrid + ?Sized,
{
    #[must_use]
    pub fn new(grid: &'a G, a: GridPosition, b: GridPosition) -> Self {
        Self { grid, a, b }
    }
}

impl<G> TileGrid for SwappedView<'_, G>
where
    G: TileGrid + ?Sized,
{
    fn width(&self) -> i32 {
        self.grid.width()
    }

    fn height(&self) -> i32 {
        self.grid.height()
    }

    fn kind_at(&self, position: GridPosition) -> BlockType {
        if position == self.a {
            self.grid.kind_at(self.b)
        } else if position == self.b {
            self.grid.kind_at(self.a)
        } else {
            self.grid.kind_at(position)
        }
    }
}
