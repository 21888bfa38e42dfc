use super::GridPosition;

/// Maps a host-side pick (mouse position, ray hit, cursor, ...) to a cell.
///
/// The board never performs geometric queries itself. Any
/// `Fn(W) -> Option<GridPosition>` is a resolver:
///
/// ```
/// use phantom_engine::{CoordinateResolver, GridPosition};
///
/// let cell_size = 2.0_f32;
/// let resolver = |(x, y): (f32, f32)| {
///     (x >= 0.0 && y >= 0.0)
///         .then(|| GridPosition::new((x / cell_size) as i32, (y / cell_size) as i32))
/// };
/// assert_eq!(resolver.resolve((3.0, 5.0)), Some(GridPosition::new(1, 2)));
/// assert_eq!(resolver.resolve((-1.0, 0.0)), None);
/// ```
pub trait CoordinateResolver<W> {
    fn resolve(&self, world: W) -> Option<GridPosition>;
}

impl<W, F> CoordinateResolver<W> for F
where
    F: Fn(W) -> Option<GridPosition>,
{
    fn resolve(&self, world: W) -> Option<GridPosition> {
        self(world)
    }
}

/// Outcome of a pick or drag release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Selection {
    /// Nothing changed: the pick missed the board, input is locked, or a drag
    /// ended where it started.
    Ignored,
    Selected(GridPosition),
    Deselected(GridPosition),
    /// The selected block and the picked neighbour were swapped.
    Swapped(GridPosition, GridPosition),
    /// The pick was not a neighbour of the selection; the selection is kept.
    Rejected(GridPosition),
}
