use crate::{BlockType, Board, GridPosition, MatchSet};

use super::BlockFactory;

/// What happened to one column during a clear pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnReport {
    pub column: i32,
    /// Matched blocks removed from the column.
    pub cleared: usize,
    /// Surviving blocks that moved down.
    pub fallen: usize,
    /// New blocks created at the top. Always equal to `cleared`.
    pub spawned: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GravityReport {
    pub columns: Vec<ColumnReport>,
}

impl GravityReport {
    #[must_use]
    pub fn cleared(&self) -> usize {
        self.columns.iter().map(|c| c.cleared).sum()
    }

    #[must_use]
    pub fn fallen(&self) -> usize {
        self.columns.iter().map(|c| c.fallen).sum()
    }

    #[must_use]
    pub fn spawned(&self) -> usize {
        self.columns.iter().map(|c| c.spawned).sum()
    }
}

/// Removes matched blocks, compacts each column downward and refills it.
///
/// Columns are handled independently. Walking a column bottom to top, every
/// matched block is destroyed and bumps the column's fall count; every other
/// block drops by the current fall count. Then as many new blocks as were
/// cleared spawn above the board and fall into the freed rows at the top.
///
/// The board is full and consistent again when [`Self::resolve`] returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityResolver;

impl GravityResolver {
    pub fn resolve<F>(board: &mut Board, matches: &MatchSet, factory: &mut F) -> GravityReport
    where
        F: BlockFactory + ?Sized,
    {
        let columns = (0..board.width())
            .map(|x| Self::resolve_column(board, x, matches, factory))
            .filter(|report| report.cleared > 0)
            .collect();
        GravityReport { columns }
    }

    fn resolve_column<F>(
        board: &mut Board,
        x: i32,
        matches: &MatchSet,
        factory: &mut F,
    ) -> ColumnReport
    where
        F: BlockFactory + ?Sized,
    {
        let height = board.height();
        let mut report = ColumnReport {
            column: x,
            ..ColumnReport::default()
        };

        let mut fall_count = 0;
        for y in 0..height {
            let position = GridPosition::new(x, y);
            if matches.contains(&position) {
                board.destroy(position);
                fall_count += 1;
            } else if fall_count > 0 && board.drop_block(position, position.below(fall_count)) {
                report.fallen += 1;
            }
        }

        for rise in 1..=fall_count {
            let entry = GridPosition::new(x, height + rise - 1);
            let target = GridPosition::new(x, height - fall_count + rise - 1);
            let mut kind = factory.next_type();
            if kind.is_none() {
                kind = BlockType::PLAYABLE[0];
            }
            board.spawn(target, kind, entry);
        }

        report.cleared = usize::try_from(fall_count).unwrap_or_default();
        report.spawned = report.cleared;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoardConfig, BoardEvent};

    fn pos(x: i32, y: i32) -> GridPosition {
        GridPosition::new(x, y)
    }

    #[test]
    fn test_compacts_column_in_order() {
        // Rows 0..5 bottom to top: R G B Y P, rows 1 and 3 are cleared
        let mut board =
            Board::from_rows(&BoardConfig::default(), &["P", "Y", "B", "G", "R"]).unwrap();
        board.drain_events().for_each(drop);
        let matches = [pos(0, 1), pos(0, 3)].into_iter().collect();
        let mut factory = || BlockType::Orange;

        let report = GravityResolver::resolve(&mut board, &matches, &mut factory);

        assert_eq!(
            report.columns,
            vec![ColumnReport {
                column: 0,
                cleared: 2,
                fallen: 2,
                spawned: 2
            }]
        );
        let column = (0..5).map(|y| board.get(0, y)).collect::<Vec<_>>();
        assert_eq!(
            column,
            [
                BlockType::Red,
                BlockType::Blue,
                BlockType::Purple,
                BlockType::Orange,
                BlockType::Orange
            ]
        );
        assert!(board.is_consistent());
    }

    #[test]
    fn test_spawn_entry_and_target_rows() {
        let mut board = Board::from_rows(&BoardConfig::default(), &["G", "R", "R", "B"]).unwrap();
        board.drain_events().for_each(drop);
        let matches = [pos(0, 1), pos(0, 2)].into_iter().collect();
        GravityResolver::resolve(&mut board, &matches, &mut || BlockType::Yellow);

        let spawns = board
            .drain_events()
            .filter_map(|event| match event {
                BoardEvent::Spawned {
                    position, entry, ..
                } => Some((entry, position)),
                _ => None,
            })
            .collect::<Vec<_>>();
        // height 4, two cleared: rise 1 enters at row 4 and lands on row 2
        assert_eq!(spawns, vec![(pos(0, 4), pos(0, 2)), (pos(0, 5), pos(0, 3))]);

        let fall = board.block(0, 1).unwrap().motion().unwrap();
        assert_eq!(fall.origin(), pos(0, 3));
        assert_eq!(fall.target(), pos(0, 1));
    }

    #[test]
    fn test_full_column_clear() {
        let mut board = Board::from_rows(&BoardConfig::default(), &["R", "R", "R"]).unwrap();
        let matches = (0..3).map(|y| pos(0, y)).collect();
        let report = GravityResolver::resolve(&mut board, &matches, &mut || BlockType::Green);
        assert_eq!(report.cleared(), 3);
        assert_eq!(report.fallen(), 0);
        assert!((0..3).all(|y| board.get(0, y) == BlockType::Green));
        assert!(board.is_consistent());
    }

    #[test]
    fn test_untouched_columns_are_skipped() {
        let mut board = Board::from_rows(&BoardConfig::default(), &["RGB", "GBR"]).unwrap();
        let matches = std::iter::once(pos(2, 0)).collect();
        let report = GravityResolver::resolve(&mut board, &matches, &mut || BlockType::Purple);
        assert_eq!(report.columns.len(), 1);
        assert_eq!(report.columns[0].column, 2);
        assert_eq!(board.get(2, 0), BlockType::Blue);
        assert_eq!(board.get(2, 1), BlockType::Purple);
        assert!(board.block(0, 0).is_some_and(|b| !b.in_motion()));
    }
}
