use crate::{Board, Direction, GridPosition, MatchDetector, TileGrid as _};

use super::matcher::SwappedView;

/// An adjacent swap that would produce at least one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapHint {
    pub from: GridPosition,
    pub to: GridPosition,
    /// Number of cells the swap would flag.
    pub matched: usize,
}

/// Lists every productive swap, best first.
///
/// Each unordered pair is checked once (right and up neighbours). Ties keep
/// board order, so the result is deterministic.
#[must_use]
pub fn find_possible_swaps(board: &Board, detector: &MatchDetector) -> Vec<SwapHint> {
    let mut hints = board
        .positions()
        .flat_map(|from| {
            [Direction::Right, Direction::Up]
                .into_iter()
                .map(move |direction| (from, from.step(direction)))
        })
        .filter(|&(from, to)| board.contains(to) && board.kind_at(from) != board.kind_at(to))
        .filter_map(|(from, to)| {
            let view = SwappedView::new(board, from, to);
            let matched = detector.find_matches(&view).len();
            (matched > 0).then_some(SwapHint { from, to, matched })
        })
        .collect::<Vec<_>>();
    hints.sort_by(|a, b| b.matched.cmp(&a.matched));
    hints
}

/// Returns `true` if at least one swap would produce a match.
#[must_use]
pub fn has_possible_swap(board: &Board, detector: &MatchDetector) -> bool {
    board.positions().any(|from| {
        [Direction::Right, Direction::Up].into_iter().any(|direction| {
            let to = from.step(direction);
            board.contains(to)
                && board.kind_at(from) != board.kind_at(to)
                && detector.has_matches(&SwappedView::new(board, from, to))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardConfig;

    #[test]
    fn test_finds_single_swap() {
        let board = Board::from_rows(&BoardConfig::default(), &["GBY", "RRG", "BYR"]).unwrap();
        let detector = MatchDetector::default();
        let hints = find_possible_swaps(&board, &detector);
        assert!(has_possible_swap(&board, &detector));
        assert!(hints.contains(&SwapHint {
            from: GridPosition::new(2, 0),
            to: GridPosition::new(2, 1),
            matched: 3,
        }));
        assert!(hints.iter().all(|hint| hint.from.is_adjacent(hint.to)));
    }

    #[test]
    fn test_deadlocked_board_has_no_hints() {
        let board = Board::from_rows(&BoardConfig::default(), &["RGB", "GBR", "BRG"]).unwrap();
        let detector = MatchDetector::default();
        assert!(find_possible_swaps(&board, &detector).is_empty());
        assert!(!has_possible_swap(&board, &detector));
    }

    #[test]
    fn test_best_swap_first() {
        let board =
            Board::from_rows(&BoardConfig::default(), &["RRGRR", "BYRYB", "GBYBG"]).unwrap();
        let hints = find_possible_swaps(&board, &MatchDetector::default());
        let best = hints.first().unwrap();
        assert_eq!(best.matched, 5);
        assert_eq!(
            (best.from, best.to),
            (GridPosition::new(2, 1), GridPosition::new(2, 2))
        );
    }
}
