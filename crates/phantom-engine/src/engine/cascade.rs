use crate::{Board, GridPosition, MatchDetector};

use super::{BlockFactory, GravityReport, GravityResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum CascadePhase {
    /// The board is stable and match-free; player input is accepted.
    #[default]
    Idle,
    /// A swap or clear is being resolved; input is locked.
    Settling,
}

/// One completed clear pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// 1-based depth of this pass within the current cascade.
    pub chain: usize,
    pub cleared: usize,
    pub spawned: usize,
    pub gravity: GravityReport,
}

/// Result of a single [`CascadeController::tick`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SettleStep {
    /// Nothing to settle.
    Idle,
    /// Some block is still in motion.
    Waiting,
    /// Matches were cleared and the board refilled.
    Cleared(PassReport),
    /// The board is static and match-free again after `chain` passes.
    Settled { chain: usize },
    /// A player swap produced no match and was swapped back.
    Reverted(GridPosition, GridPosition),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleSummary {
    pub passes: usize,
    pub cleared: usize,
    /// `false` if the pass limit was reached before the board settled.
    pub settled: bool,
}

/// Drives the match, clear, gravity and refill loop.
///
/// The controller never changes the board while any block is in motion: each
/// tick first checks [`Board::is_static`], and a pass, once started, runs to
/// completion within that tick. A motion that never finishes therefore keeps
/// the cascade waiting forever.
///
/// # Example
///
/// ```
/// use phantom_engine::{Board, BoardConfig, BlockType, CascadeController, SettleStep};
///
/// let mut board = Board::from_rows(&BoardConfig::default(), &["GBG", "RRR"]).unwrap();
/// let mut controller = CascadeController::for_board(&board);
/// let mut count = 0;
/// let mut refill = || {
///     count += 1;
///     if count % 2 == 0 { BlockType::Yellow } else { BlockType::Purple }
/// };
///
/// controller.begin_settle();
/// assert!(controller.tick(&mut board, &mut refill).is_cleared());
/// assert!(controller.tick(&mut board, &mut refill).is_waiting());
/// board.complete_all_motions();
/// assert!(controller.tick(&mut board, &mut refill).is_settled());
/// assert!(controller.input_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct CascadeController {
    detector: MatchDetector,
    phase: CascadePhase,
    chain: usize,
    pending_swap: Option<(GridPosition, GridPosition)>,
    revert_unmatched_swap: bool,
}

impl CascadeController {
    #[must_use]
    pub fn new(detector: MatchDetector, revert_unmatched_swap: bool) -> Self {
        Self {
            detector,
            phase: CascadePhase::Idle,
            chain: 0,
            pending_swap: None,
            revert_unmatched_swap,
        }
    }

    /// Controller configured from the board's threshold and revert setting.
    #[must_use]
    pub fn for_board(board: &Board) -> Self {
        Self::new(
            MatchDetector::for_board(board),
            board.config().revert_unmatched_swap,
        )
    }

    #[must_use]
    pub fn detector(&self) -> &MatchDetector {
        &self.detector
    }

    #[must_use]
    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    /// Depth of the current (or last finished) cascade.
    #[must_use]
    pub fn chain(&self) -> usize {
        self.chain
    }

    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.phase.is_idle()
    }

    /// Starts a settle cycle. The next ticks check the board for matches.
    pub fn begin_settle(&mut self) {
        self.phase = CascadePhase::Settling;
        self.chain = 0;
    }

    /// Starts a settle cycle for a player swap of `a` and `b`.
    ///
    /// If reverting is enabled and the swap clears nothing, the pair is
    /// swapped back once the board is static.
    pub fn notify_swap(&mut self, a: GridPosition, b: GridPosition) {
        self.begin_settle();
        self.pending_swap = Some((a, b));
    }

    /// Advances the cascade by at most one pass.
    pub fn tick<F>(&mut self, board: &mut Board, factory: &mut F) -> SettleStep
    where
        F: BlockFactory + ?Sized,
    {
        if self.phase.is_idle() {
            return SettleStep::Idle;
        }
        if !board.is_static() {
            return SettleStep::Waiting;
        }

        let matches = self.detector.find_matches(board);
        if matches.is_empty() {
            if let Some((a, b)) = self.pending_swap.take()
                && self.revert_unmatched_swap
                && board.swap(b, a)
            {
                log::debug!("no match after swapping {a} and {b}, swapping back");
                return SettleStep::Reverted(a, b);
            }
            self.phase = CascadePhase::Idle;
            log::trace!("board settled after {} passes", self.chain);
            return SettleStep::Settled { chain: self.chain };
        }

        self.pending_swap = None;
        self.chain += 1;
        let gravity = GravityResolver::resolve(board, &matches, factory);
        let report = PassReport {
            chain: self.chain,
            cleared: gravity.cleared(),
            spawned: gravity.spawned(),
            gravity,
        };
        log::debug!(
            "cascade pass {}: cleared {} blocks, spawned {}",
            report.chain,
            report.cleared,
            report.spawned
        );
        SettleStep::Cleared(report)
    }

    /// Runs the cascade to completion, finishing every motion immediately.
    ///
    /// Stops after `max_passes` clear passes even if matches remain.
    pub fn settle_instantly<F>(
        &mut self,
        board: &mut Board,
        factory: &mut F,
        max_passes: usize,
    ) -> SettleSummary
    where
        F: BlockFactory + ?Sized,
    {
        if self.phase.is_idle() {
            self.begin_settle();
        }
        let mut summary = SettleSummary::default();
        loop {
            board.complete_all_motions();
            match self.tick(board, factory) {
                SettleStep::Cleared(pass) => {
                    summary.passes += 1;
                    summary.cleared += pass.cleared;
                    if summary.passes >= max_passes {
                        break;
                    }
                }
                SettleStep::Idle | SettleStep::Settled { .. } => {
                    summary.settled = true;
                    break;
                }
                SettleStep::Waiting | SettleStep::Reverted(..) => {}
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockType, BoardConfig};

    fn pos(x: i32, y: i32) -> GridPosition {
        GridPosition::new(x, y)
    }

    /// Yields `kinds` in order, then alternates purple and orange.
    fn scripted(kinds: &[BlockType]) -> impl FnMut() -> BlockType + '_ {
        let mut script = kinds.iter().copied();
        let mut odd = false;
        move || {
            script.next().unwrap_or_else(|| {
                odd = !odd;
                if odd {
                    BlockType::Purple
                } else {
                    BlockType::Orange
                }
            })
        }
    }

    fn chain_board() -> Board {
        Board::from_rows(&BoardConfig::default(), &["GYG", "YGY", "RRR"]).unwrap()
    }

    const BLUES: [BlockType; 3] = [BlockType::Blue; 3];

    #[test]
    fn test_idle_controller_does_nothing() {
        let mut board = Board::from_rows(&BoardConfig::default(), &["RRR"]).unwrap();
        let mut controller = CascadeController::for_board(&board);
        assert!(controller.input_enabled());
        let step = controller.tick(&mut board, &mut || BlockType::Green);
        assert_eq!(step, SettleStep::Idle);
        assert_eq!(board.get(0, 0), BlockType::Red);
    }

    #[test]
    fn test_waits_for_motion() {
        let mut board = Board::from_rows(&BoardConfig::default(), &["GRGR"]).unwrap();
        let mut controller = CascadeController::for_board(&board);
        board.swap(pos(0, 0), pos(1, 0));
        controller.notify_swap(pos(0, 0), pos(1, 0));
        assert!(!controller.input_enabled());

        let mut factory = || BlockType::Blue;
        assert_eq!(controller.tick(&mut board, &mut factory), SettleStep::Waiting);
        board.advance_motions(10.0);
        assert_eq!(
            controller.tick(&mut board, &mut factory),
            SettleStep::Settled { chain: 0 }
        );
        assert!(controller.input_enabled());
    }

    #[test]
    fn test_chain_counts_passes() {
        // The first refill completes a blue row at the top
        let mut board = chain_board();
        let mut controller = CascadeController::for_board(&board);
        let mut factory = scripted(&BLUES);

        controller.begin_settle();
        let SettleStep::Cleared(first) = controller.tick(&mut board, &mut factory) else {
            panic!("expected a clear pass");
        };
        assert_eq!(first.chain, 1);
        assert_eq!(first.cleared, 3);
        assert_eq!(board.get(1, 0), BlockType::Green);
        assert_eq!(board.get(1, 2), BlockType::Blue);

        assert_eq!(controller.tick(&mut board, &mut factory), SettleStep::Waiting);
        board.complete_all_motions();
        let SettleStep::Cleared(second) = controller.tick(&mut board, &mut factory) else {
            panic!("expected a second clear pass");
        };
        assert_eq!(second.chain, 2);
        assert_eq!(second.gravity.fallen(), 0);

        board.complete_all_motions();
        assert_eq!(
            controller.tick(&mut board, &mut factory),
            SettleStep::Settled { chain: 2 }
        );
        assert_eq!(board.to_string(), "POP\nGYG\nYGY\n");
        assert!(board.is_consistent());
    }

    #[test]
    fn test_settle_instantly_runs_to_completion() {
        let mut board = chain_board();
        let mut controller = CascadeController::for_board(&board);
        let summary = controller.settle_instantly(&mut board, &mut scripted(&BLUES), 16);
        assert_eq!(
            summary,
            SettleSummary {
                passes: 2,
                cleared: 6,
                settled: true
            }
        );
        assert!(board.is_static());
        assert!(!controller.detector().has_matches(&board));
    }

    #[test]
    fn test_reverts_unmatched_swap() {
        let config = BoardConfig {
            revert_unmatched_swap: true,
            ..BoardConfig::default()
        };
        let mut board = Board::from_rows(&config, &["GRGR"]).unwrap();
        let mut controller = CascadeController::for_board(&board);
        let mut factory = || BlockType::Blue;

        board.swap(pos(0, 0), pos(1, 0));
        controller.notify_swap(pos(0, 0), pos(1, 0));
        board.complete_all_motions();
        assert_eq!(
            controller.tick(&mut board, &mut factory),
            SettleStep::Reverted(pos(0, 0), pos(1, 0))
        );
        assert_eq!(board.get(0, 0), BlockType::Green);
        assert!(!controller.input_enabled());

        board.complete_all_motions();
        assert!(controller.tick(&mut board, &mut factory).is_settled());
    }

    #[test]
    fn test_settle_instantly_respects_pass_limit() {
        let mut board = Board::from_rows(&BoardConfig::default(), &["RRR"]).unwrap();
        let mut controller = CascadeController::for_board(&board);
        let summary = controller.settle_instantly(&mut board, &mut || BlockType::Red, 5);
        assert_eq!(summary.passes, 5);
        assert_eq!(summary.cleared, 15);
        assert!(!summary.settled);
        assert!(!controller.input_enabled());
    }
}
