use rand::Rng as _;

use crate::{
    BlockType, Board, BoardConfig, BoardConfigError, BoardEvent, BoardSnapshot, CoordinateResolver,
    GridPosition, Selection, SwapError, TileGrid as _,
};

use super::{
    BlockFactory, BlockSeed, CascadeController, GameStats, RandomBlockFactory, SettleStep,
    SwapHint, find_possible_swaps, has_possible_swap,
};

/// Factory draws per cell before the initial fill accepts a matching type.
const MAX_REROLLS: usize = 32;
/// Rearrangements tried when the board has no productive swap. The second
/// half redraws every type instead of permuting the existing ones.
const MAX_SHUFFLES: usize = 64;
/// Ticks [`GameSession::settle_now`] runs before giving up.
const MAX_SETTLE_STEPS: usize = 1024;

/// A board together with its refill source, cascade controller and statistics.
///
/// The session gates player input on the controller: selections and swaps
/// are ignored (or rejected with [`SwapError::InputLocked`]) until the board
/// is static and match-free.
///
/// # Example
///
/// ```
/// use phantom_engine::{BoardConfig, GameSession};
///
/// let mut session = GameSession::new(&BoardConfig::default()).unwrap();
/// assert!(session.input_enabled());
///
/// let hint = session.hint().expect("a fresh board always has a move");
/// session.try_swap(hint.from, hint.to).unwrap();
/// assert!(!session.input_enabled());
///
/// assert!(session.settle_now());
/// assert!(session.stats().score() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    factory: RandomBlockFactory,
    controller: CascadeController,
    stats: GameStats,
    seed: BlockSeed,
    awaiting_swap_result: bool,
}

impl GameSession {
    /// Creates a session with a random seed.
    pub fn new(config: &BoardConfig) -> Result<Self, BoardConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Creates a session whose board and refills are determined by `seed`.
    ///
    /// The initial board contains no match and at least one productive swap
    /// whenever the palette allows it.
    pub fn with_seed(config: &BoardConfig, seed: BlockSeed) -> Result<Self, BoardConfigError> {
        config.validate()?;
        let mut factory = RandomBlockFactory::with_seed(seed);
        let board = initial_board(config, &mut factory)?;
        log::debug!(
            "new session {}x{} with seed {seed}",
            config.width,
            config.height
        );
        let mut session = Self::assemble(board, factory, seed);
        if session.controller.detector().has_matches(&session.board) {
            session.controller.begin_settle();
        } else {
            session.ensure_playable();
        }
        Ok(session)
    }

    /// Wraps an existing board. Refills are drawn from `seed`.
    ///
    /// If the board already contains matches, the session starts settling.
    #[must_use]
    pub fn from_board(board: Board, seed: BlockSeed) -> Self {
        let factory = RandomBlockFactory::with_seed(seed);
        let mut session = Self::assemble(board, factory, seed);
        if session.controller.detector().has_matches(&session.board) {
            session.controller.begin_settle();
        }
        session
    }

    fn assemble(board: Board, factory: RandomBlockFactory, seed: BlockSeed) -> Self {
        Self {
            controller: CascadeController::for_board(&board),
            board,
            factory,
            stats: GameStats::new(),
            seed,
            awaiting_swap_result: false,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        self.board.config()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn seed(&self) -> BlockSeed {
        self.seed
    }

    #[must_use]
    pub fn controller(&self) -> &CascadeController {
        &self.controller
    }

    /// `true` once the cascade is idle and no block is moving.
    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.controller.input_enabled() && self.board.is_static()
    }

    #[must_use]
    pub fn selected(&self) -> Option<GridPosition> {
        self.board.selected()
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = BoardEvent> + '_ {
        self.board.drain_events()
    }

    /// Productive swaps on the current board, best first.
    #[must_use]
    pub fn hints(&self) -> Vec<SwapHint> {
        find_possible_swaps(&self.board, self.controller.detector())
    }

    #[must_use]
    pub fn hint(&self) -> Option<SwapHint> {
        self.hints().into_iter().next()
    }

    /// See [`Board::select`]. Ignored while the board is settling.
    pub fn select<W, R>(&mut self, resolver: &R, world: W) -> Selection
    where
        R: CoordinateResolver<W> + ?Sized,
    {
        if !self.input_enabled() {
            return Selection::Ignored;
        }
        let selection = self.board.select(resolver, world);
        self.observe_selection(selection);
        selection
    }

    pub fn select_at(&mut self, position: GridPosition) -> Selection {
        let resolver = |p: GridPosition| Some(p);
        self.select(&resolver, position)
    }

    /// See [`Board::drag_release`]. Ignored while the board is settling.
    pub fn drag_release<W, R>(&mut self, resolver: &R, world: W) -> Selection
    where
        R: CoordinateResolver<W> + ?Sized,
    {
        if !self.input_enabled() {
            return Selection::Ignored;
        }
        let selection = self.board.drag_release(resolver, world);
        self.observe_selection(selection);
        selection
    }

    pub fn deselect(&mut self) {
        self.board.deselect();
    }

    /// Swaps two cells directly, bypassing the selection.
    pub fn try_swap(&mut self, a: GridPosition, b: GridPosition) -> Result<(), SwapError> {
        if !self.input_enabled() {
            return Err(SwapError::InputLocked);
        }
        if !self.board.contains(a) || !self.board.contains(b) {
            return Err(SwapError::OutOfBounds);
        }
        if !self.board.swap(a, b) {
            return Err(SwapError::NotAdjacent);
        }
        self.board.deselect();
        self.on_player_swap(a, b);
        Ok(())
    }

    fn observe_selection(&mut self, selection: Selection) {
        if let Selection::Swapped(a, b) = selection {
            self.on_player_swap(a, b);
        }
    }

    fn on_player_swap(&mut self, a: GridPosition, b: GridPosition) {
        self.stats.record_swap();
        self.controller.notify_swap(a, b);
        self.awaiting_swap_result = true;
    }

    /// Advances motions by `dt` seconds and lets the controller take one step.
    pub fn tick(&mut self, dt: f32) -> SettleStep {
        self.board.advance_motions(dt);
        let step = self.controller.tick(&mut self.board, &mut self.factory);
        match &step {
            SettleStep::Cleared(pass) => {
                self.awaiting_swap_result = false;
                self.stats.record_pass(pass);
            }
            SettleStep::Reverted(..) => {
                self.awaiting_swap_result = false;
                self.stats.record_unproductive_swap();
            }
            SettleStep::Settled { .. } => {
                if self.awaiting_swap_result {
                    self.awaiting_swap_result = false;
                    self.stats.record_unproductive_swap();
                }
                self.ensure_playable();
            }
            SettleStep::Idle | SettleStep::Waiting => {}
        }
        step
    }

    /// Finishes every motion and runs the cascade until input is accepted.
    ///
    /// Returns `false` if the board is still settling after a bounded number
    /// of steps.
    pub fn settle_now(&mut self) -> bool {
        for _ in 0..MAX_SETTLE_STEPS {
            self.board.complete_all_motions();
            self.tick(0.0);
            if self.input_enabled() {
                return true;
            }
        }
        log::warn!("board did not settle within {MAX_SETTLE_STEPS} steps");
        false
    }

    /// Rearranges block types until a productive swap exists.
    fn ensure_playable(&mut self) {
        let detector = *self.controller.detector();
        if has_possible_swap(&self.board, &detector) {
            return;
        }
        log::debug!("no productive swap left, reshuffling");
        let mut kinds = self
            .board
            .positions()
            .map(|p| self.board.kind_at(p))
            .collect::<Vec<_>>();
        for attempt in 1..=MAX_SHUFFLES {
            if attempt > MAX_SHUFFLES / 2 {
                kinds.fill_with(|| self.factory.next_type());
            } else {
                self.factory.shuffle(&mut kinds);
            }
            self.board.reassign_kinds(kinds.iter().copied());
            self.stats.record_shuffle();
            if !detector.has_matches(&self.board) && has_possible_swap(&self.board, &detector) {
                log::debug!("reshuffled in {attempt} attempts");
                return;
            }
        }
        log::warn!("no playable arrangement after {MAX_SHUFFLES} reshuffles");
        if detector.has_matches(&self.board) {
            self.controller.begin_settle();
        }
    }
}

/// Fills a board so that no run reaches the threshold, rerolling the factory.
fn initial_board<F>(config: &BoardConfig, factory: &mut F) -> Result<Board, BoardConfigError>
where
    F: BlockFactory + ?Sized,
{
    let height = i32::from(config.height);
    let reach = i32::try_from(config.match_threshold.saturating_sub(1)).unwrap_or(i32::MAX);
    let mut placed: Vec<BlockType> =
        Vec::with_capacity(usize::from(config.width) * usize::from(config.height));

    Board::from_fn(config, |position| {
        // Cells are visited column by column, bottom to top
        let kind_at = |x: i32, y: i32| {
            if x < 0 || y < 0 {
                return BlockType::None;
            }
            usize::try_from(x * height + y)
                .ok()
                .and_then(|index| placed.get(index).copied())
                .unwrap_or_default()
        };
        let completes_run = |kind: BlockType| {
            let left = (1..=reach).all(|i| kind_at(position.x - i, position.y) == kind);
            let below = (1..=reach).all(|i| kind_at(position.x, position.y - i) == kind);
            left || below
        };

        let mut kind = factory.next_type();
        for _ in 0..MAX_REROLLS {
            if !completes_run(kind) {
                break;
            }
            kind = factory.next_type();
        }
        placed.push(kind);
        kind
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchDetector;

    const SEED: BlockSeed = BlockSeed::from_bytes([7; 16]);

    // Swapping (2, 0) up completes the middle row; swapping the top-left
    // pair clears nothing
    const LAYOUT: [&str; 3] = ["RGBYP", "GBYRR", "PYRGB"];

    #[test]
    fn test_initial_board_is_settled_and_playable() {
        for size in [6, 8, 10] {
            let config = BoardConfig::with_size(size, size);
            let session = GameSession::with_seed(&config, SEED).unwrap();
            let detector = MatchDetector::for_board(session.board());
            assert!(!detector.has_matches(session.board()));
            assert!(session.hint().is_some());
            assert!(session.input_enabled());
            assert!(session.board().is_static());
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        let config = BoardConfig::default();
        let a = GameSession::with_seed(&config, SEED).unwrap();
        let b = GameSession::with_seed(&config, SEED).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.seed(), SEED);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BoardConfig::with_size(0, 4);
        assert_eq!(
            GameSession::with_seed(&config, SEED).unwrap_err(),
            BoardConfigError::ZeroWidth
        );
    }

    #[test]
    fn test_try_swap_errors() {
        let mut session = GameSession::with_seed(&BoardConfig::default(), SEED).unwrap();
        let origin = GridPosition::new(0, 0);
        assert_eq!(
            session.try_swap(origin, GridPosition::new(-1, 0)),
            Err(SwapError::OutOfBounds)
        );
        assert_eq!(
            session.try_swap(origin, GridPosition::new(1, 1)),
            Err(SwapError::NotAdjacent)
        );
        assert_eq!(session.stats().swaps(), 0);

        session.try_swap(origin, GridPosition::new(1, 0)).unwrap();
        assert_eq!(
            session.try_swap(origin, GridPosition::new(1, 0)),
            Err(SwapError::InputLocked)
        );
        assert_eq!(session.select_at(origin), Selection::Ignored);
    }

    #[test]
    fn test_productive_swap_scores() {
        let mut session = GameSession::with_seed(&BoardConfig::default(), SEED).unwrap();
        let hint = session.hint().unwrap();
        assert_eq!(session.select_at(hint.from), Selection::Selected(hint.from));
        assert_eq!(
            session.select_at(hint.to),
            Selection::Swapped(hint.from, hint.to)
        );
        assert!(session.settle_now());
        let stats = session.stats();
        assert_eq!(stats.swaps(), 1);
        assert_eq!(stats.unproductive_swaps(), 0);
        assert!(stats.cleared_blocks() >= hint.matched);
        assert!(stats.score() >= 10 * hint.matched);
        assert!(session.board().is_consistent());
    }

    #[test]
    fn test_unproductive_swap_is_counted() {
        let board = Board::from_rows(&BoardConfig::default(), &LAYOUT).unwrap();
        let mut session = GameSession::from_board(board, SEED);
        session
            .try_swap(GridPosition::new(0, 2), GridPosition::new(1, 2))
            .unwrap();
        assert!(session.settle_now());
        assert_eq!(session.stats().swaps(), 1);
        assert_eq!(session.stats().unproductive_swaps(), 1);
        assert_eq!(session.stats().score(), 0);
    }

    #[test]
    fn test_unproductive_swap_reverts_when_configured() {
        let config = BoardConfig {
            revert_unmatched_swap: true,
            ..BoardConfig::default()
        };
        let board = Board::from_rows(&config, &LAYOUT).unwrap();
        let before = board.snapshot();
        let mut session = GameSession::from_board(board, SEED);
        session
            .try_swap(GridPosition::new(0, 2), GridPosition::new(1, 2))
            .unwrap();
        assert!(session.settle_now());
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.stats().unproductive_swaps(), 1);
    }

    #[test]
    fn test_input_waits_for_moving_blocks() {
        let mut board = Board::from_rows(&BoardConfig::default(), &LAYOUT).unwrap();
        assert!(board.swap(GridPosition::new(0, 2), GridPosition::new(1, 2)));
        let mut session = GameSession::from_board(board, SEED);
        assert!(session.controller().input_enabled());
        assert!(!session.input_enabled());

        let (a, b) = (GridPosition::new(3, 0), GridPosition::new(4, 0));
        assert_eq!(session.try_swap(a, b), Err(SwapError::InputLocked));
        assert_eq!(session.select_at(a), Selection::Ignored);
        assert_eq!(session.stats().swaps(), 0);

        assert_eq!(session.tick(10.0), SettleStep::Idle);
        assert!(session.input_enabled());
        assert_eq!(session.try_swap(a, b), Ok(()));
    }

    #[test]
    fn test_from_board_settles_existing_matches() {
        let board = Board::from_rows(&BoardConfig::default(), &["GBY", "RRR"]).unwrap();
        let mut session = GameSession::from_board(board, SEED);
        assert!(!session.input_enabled());
        assert!(session.settle_now());
        assert!(session.stats().cleared_blocks() >= 3);
        assert_eq!(session.stats().swaps(), 0);
        assert_eq!(session.stats().unproductive_swaps(), 0);
    }
}
