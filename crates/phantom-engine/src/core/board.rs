use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BoardConfigError, LayoutError, engine::BlockFactory};

use super::{
    Block, BlockType, BoardConfig, BoardEvent, CoordinateResolver, Direction, GridPosition,
    Selection,
};

/// Read access to the tile types of a rectangular grid.
///
/// Match detection runs against this trait so that it can inspect a
/// hypothetical arrangement (for example a swap under consideration) without
/// mutating the real board.
pub trait TileGrid {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Type at `position`, or [`BlockType::None`] outside the grid.
    fn kind_at(&self, position: GridPosition) -> BlockType;

    fn contains(&self, position: GridPosition) -> bool {
        (0..self.width()).contains(&position.x) && (0..self.height()).contains(&position.y)
    }

    /// Iterates every in-range position, column by column, bottom to top.
    fn positions(&self) -> impl Iterator<Item = GridPosition> {
        let height = self.height();
        (0..self.width()).flat_map(move |x| (0..height).map(move |y| GridPosition::new(x, y)))
    }
}

/// The grid of blocks.
///
/// Every in-range slot holds exactly one [`Block`] whose own position equals
/// the slot's coordinate. Slots are only empty in the middle of a clear pass,
/// which always runs to completion before control returns to the caller.
///
/// All accessors are total: coordinates outside the grid read as
/// [`BlockType::None`] or no block, and writes to them are refused.
///
/// # Example
///
/// ```
/// use phantom_engine::{Board, BlockType, BoardConfig, GridPosition};
///
/// let mut board = Board::from_rows(
///     &BoardConfig::default(),
///     &["RGB",
///       "GBR"],
/// )
/// .unwrap();
///
/// assert_eq!(board.get(0, 1), BlockType::Red);
/// assert_eq!(board.get(0, 0), BlockType::Green);
/// assert_eq!(board.get(3, 0), BlockType::None);
///
/// assert!(board.swap(GridPosition::new(0, 0), GridPosition::new(1, 0)));
/// assert_eq!(board.get(0, 0), BlockType::Blue);
/// ```
#[derive(Debug, Clone)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<Option<Block>>,
    selected: Option<GridPosition>,
    config: BoardConfig,
    events: Vec<BoardEvent>,
}

impl Board {
    /// Creates a board filled by calling `factory` once per cell.
    pub fn new<F>(config: &BoardConfig, factory: &mut F) -> Result<Self, BoardConfigError>
    where
        F: BlockFactory + ?Sized,
    {
        Self::from_fn(config, |_| factory.next_type())
    }

    /// Creates a board whose cell types are chosen by `kind_at`.
    ///
    /// Cells are visited column by column, bottom to top. A `None` result is
    /// replaced by the first playable type, since real blocks are never `None`.
    pub fn from_fn<F>(config: &BoardConfig, mut kind_at: F) -> Result<Self, BoardConfigError>
    where
        F: FnMut(GridPosition) -> BlockType,
    {
        config.validate()?;
        let width = i32::from(config.width);
        let height = i32::from(config.height);
        let mut board = Self {
            width,
            height,
            cells: vec![None; usize::from(config.width) * usize::from(config.height)],
            selected: None,
            config: config.clone(),
            events: Vec::new(),
        };
        for position in board.positions().collect::<Vec<_>>() {
            let mut kind = kind_at(position);
            if kind.is_none() {
                kind = BlockType::PLAYABLE[0];
            }
            let index = board.index(position);
            board.cells[index] = Some(Block::new(kind, position));
            board.events.push(BoardEvent::Spawned {
                kind,
                position,
                entry: position,
                speed: None,
                delay: None,
            });
        }
        Ok(board)
    }

    /// Builds a board from rows of type letters (`R G B Y P O`), top row first.
    ///
    /// The board size comes from the layout; the rest of `config` is kept.
    #[expect(clippy::cast_sign_loss)]
    pub fn from_rows<S>(config: &BoardConfig, rows: &[S]) -> Result<Self, LayoutError>
    where
        S: AsRef<str>,
    {
        let grid = rows
            .iter()
            .map(|row| row.as_ref().chars().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let expected = grid.first().ok_or(LayoutError::Empty)?.len();
        for (row, cells) in grid.iter().enumerate() {
            if cells.len() != expected {
                return Err(LayoutError::RaggedRow {
                    row,
                    len: cells.len(),
                    expected,
                });
            }
            if let Some((column, &letter)) = cells
                .iter()
                .enumerate()
                .find(|(_, letter)| BlockType::from_letter(**letter).is_none())
            {
                return Err(LayoutError::UnknownLetter {
                    letter,
                    column,
                    row,
                });
            }
        }

        let config = BoardConfig {
            width: u16::try_from(expected).map_err(|_| LayoutError::TooLarge)?,
            height: u16::try_from(grid.len()).map_err(|_| LayoutError::TooLarge)?,
            ..config.clone()
        };
        let top = grid.len() - 1;
        Self::from_fn(&config, |position| {
            let row = &grid[top - position.y as usize];
            BlockType::from_letter(row[position.x as usize]).unwrap_or_default()
        })
        .map_err(LayoutError::Config)
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub fn contains(&self, position: GridPosition) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    #[expect(clippy::cast_sign_loss)]
    fn index(&self, position: GridPosition) -> usize {
        debug_assert!(self.contains(position));
        (position.y * self.width + position.x) as usize
    }

    fn slot(&self, position: GridPosition) -> Option<&Block> {
        if !self.contains(position) {
            return None;
        }
        self.cells[self.index(position)].as_ref()
    }

    fn slot_mut(&mut self, position: GridPosition) -> Option<&mut Block> {
        if !self.contains(position) {
            return None;
        }
        let index = self.index(position);
        self.cells[index].as_mut()
    }

    /// Type of the block at `(x, y)`, or [`BlockType::None`] outside the grid.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> BlockType {
        self.kind_at(GridPosition::new(x, y))
    }

    #[must_use]
    pub fn kind_at(&self, position: GridPosition) -> BlockType {
        self.slot(position).map_or(BlockType::None, Block::kind)
    }

    #[must_use]
    pub fn block(&self, x: i32, y: i32) -> Option<&Block> {
        self.slot(GridPosition::new(x, y))
    }

    #[must_use]
    pub fn block_at(&self, position: GridPosition) -> Option<&Block> {
        self.slot(position)
    }

    /// Stores `block` at `(x, y)`, re-stamping its position to that slot.
    ///
    /// Returns `false` and leaves the board untouched when `(x, y)` is outside
    /// the grid or the block has no type.
    pub fn set(&mut self, x: i32, y: i32, mut block: Block) -> bool {
        let position = GridPosition::new(x, y);
        if !self.contains(position) || block.kind().is_none() {
            return false;
        }
        block.set_position(position);
        let index = self.index(position);
        self.cells[index] = Some(block);
        true
    }

    /// Iterates the blocks currently on the board.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.cells.iter().flatten()
    }

    /// Returns `true` when no block has a pending transition.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.blocks().all(|block| !block.in_motion())
    }

    /// Returns `true` if every slot is filled by a block that knows its slot.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.positions()
            .all(|position| self.slot(position).is_some_and(|b| b.position() == position))
    }

    #[must_use]
    pub fn selected(&self) -> Option<GridPosition> {
        self.selected
    }

    /// Handles a pick coming from the host.
    ///
    /// With no selection, the resolved cell becomes selected. With a cell
    /// already selected, picking a neighbour swaps the two and clears the
    /// selection, picking the selected cell again deselects it, and picking
    /// any other cell is rejected. A pick that does not resolve to a cell on
    /// the board is ignored.
    pub fn select<W, R>(&mut self, resolver: &R, world: W) -> Selection
    where
        R: CoordinateResolver<W> + ?Sized,
    {
        match resolver.resolve(world) {
            Some(position) => self.select_at(position),
            None => Selection::Ignored,
        }
    }

    /// Like [`Self::select`], with an already resolved cell.
    ///
    /// A neighbour picked while blocks are still moving is rejected, since
    /// [`Self::swap`] refuses to run.
    pub fn select_at(&mut self, position: GridPosition) -> Selection {
        if !self.contains(position) {
            return Selection::Ignored;
        }
        match self.selected {
            None => {
                log::trace!("selected {position}");
                self.selected = Some(position);
                self.events.push(BoardEvent::Selected(position));
                Selection::Selected(position)
            }
            Some(current) if current == position => {
                self.deselect();
                Selection::Deselected(position)
            }
            Some(current) => {
                if self.swap(current, position) {
                    self.selected = None;
                    Selection::Swapped(current, position)
                } else {
                    Selection::Rejected(position)
                }
            }
        }
    }

    /// Commits a drag that started on the selected cell.
    ///
    /// Releasing over a neighbour swaps. Releasing over the selected cell (or
    /// off the board) keeps the selection, so a click behaves like a pick.
    /// Releasing anywhere else cancels the selection.
    pub fn drag_release<W, R>(&mut self, resolver: &R, world: W) -> Selection
    where
        R: CoordinateResolver<W> + ?Sized,
    {
        let Some(current) = self.selected else {
            return Selection::Ignored;
        };
        let Some(target) = resolver.resolve(world).filter(|p| self.contains(*p)) else {
            return Selection::Ignored;
        };
        if target == current {
            return Selection::Ignored;
        }
        if self.swap(current, target) {
            self.selected = None;
            return Selection::Swapped(current, target);
        }
        self.deselect();
        Selection::Deselected(current)
    }

    /// Clears the selection. Does nothing when nothing is selected.
    pub fn deselect(&mut self) {
        if let Some(position) = self.selected.take() {
            log::trace!("deselected {position}");
            self.events.push(BoardEvent::Deselected(position));
        }
    }

    /// Swaps two orthogonally adjacent blocks.
    ///
    /// Each block is re-stamped with its new slot and handed a move
    /// instruction. Returns `false` without touching the board when the cells
    /// are not 4-neighbours, either lies outside the grid, or any block on the
    /// board is still in motion.
    pub fn swap(&mut self, a: GridPosition, b: GridPosition) -> bool {
        if Direction::between(a, b).is_none()
            || self.slot(a).is_none()
            || self.slot(b).is_none()
            || !self.is_static()
        {
            return false;
        }
        let (ia, ib) = (self.index(a), self.index(b));
        self.cells.swap(ia, ib);

        let speed = self.config.swap_speed;
        for (to, from) in [(a, b), (b, a)] {
            if let Some(block) = self.slot_mut(to) {
                block.set_position(to);
                block.start_motion(from, speed, 0.0);
                let kind = block.kind();
                self.events.push(BoardEvent::Moved {
                    kind,
                    from,
                    to,
                    speed,
                    delay: None,
                });
            }
        }
        log::trace!("swapped {a} <-> {b}");
        self.events.push(BoardEvent::Swapped(a, b));
        true
    }

    /// Advances every pending motion by `dt` seconds.
    ///
    /// Hosts that animate with their own timing can call
    /// [`Self::complete_motion`] instead.
    pub fn advance_motions(&mut self, dt: f32) {
        for block in self.cells.iter_mut().flatten() {
            block.advance_motion(dt);
        }
    }

    /// Reports that the transition of the block at `position` has finished.
    pub fn complete_motion(&mut self, position: GridPosition) {
        if let Some(block) = self.slot_mut(position) {
            block.finish_motion();
        }
    }

    pub fn complete_all_motions(&mut self) {
        for block in self.cells.iter_mut().flatten() {
            block.finish_motion();
        }
    }

    /// Events queued since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = BoardEvent> + '_ {
        self.events.drain(..)
    }

    /// Removes the block at `position`, queueing its destruction.
    pub(crate) fn destroy(&mut self, position: GridPosition) -> Option<Block> {
        if !self.contains(position) {
            return None;
        }
        let index = self.index(position);
        let block = self.cells[index].take()?;
        self.events.push(BoardEvent::Destroyed {
            kind: block.kind(),
            position,
            vanish_speed: self.config.vanish_speed,
        });
        if self.selected == Some(position) {
            self.selected = None;
        }
        Some(block)
    }

    /// Moves the block at `from` into the empty slot `to` with a fall instruction.
    pub(crate) fn drop_block(&mut self, from: GridPosition, to: GridPosition) -> bool {
        if !self.contains(from) || !self.contains(to) || self.slot(to).is_some() {
            return false;
        }
        let from_index = self.index(from);
        let Some(mut block) = self.cells[from_index].take() else {
            return false;
        };
        let speed = self.config.fall_speed;
        block.set_position(to);
        block.start_motion(from, speed, 0.0);
        self.events.push(BoardEvent::Moved {
            kind: block.kind(),
            from,
            to,
            speed,
            delay: None,
        });
        let to_index = self.index(to);
        self.cells[to_index] = Some(block);
        true
    }

    /// Places a new block in the empty slot `position`, entering from `entry`.
    pub(crate) fn spawn(&mut self, position: GridPosition, kind: BlockType, entry: GridPosition) {
        if !self.contains(position) || self.slot(position).is_some() || kind.is_none() {
            return;
        }
        let speed = self.config.spawn_speed;
        let delay = self.config.spawn_delay;
        let mut block = Block::new(kind, position);
        block.start_motion(entry, speed, delay);
        self.events.push(BoardEvent::Spawned {
            kind,
            position,
            entry,
            speed: Some(speed),
            delay: (delay > 0.0).then_some(delay),
        });
        let index = self.index(position);
        self.cells[index] = Some(block);
    }

    /// Rewrites block types in place, visiting cells in [`TileGrid::positions`] order.
    pub(crate) fn reassign_kinds<I>(&mut self, kinds: I)
    where
        I: IntoIterator<Item = BlockType>,
    {
        let positions = self.positions().collect::<Vec<_>>();
        for (position, kind) in positions.into_iter().zip(kinds) {
            if let Some(block) = self.slot_mut(position) {
                block.set_kind(kind);
            }
        }
        self.events.push(BoardEvent::Reshuffled);
    }

    /// Serialisable copy of the block types.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let rows = (0..self.height)
            .rev()
            .map(|y| (0..self.width).map(|x| self.get(x, y).letter()).collect())
            .collect();
        BoardSnapshot {
            width: self.config.width,
            height: self.config.height,
            rows,
        }
    }
}

impl TileGrid for Board {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn kind_at(&self, position: GridPosition) -> BlockType {
        Self::kind_at(self, position)
    }

    fn contains(&self, position: GridPosition) -> bool {
        Self::contains(self, position)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

/// Block types of a board, one letter per cell, top row first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u16,
    pub height: u16,
    pub rows: Vec<String>,
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
