use phantom_engine::{Block, BlockType, Board, GridPosition};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{BlockDisplay, CellMarker};

/// Maps between board cells and terminal cells for a rendered board.
///
/// Row `0` of the board is drawn at the bottom of the grid area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    area: Rect,
    columns: i32,
    rows: i32,
}

impl BoardGeometry {
    pub fn new(area: Rect, columns: i32, rows: i32) -> Self {
        Self {
            area,
            columns,
            rows,
        }
    }

    /// Resolves a terminal cell to the board cell drawn there.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<GridPosition> {
        if !self.area.contains((column, row).into()) {
            return None;
        }
        let x = i32::from((column - self.area.x) / BlockDisplay::width());
        let from_top = i32::from((row - self.area.y) / BlockDisplay::height());
        let position = GridPosition::new(x, self.rows - 1 - from_top);
        ((0..self.columns).contains(&position.x) && (0..self.rows).contains(&position.y))
            .then_some(position)
    }

    /// Terminal area of a board cell, or `None` if it falls outside the grid.
    pub fn cell_rect(&self, position: GridPosition) -> Option<Rect> {
        if !(0..self.columns).contains(&position.x) || !(0..self.rows).contains(&position.y) {
            return None;
        }
        let x = u16::try_from(position.x)
            .ok()?
            .checked_mul(BlockDisplay::width())?;
        let y = u16::try_from(self.rows - 1 - position.y)
            .ok()?
            .checked_mul(BlockDisplay::height())?;
        let rect = Rect::new(
            self.area.x.checked_add(x)?,
            self.area.y.checked_add(y)?,
            BlockDisplay::width(),
            BlockDisplay::height(),
        );
        Some(rect.intersection(self.area)).filter(|r| !r.is_empty())
    }
}

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    markers: Vec<(GridPosition, CellMarker)>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            markers: Vec::new(),
            block: None,
        }
    }

    /// Adds a marker. Later markers are drawn over earlier ones.
    pub fn marker(mut self, position: GridPosition, marker: CellMarker) -> Self {
        self.markers.push((position, marker));
        self
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn grid_width(&self) -> u16 {
        u16::try_from(self.board.width())
            .unwrap_or(u16::MAX)
            .saturating_mul(BlockDisplay::width())
    }

    fn grid_height(&self) -> u16 {
        u16::try_from(self.board.height())
            .unwrap_or(u16::MAX)
            .saturating_mul(BlockDisplay::height())
    }

    pub fn width(&self) -> u16 {
        self.grid_width()
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        self.grid_height()
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }

    /// Where the grid lands when the widget is rendered into `area`.
    pub fn geometry(&self, area: Rect) -> BoardGeometry {
        let inner = self.block.inner_if_some(area);
        let grid = Rect::new(inner.x, inner.y, self.grid_width(), self.grid_height());
        BoardGeometry::new(
            grid.intersection(inner),
            self.board.width(),
            self.board.height(),
        )
    }

    /// Cell a block currently appears in, following its motion.
    #[expect(clippy::cast_possible_truncation)]
    fn displayed_position(block: &Block) -> GridPosition {
        match block.motion() {
            Some(motion) => {
                let (x, y) = motion.interpolated();
                GridPosition::new(x.round() as i32, y.round() as i32)
            }
            None => block.position(),
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let geometry = self.geometry(area);

        for y in 0..self.board.height() {
            for x in 0..self.board.width() {
                if let Some(rect) = geometry.cell_rect(GridPosition::new(x, y)) {
                    BlockDisplay::from_kind(BlockType::None).render(rect, buf);
                }
            }
        }
        for block in self.board.blocks() {
            let position = Self::displayed_position(block);
            if let Some(rect) = geometry.cell_rect(position) {
                BlockDisplay::from_kind(block.kind()).render(rect, buf);
            }
        }
        for &(position, marker) in &self.markers {
            if let Some(rect) = geometry.cell_rect(position) {
                BlockDisplay::from_kind(self.board.kind_at(position))
                    .marked(marker)
                    .render(rect, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use phantom_engine::BoardConfig;

    use super::*;

    fn geometry() -> BoardGeometry {
        // 4x3 board drawn at (10, 5), two terminal columns per cell
        BoardGeometry::new(Rect::new(10, 5, 8, 3), 4, 3)
    }

    #[test]
    fn test_cell_at_flips_rows() {
        let geometry = geometry();
        assert_eq!(geometry.cell_at(10, 5), Some(GridPosition::new(0, 2)));
        assert_eq!(geometry.cell_at(11, 5), Some(GridPosition::new(0, 2)));
        assert_eq!(geometry.cell_at(12, 7), Some(GridPosition::new(1, 0)));
        assert_eq!(geometry.cell_at(17, 6), Some(GridPosition::new(3, 1)));
    }

    #[test]
    fn test_cell_at_outside_is_none() {
        let geometry = geometry();
        assert_eq!(geometry.cell_at(9, 5), None);
        assert_eq!(geometry.cell_at(18, 5), None);
        assert_eq!(geometry.cell_at(10, 8), None);
        assert_eq!(geometry.cell_at(0, 0), None);
    }

    #[test]
    fn test_wide_board_saturates() {
        let board = Board::from_fn(&BoardConfig::with_size(40_000, 1), |_| BlockType::Red).unwrap();
        let display = BoardDisplay::new(&board).block(BlockWidget::bordered());
        assert_eq!(display.width(), u16::MAX);
        assert_eq!(display.height(), 3);

        let geometry = display.geometry(Rect::new(0, 0, 80, 3));
        assert_eq!(geometry.cell_rect(GridPosition::new(39_999, 0)), None);
        assert!(geometry.cell_rect(GridPosition::new(0, 0)).is_some());

        let geometry = BoardGeometry::new(Rect::new(0, 0, u16::MAX, 1), 40_000, 1);
        assert_eq!(geometry.cell_rect(GridPosition::new(39_999, 0)), None);
    }

    #[test]
    fn test_cell_rect_roundtrips() {
        let geometry = geometry();
        for y in 0..3 {
            for x in 0..4 {
                let position = GridPosition::new(x, y);
                let rect = geometry.cell_rect(position).unwrap();
                assert_eq!(rect.width, 2);
                assert_eq!(geometry.cell_at(rect.x, rect.y), Some(position));
            }
        }
        assert_eq!(geometry.cell_rect(GridPosition::new(0, 3)), None);
        assert_eq!(geometry.cell_rect(GridPosition::new(-1, 0)), None);
    }
}
