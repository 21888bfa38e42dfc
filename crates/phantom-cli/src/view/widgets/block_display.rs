use phantom_engine::BlockType;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::style;

/// One board cell, two terminal columns wide.
#[derive(Debug, Clone, Copy)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

/// Overlay drawn on top of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMarker {
    Cursor,
    Selected,
    Hint,
}

impl CellMarker {
    const fn symbol(self) -> &'static str {
        match self {
            CellMarker::Cursor => "<>",
            CellMarker::Selected => "[]",
            CellMarker::Hint => "!!",
        }
    }
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn width() -> u16 {
        2
    }

    pub const fn height() -> u16 {
        1
    }

    pub const fn from_kind(kind: BlockType) -> Self {
        let style = match kind {
            BlockType::None => return Self::new(style::EMPTY_DOT, "."),
            BlockType::Red => style::RED_BLOCK,
            BlockType::Green => style::GREEN_BLOCK,
            BlockType::Blue => style::BLUE_BLOCK,
            BlockType::Yellow => style::YELLOW_BLOCK,
            BlockType::Purple => style::PURPLE_BLOCK,
            BlockType::Orange => style::ORANGE_BLOCK,
        };
        Self::new(style, "")
    }

    #[must_use]
    pub fn marked(self, marker: CellMarker) -> Self {
        Self {
            style: self.style.add_modifier(style::MARKER),
            symbol: marker.symbol(),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph paints the background of the whole area, not only the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
