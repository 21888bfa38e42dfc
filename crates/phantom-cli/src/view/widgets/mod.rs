use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, key_binding_display::*, stats_display::*,
};

mod block_display;
mod board_display;
mod key_binding_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(220, 40, 40);
    pub const GREEN: Color = Color::Rgb(40, 200, 60);
    pub const BLUE: Color = Color::Rgb(40, 90, 230);
    pub const YELLOW: Color = Color::Rgb(240, 220, 40);
    pub const PURPLE: Color = Color::Rgb(160, 60, 220);
    pub const ORANGE: Color = Color::Rgb(255, 140, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::view::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);

    pub const RED_BLOCK: Style = fg_bg(color::WHITE, color::RED);
    pub const GREEN_BLOCK: Style = fg_bg(color::BLACK, color::GREEN);
    pub const BLUE_BLOCK: Style = fg_bg(color::WHITE, color::BLUE);
    pub const YELLOW_BLOCK: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const PURPLE_BLOCK: Style = fg_bg(color::WHITE, color::PURPLE);
    pub const ORANGE_BLOCK: Style = fg_bg(color::BLACK, color::ORANGE);

    pub const MARKER: Modifier = Modifier::BOLD;
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
