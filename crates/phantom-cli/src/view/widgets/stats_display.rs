use std::iter;

use phantom_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

/// Side panel with the session's score and counters.
pub struct StatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        34 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

type ValueFn = &'static dyn Fn(&GameSession) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    Label(&'static str),
    Value(ValueFn),
    LabelValue(&'static str, ValueFn),
}

const ROWS: &[Row] = &[
    Row::Label("SCORE:"),
    Row::Value(&|session| session.stats().score().to_string()),
    Row::Empty,
    Row::LabelValue("SWAPS:", &|session| session.stats().swaps().to_string()),
    Row::LabelValue("NO MATCH:", &|session| {
        session.stats().unproductive_swaps().to_string()
    }),
    Row::LabelValue("CLEARED:", &|session| {
        session.stats().cleared_blocks().to_string()
    }),
    Row::LabelValue("PASSES:", &|session| session.stats().passes().to_string()),
    Row::LabelValue("BEST CHAIN:", &|session| {
        session.stats().longest_chain().to_string()
    }),
    Row::LabelValue("SHUFFLES:", &|session| session.stats().shuffles().to_string()),
    Row::Empty,
    Row::LabelValue("STATUS:", &|session| {
        if session.input_enabled() {
            "READY".to_owned()
        } else {
            format!("CHAIN {}", session.controller().chain())
        }
    }),
    Row::Empty,
    Row::Label("SEED:"),
    Row::Value(&|session| session.seed().to_string()),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::Label(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::Value(value) => {
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] =
                        area.layout(&Layout::horizontal([Constraint::Fill(1); 2]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
