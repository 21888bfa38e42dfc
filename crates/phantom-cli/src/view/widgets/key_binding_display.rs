use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Paragraph, Widget, Wrap},
};

/// Keys that trigger an action, and what the action does.
pub type KeyBinding<'a> = (&'a [&'a str], &'a str);

/// Footer listing the active key bindings, wrapped to the available width.
#[derive(Debug)]
pub struct KeyBindingDisplay<'a> {
    bindings: &'a [KeyBinding<'a>],
    block: Option<BlockWidget<'a>>,
}

const KEY: Style = Style::new().fg(Color::Cyan);
const SEPARATOR: Style = Style::new().fg(Color::DarkGray);
const DESCRIPTION: Style = Style::new().fg(Color::White);

impl<'a> KeyBindingDisplay<'a> {
    pub fn new(bindings: &'a [KeyBinding<'a>]) -> Self {
        Self {
            bindings,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn height(&self) -> u16 {
        1 + super::block_vertical_margin(self.block.as_ref())
    }

    fn spans(&self) -> Vec<Span<'a>> {
        let mut spans = vec![];
        for (i, &(keys, description)) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", SEPARATOR));
            }
            let keys = keys.iter().copied().map(|key| Span::styled(key, KEY));
            spans.extend(join_spans(keys, Span::styled("/", SEPARATOR)));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(description, DESCRIPTION));
        }
        spans
    }
}

fn join_spans<'a>(
    items: impl Iterator<Item = Span<'a>>,
    separator: Span<'a>,
) -> impl Iterator<Item = Span<'a>> {
    items.enumerate().flat_map(move |(i, item)| {
        let separator = (i > 0).then(|| separator.clone());
        separator.into_iter().chain([item])
    })
}

impl Widget for KeyBindingDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        Paragraph::new(Line::from(self.spans()))
            .centered()
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
