use std::cell::Cell;

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use phantom_engine::{BoardEvent, Direction, GameSession, GridPosition, SettleStep, SwapHint};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    widgets::{Block, Borders},
};

use crate::{
    tui::{App, RenderMode, Tui},
    view::widgets::{
        BoardDisplay, BoardGeometry, CellMarker, KeyBinding, KeyBindingDisplay, StatsDisplay,
    },
};

const FPS: f64 = 60.0;

#[expect(clippy::cast_possible_truncation)]
const TICK: f32 = (1.0 / FPS) as f32;

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→", "↑", "↓"], "Move"),
    (&["Space", "Enter"], "Select"),
    (&["Esc"], "Cancel"),
    (&["H"], "Hint"),
    (&["P"], "Pause"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["P"], "Resume"), (&["Q"], "Quit")];

#[derive(Debug)]
pub(super) struct PlayApp {
    session: GameSession,
    cursor: GridPosition,
    hint: Option<SwapHint>,
    auto_hint: bool,
    is_paused: bool,
    is_exiting: bool,
    /// The last mouse press picked a non-neighbour; its release is not a drag.
    press_rejected: bool,
    /// Where the board was drawn last frame, for mouse picks.
    geometry: Cell<Option<BoardGeometry>>,
}

impl PlayApp {
    pub(super) fn new(session: GameSession, auto_hint: bool) -> Self {
        let mut app = Self {
            session,
            cursor: GridPosition::new(0, 0),
            hint: None,
            auto_hint,
            is_paused: false,
            is_exiting: false,
            press_rejected: false,
            geometry: Cell::new(None),
        };
        app.refresh_hint();
        app
    }

    pub(super) fn session(&self) -> &GameSession {
        &self.session
    }

    fn refresh_hint(&mut self) {
        self.hint = if self.auto_hint && self.session.input_enabled() {
            self.session.hint()
        } else {
            None
        };
    }

    fn move_cursor(&mut self, direction: Direction) {
        let next = self.cursor.step(direction);
        if self.session.board().contains(next) {
            self.cursor = next;
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let is_playing = !self.is_paused;
        match code {
            KeyCode::Left if is_playing => self.move_cursor(Direction::Left),
            KeyCode::Right if is_playing => self.move_cursor(Direction::Right),
            KeyCode::Up if is_playing => self.move_cursor(Direction::Up),
            KeyCode::Down if is_playing => self.move_cursor(Direction::Down),
            KeyCode::Char(' ') | KeyCode::Enter if is_playing => {
                let selection = self.session.select_at(self.cursor);
                log::debug!("cursor pick at {}: {selection:?}", self.cursor);
            }
            KeyCode::Esc if is_playing => self.session.deselect(),
            KeyCode::Char('h') if is_playing && self.session.input_enabled() => {
                self.hint = self.session.hint();
            }
            KeyCode::Char('p') => self.is_paused = !self.is_paused,
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.is_paused {
            return;
        }
        let geometry = self.geometry.get();
        let resolver = |(column, row): (u16, u16)| geometry.and_then(|g| g.cell_at(column, row));
        let pick = (mouse.column, mouse.row);
        let selection = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let selection = self.session.select(&resolver, pick);
                self.press_rejected = selection.is_rejected();
                selection
            }
            MouseEventKind::Up(MouseButton::Left) if self.press_rejected => {
                self.press_rejected = false;
                return;
            }
            MouseEventKind::Up(MouseButton::Left) => self.session.drag_release(&resolver, pick),
            _ => return,
        };
        if let Some(position) = resolver(pick) {
            self.cursor = position;
        }
        log::debug!("mouse pick at {pick:?}: {selection:?}");
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
        tui.set_render_mode(RenderMode::throttled_from_rate(FPS));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let mut board = BoardDisplay::new(self.session.board())
            .block(Block::bordered().title(if self.is_paused { " PAUSED " } else { " BOARD " }));
        if let Some(hint) = self.hint {
            board = board
                .marker(hint.from, CellMarker::Hint)
                .marker(hint.to, CellMarker::Hint);
        }
        if let Some(selected) = self.session.selected() {
            board = board.marker(selected, CellMarker::Selected);
        }
        board = board.marker(self.cursor, CellMarker::Cursor);

        let stats = StatsDisplay::new(&self.session).block(Block::bordered().title(" STATS "));
        let keys = KeyBindingDisplay::new(if self.is_paused {
            PAUSED_KEYS
        } else {
            PLAYING_KEYS
        })
        .block(Block::new().borders(Borders::TOP));

        let [main_area, keys_area] = Layout::vertical([
            Constraint::Length(board.height().max(stats.height())),
            Constraint::Length(keys.height()),
        ])
        .flex(Flex::Center)
        .areas(frame.area());
        let [board_area, stats_area] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);

        self.geometry.set(Some(board.geometry(board_area)));
        frame.render_widget(board, board_area);
        frame.render_widget(stats, stats_area);
        frame.render_widget(keys, keys_area);
    }

    fn update(&mut self, _tui: &mut Tui) {
        if self.is_paused {
            return;
        }
        match self.session.tick(TICK) {
            SettleStep::Settled { chain } => {
                log::debug!("board settled after {chain} passes");
                self.refresh_hint();
            }
            SettleStep::Reverted(a, b) => log::debug!("swap {a} <-> {b} reverted"),
            _ => {}
        }
        let mut swapped = false;
        for event in self.session.drain_events() {
            swapped |= event.is_swapped();
            log::trace!("{event:?}");
        }
        if swapped {
            self.hint = None;
        }
    }
}
