use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// An application driven by [`Tui::run`].
pub trait App {
    /// Called once before the loop starts. Configure rates here.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Key, mouse and resize events.
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the simulation by one tick.
    fn update(&mut self, tui: &mut Tui);
}
