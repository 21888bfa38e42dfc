use std::{io, time::Duration};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use ratatui::DefaultTerminal;

use crate::tui::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Runs an [`App`] in the alternate screen until it asks to exit.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
    mouse_capture: bool,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate in ticks per second.
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Reports mouse clicks and drags as terminal events.
    pub fn set_mouse_capture(&mut self, enabled: bool) {
        self.mouse_capture = enabled;
    }

    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            if self.mouse_capture {
                execute!(io::stdout(), EnableMouseCapture)?;
            }
            let result = self.event_loop(app, terminal);
            if self.mouse_capture {
                execute!(io::stdout(), DisableMouseCapture)?;
            }
            result
        })
    }

    fn event_loop<A>(&mut self, app: &mut A, terminal: &mut DefaultTerminal) -> anyhow::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick => app.update(self),
                TuiEvent::Render => {
                    terminal.draw(|frame| app.draw(frame))?;
                }
                TuiEvent::Crossterm(event) => app.handle_event(self, event),
            }
        }
        Ok(())
    }
}
