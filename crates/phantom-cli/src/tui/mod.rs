//! Minimal fixed-rate terminal loop on top of ratatui and crossterm.

pub use self::{app::App, event_loop::RenderMode, runner::Tui};

mod app;
mod event;
mod event_loop;
mod runner;
