use clap::{Parser, Subcommand};

use self::{board_arg::BoardArg, play::PlayArg, simulate::SimulateArg};

mod board_arg;
mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Auto-play using hints and print a JSON report
    Simulate(#[clap(flatten)] SimulateArg),
}

impl Mode {
    /// Log filter used when `RUST_LOG` is unset.
    ///
    /// The terminal UI owns the screen, so it stays silent unless asked.
    fn default_log_filter(&self) -> &'static str {
        match self {
            Mode::Play(_) => "off",
            Mode::Simulate(_) => "warn",
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let mode = args.mode.unwrap_or(Mode::Play(PlayArg::default()));

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(mode.default_log_filter()),
    )
    .init();

    match mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
