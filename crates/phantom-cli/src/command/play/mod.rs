use crate::{
    command::{BoardArg, play::app::PlayApp},
    tui::Tui,
};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    board: BoardArg,
    /// Start with the best swap highlighted
    #[clap(long)]
    show_hint: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { board, show_hint } = arg;

    let session = board.new_session()?;
    log::info!("starting session with seed {}", session.seed());

    let mut app = PlayApp::new(session, *show_hint);
    let mut tui = Tui::new();
    tui.set_mouse_capture(true);
    tui.run(&mut app)?;

    let stats = app.session().stats();
    println!(
        "score {} in {} swaps (seed {})",
        stats.score(),
        stats.swaps(),
        app.session().seed()
    );
    Ok(())
}
