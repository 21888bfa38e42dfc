use std::path::PathBuf;

use chrono::{DateTime, Utc};
use phantom_engine::{BlockSeed, BoardConfig, BoardSnapshot, GameSession, GameStats};
use serde::Serialize;

use crate::{command::BoardArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    board: BoardArg,
    /// Number of swaps to play
    #[clap(long, default_value_t = 100)]
    moves: usize,
    /// Output file path (JSON). Prints to stdout when omitted
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    generated_at: DateTime<Utc>,
    seed: BlockSeed,
    config: BoardConfig,
    moves_played: usize,
    events: usize,
    stats: GameStats,
    final_board: BoardSnapshot,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        board,
        moves,
        output,
    } = arg;

    let mut session = board.new_session()?;
    log::info!("simulating {moves} moves with seed {}", session.seed());

    let (moves_played, events) = play(&mut session, *moves);
    if moves_played < *moves {
        log::warn!("stopped after {moves_played} of {moves} moves");
    }

    let report = SimulationReport {
        generated_at: Utc::now(),
        seed: session.seed(),
        config: session.config().clone(),
        moves_played,
        events,
        stats: session.stats().clone(),
        final_board: session.snapshot(),
    };
    Output::save_json(&report, output.as_deref())?;
    Ok(())
}

/// Plays the best hinted swap up to `moves` times, settling after each one.
///
/// Returns the swaps played and the board events produced.
fn play(session: &mut GameSession, moves: usize) -> (usize, usize) {
    let mut events = session.drain_events().count();
    for played in 0..moves {
        let Some(hint) = session.hint() else {
            log::warn!("no productive swap on the board");
            return (played, events);
        };
        if let Err(err) = session.try_swap(hint.from, hint.to) {
            log::warn!("swap {} <-> {} failed: {err}", hint.from, hint.to);
            return (played, events);
        }
        let settled = session.settle_now();
        events += session.drain_events().count();
        log::debug!(
            "move {}: {} <-> {}, score {}",
            played + 1,
            hint.from,
            hint.to,
            session.stats().score()
        );
        if !settled {
            return (played + 1, events);
        }
    }
    (moves, events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_is_reproducible() {
        let config = BoardConfig::default();
        let seed = BlockSeed::from_bytes([42; 16]);

        let mut a = GameSession::with_seed(&config, seed).unwrap();
        let mut b = GameSession::with_seed(&config, seed).unwrap();
        assert_eq!(play(&mut a, 20), play(&mut b, 20));
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_every_move_scores() {
        let mut session =
            GameSession::with_seed(&BoardConfig::default(), BlockSeed::from_bytes([3; 16]))
                .unwrap();
        let (played, events) = play(&mut session, 10);
        assert_eq!(played, 10);
        assert!(events > 0);
        let stats = session.stats();
        assert_eq!(stats.swaps(), 10);
        assert_eq!(stats.unproductive_swaps(), 0);
        assert!(stats.score() >= 10 * 30);
        assert!(session.board().is_consistent());
    }

    #[test]
    fn test_report_serializes() {
        let session =
            GameSession::with_seed(&BoardConfig::with_size(5, 4), BlockSeed::from_bytes([1; 16]))
                .unwrap();
        let report = SimulationReport {
            generated_at: Utc::now(),
            seed: session.seed(),
            config: session.config().clone(),
            moves_played: 0,
            events: 0,
            stats: session.stats().clone(),
            final_board: session.snapshot(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["seed"], "01010101010101010101010101010101");
        assert_eq!(value["config"]["width"], 5);
        assert_eq!(value["final_board"]["rows"].as_array().unwrap().len(), 4);
    }
}
