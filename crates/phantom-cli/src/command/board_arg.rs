use std::path::PathBuf;

use anyhow::Context as _;
use phantom_engine::{BlockSeed, BoardConfig, GameSession};
use rand::Rng as _;

use crate::util;

/// Board options shared by every mode.
///
/// Flags override values read from `--config`.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BoardArg {
    /// Board configuration file (JSON)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of columns
    #[clap(long)]
    width: Option<u16>,
    /// Number of rows
    #[clap(long)]
    height: Option<u16>,
    /// Minimum run length that clears
    #[clap(long)]
    threshold: Option<usize>,
    /// Swap the pair back when a swap clears nothing
    #[clap(long)]
    revert_unmatched: bool,
    /// Seed for block generation (32 hex digits)
    #[clap(long)]
    seed: Option<BlockSeed>,
}

impl BoardArg {
    pub(crate) fn board_config(&self) -> anyhow::Result<BoardConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_board_config_file(path)?,
            None => BoardConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(threshold) = self.threshold {
            config.match_threshold = threshold;
        }
        if self.revert_unmatched {
            config.revert_unmatched_swap = true;
        }
        config.validate().context("Invalid board configuration")?;
        Ok(config)
    }

    /// The `--seed` value, or a fresh random seed.
    pub(crate) fn seed(&self) -> BlockSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    pub(crate) fn new_session(&self) -> anyhow::Result<GameSession> {
        let config = self.board_config()?;
        let seed = self.seed();
        let session = GameSession::with_seed(&config, seed)
            .with_context(|| format!("Failed to create a board with seed {seed}"))?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[clap(flatten)]
        board: BoardArg,
    }

    fn parse(args: &[&str]) -> BoardArg {
        TestArgs::try_parse_from(std::iter::once("phantom").chain(args.iter().copied()))
            .unwrap()
            .board
    }

    #[test]
    fn test_flags_override_defaults() {
        let arg = parse(&["--width", "6", "--threshold", "4", "--revert-unmatched"]);
        let config = arg.board_config().unwrap();
        assert_eq!(config.width, 6);
        assert_eq!(config.height, BoardConfig::default().height);
        assert_eq!(config.match_threshold, 4);
        assert!(config.revert_unmatched_swap);
    }

    #[test]
    fn test_invalid_size_is_reported() {
        let arg = parse(&["--height", "0"]);
        let err = arg.board_config().unwrap_err();
        assert!(format!("{err:#}").contains("board height must be at least 1"));
    }

    #[test]
    fn test_seed_is_parsed() {
        let arg = parse(&["--seed", "0123456789abcdeffedcba9876543210"]);
        assert_eq!(arg.seed().to_string(), "0123456789abcdeffedcba9876543210");
        assert!(
            TestArgs::try_parse_from(["phantom", "--seed", "xyz"]).is_err(),
            "short seeds must be rejected"
        );
    }

    #[test]
    fn test_missing_config_file() {
        let arg = parse(&["--config", "/nonexistent/phantom-board.json"]);
        let err = arg.board_config().unwrap_err();
        assert!(err.to_string().contains("Failed to open board config file"));
    }
}
