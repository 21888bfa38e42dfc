use serde::{Deserialize, Serialize};

use super::PassReport;

/// Points awarded per cleared block, multiplied by the chain depth.
pub const SCORE_PER_BLOCK: usize = 10;

/// Running totals for a game session.
///
/// A pass at chain depth `n` that clears `k` blocks scores
/// `SCORE_PER_BLOCK * k * n`, so cascades are worth more than the swap that
/// started them.
///
/// # Example
///
/// ```
/// use phantom_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_swap();
/// stats.record_clear(1, 3);
/// stats.record_clear(2, 4);
///
/// assert_eq!(stats.score(), 30 + 80);
/// assert_eq!(stats.cleared_blocks(), 7);
/// assert_eq!(stats.longest_chain(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    swaps: usize,
    unproductive_swaps: usize,
    cleared_blocks: usize,
    passes: usize,
    longest_chain: usize,
    shuffles: usize,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            swaps: 0,
            unproductive_swaps: 0,
            cleared_blocks: 0,
            passes: 0,
            longest_chain: 0,
            shuffles: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Player swaps committed, productive or not.
    #[must_use]
    pub const fn swaps(&self) -> usize {
        self.swaps
    }

    /// Player swaps that cleared nothing.
    #[must_use]
    pub const fn unproductive_swaps(&self) -> usize {
        self.unproductive_swaps
    }

    #[must_use]
    pub const fn cleared_blocks(&self) -> usize {
        self.cleared_blocks
    }

    /// Clear passes over the whole session.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }

    #[must_use]
    pub const fn longest_chain(&self) -> usize {
        self.longest_chain
    }

    /// Times the board was reshuffled because no swap was possible.
    #[must_use]
    pub const fn shuffles(&self) -> usize {
        self.shuffles
    }

    pub const fn record_swap(&mut self) {
        self.swaps += 1;
    }

    pub const fn record_unproductive_swap(&mut self) {
        self.unproductive_swaps += 1;
    }

    /// Adds a clear pass of `cleared` blocks at chain depth `chain`.
    pub fn record_clear(&mut self, chain: usize, cleared: usize) {
        self.passes += 1;
        self.cleared_blocks += cleared;
        self.longest_chain = self.longest_chain.max(chain);
        self.score += SCORE_PER_BLOCK * cleared * chain.max(1);
    }

    pub fn record_pass(&mut self, pass: &PassReport) {
        self.record_clear(pass.chain, pass.cleared);
    }

    pub const fn record_shuffle(&mut self) {
        self.shuffles += 1;
    }
}
