//! Match resolution and game flow on top of the [`Board`](crate::Board).
//!
//! - [`MatchDetector`] - finds runs of same-typed blocks
//! - [`GravityResolver`] - clears matches, compacts columns and refills them
//! - [`CascadeController`] - repeats detection and clearing until the board is stable
//! - [`BlockFactory`] / [`RandomBlockFactory`] - types for new blocks, seeded by [`BlockSeed`]
//! - [`GameSession`] - board, controller and [`GameStats`] wired together
//!
//! # Settle flow
//!
//! 1. A player swap marks the controller as settling and locks input
//! 2. Each host tick advances block motions and calls the controller
//! 3. Once no block is in motion, matches are cleared and columns refilled
//! 4. The new blocks fall in; when they land the board is checked again
//! 5. A pass without matches ends the cascade and re-enables input
//!
//! # Example
//!
//! ```
//! use phantom_engine::{BoardConfig, GameSession, SettleStep};
//!
//! let mut session = GameSession::new(&BoardConfig::with_size(6, 6)).unwrap();
//! if let Some(hint) = session.hint() {
//!     session.try_swap(hint.from, hint.to).unwrap();
//! }
//!
//! // Drive the cascade at 60 ticks per second
//! for _ in 0..600 {
//!     if let SettleStep::Settled { chain } = session.tick(1.0 / 60.0) {
//!         println!("settled after {chain} passes");
//!     }
//!     if session.input_enabled() {
//!         break;
//!     }
//! }
//! ```

pub use self::{
    block_factory::*, cascade::*, game_session::*, game_stats::*, gravity::*, hint::*, matcher::*,
};

mod block_factory;
mod cascade;
mod game_session;
mod game_stats;
mod gravity;
mod hint;
mod matcher;
