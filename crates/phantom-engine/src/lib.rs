pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum BoardConfigError {
    #[display("board width must be at least 1")]
    ZeroWidth,
    #[display("board height must be at least 1")]
    ZeroHeight,
    #[display("match threshold must be at least 2, got {threshold}")]
    ThresholdTooSmall { threshold: usize },
    #[display("match threshold {threshold} exceeds the longest board side ({max})")]
    ThresholdTooLarge { threshold: usize, max: usize },
    #[display("{name} must be a positive number of cells per second, got {value}")]
    NonPositiveSpeed { name: &'static str, value: f32 },
    #[display("spawn delay must not be negative, got {delay}")]
    NegativeDelay { delay: f32 },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum LayoutError {
    #[display("layout has no rows")]
    Empty,
    #[display("layout is larger than 65535 cells along one axis")]
    TooLarge,
    #[display("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("unknown block letter {letter:?} at column {column} of row {row}")]
    UnknownLetter {
        letter: char,
        column: usize,
        row: usize,
    },
    #[display("invalid board configuration: {_0}")]
    Config(BoardConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SwapError {
    #[display("cells are not orthogonal neighbours")]
    NotAdjacent,
    #[display("cell is outside the board")]
    OutOfBounds,
    #[display("input is locked until the board settles")]
    InputLocked,
}
