use serde::{Deserialize, Serialize};

use super::{BlockType, GridPosition};

/// Instruction or notification queued for the presentation layer.
///
/// The board queues these as it changes; hosts drain them with
/// [`Board::drain_events`](super::Board::drain_events) and animate however
/// they like. Logical state has already changed by the time an event is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum BoardEvent {
    /// A new block was created at `position`, entering from `entry`.
    ///
    /// Initial fills use `entry == position` and no speed.
    Spawned {
        kind: BlockType,
        position: GridPosition,
        entry: GridPosition,
        speed: Option<f32>,
        delay: Option<f32>,
    },
    /// A block must travel from `from` to `to`.
    Moved {
        kind: BlockType,
        from: GridPosition,
        to: GridPosition,
        speed: f32,
        delay: Option<f32>,
    },
    /// A block was removed. The slot is already empty.
    Destroyed {
        kind: BlockType,
        position: GridPosition,
        vanish_speed: f32,
    },
    Selected(GridPosition),
    Deselected(GridPosition),
    Swapped(GridPosition, GridPosition),
    /// Block types were redistributed in place.
    Reshuffled,
}
