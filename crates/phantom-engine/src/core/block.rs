use serde::{Deserialize, Serialize};

use super::{BlockType, GridPosition, Motion};

/// Logical state of a single tile.
///
/// A block records the slot it occupies. The [`Board`](super::Board) keeps
/// that coordinate and the slot index in lock-step; blocks are only
/// repositioned through board operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    kind: BlockType,
    position: GridPosition,
    motion: Option<Motion>,
}

impl Block {
    #[must_use]
    pub fn new(kind: BlockType, position: GridPosition) -> Self {
        Self {
            kind,
            position,
            motion: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> BlockType {
        self.kind
    }

    #[must_use]
    pub fn position(&self) -> GridPosition {
        self.position
    }

    #[must_use]
    pub fn motion(&self) -> Option<&Motion> {
        self.motion.as_ref()
    }

    /// Returns `true` while a visual transition is still pending.
    #[must_use]
    pub fn in_motion(&self) -> bool {
        self.motion.is_some()
    }

    pub(crate) fn set_kind(&mut self, kind: BlockType) {
        self.kind = kind;
    }

    pub(crate) fn set_position(&mut self, position: GridPosition) {
        self.position = position;
    }

    /// Starts a move from `from` to the block's current position.
    pub(crate) fn start_motion(&mut self, from: GridPosition, speed: f32, delay: f32) {
        self.motion = Some(Motion::new(from, self.position, speed, delay));
    }

    /// Marks the pending transition as done.
    pub fn finish_motion(&mut self) {
        self.motion = None;
    }

    /// Advances the pending transition, dropping it once finished.
    pub fn advance_motion(&mut self, dt: f32) {
        if let Some(motion) = &mut self.motion
            && motion.advance(dt)
        {
            self.motion = None;
        }
    }
}
