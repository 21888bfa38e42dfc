use serde::{Deserialize, Serialize};

/// Tile category of a block.
///
/// [`BlockType::None`] is a sentinel: it is never assigned to a block on the
/// board. Queries outside the grid (and empty slots during a clear pass)
/// report it, and it never matches anything, including itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    None,
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl BlockType {
    /// Number of playable (non-sentinel) types.
    pub const LEN: usize = 6;

    /// All playable types, in declaration order.
    pub const PLAYABLE: [Self; Self::LEN] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Purple,
        Self::Orange,
    ];

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if a block of this type extends a run of `other`.
    ///
    /// `None` matches nothing, so out-of-range neighbours never extend a run.
    #[must_use]
    pub fn matches(self, other: Self) -> bool {
        !self.is_none() && self == other
    }

    /// Single-letter code used by board layouts and text rendering.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::None => '.',
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Blue => 'B',
            Self::Yellow => 'Y',
            Self::Purple => 'P',
            Self::Orange => 'O',
        }
    }

    /// Parses a layout letter. `.` and unknown letters yield `None`.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        Self::PLAYABLE
            .into_iter()
            .find(|kind| kind.letter() == letter.to_ascii_uppercase())
    }
}
