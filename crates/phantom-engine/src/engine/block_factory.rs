use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::BlockType;

/// Source of types for newly created blocks.
///
/// Closures work as factories, which keeps scripted tests short:
///
/// ```
/// use phantom_engine::{BlockFactory, BlockType};
///
/// let mut always_red = || BlockType::Red;
/// assert_eq!(always_red.next_type(), BlockType::Red);
/// ```
pub trait BlockFactory {
    /// Returns the type of the next block. Never [`BlockType::None`].
    fn next_type(&mut self) -> BlockType;

    /// Reorders `kinds` in place. The default keeps the order.
    fn shuffle(&mut self, kinds: &mut [BlockType]) {
        let _ = kinds;
    }
}

impl<F> BlockFactory for F
where
    F: FnMut() -> BlockType,
{
    fn next_type(&mut self) -> BlockType {
        self()
    }
}

/// Draws block types uniformly from a palette using a seeded generator.
///
/// # Example
///
/// ```
/// use phantom_engine::{BlockFactory, BlockSeed, RandomBlockFactory};
/// use rand::Rng as _;
///
/// let seed: BlockSeed = rand::rng().random();
/// let mut a = RandomBlockFactory::with_seed(seed);
/// let mut b = RandomBlockFactory::with_seed(seed);
/// for _ in 0..16 {
///     assert_eq!(a.next_type(), b.next_type());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RandomBlockFactory {
    rng: Pcg32,
    palette: Vec<BlockType>,
}

impl Default for RandomBlockFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomBlockFactory {
    /// Creates a factory over every playable type with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: BlockSeed) -> Self {
        Self::with_palette(seed, &BlockType::PLAYABLE)
    }

    /// Like [`Self::with_seed`], restricted to `palette`.
    ///
    /// `None` entries and duplicates are dropped. An empty palette falls back
    /// to every playable type.
    #[must_use]
    pub fn with_palette(seed: BlockSeed, palette: &[BlockType]) -> Self {
        let mut kinds = Vec::with_capacity(palette.len());
        for &kind in palette {
            if !kind.is_none() && !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            kinds.extend_from_slice(&BlockType::PLAYABLE);
        }
        Self {
            rng: Pcg32::from_seed(seed.0),
            palette: kinds,
        }
    }

    #[must_use]
    pub fn palette(&self) -> &[BlockType] {
        &self.palette
    }
}

impl BlockFactory for RandomBlockFactory {
    fn next_type(&mut self) -> BlockType {
        let index = self.rng.random_range(0..self.palette.len());
        self.palette[index]
    }

    fn shuffle(&mut self, kinds: &mut [BlockType]) {
        kinds.shuffle(&mut self.rng);
    }
}

/// 128-bit seed for deterministic block generation.
///
/// Serialised as a 32-character hex string so it can be written to reports
/// and passed back on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSeed([u8; 16]);

impl BlockSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    #[display("invalid hex: expected 32 characters, got {len}")]
    Length { len: usize },
    #[display("invalid hex: {text}")]
    Digits { text: String },
}

impl fmt::Display for BlockSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for BlockSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(SeedParseError::Length { len: s.len() });
        }
        // from_str_radix accepts a leading sign
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SeedParseError::Digits { text: s.to_owned() });
        }
        let num = u128::from_str_radix(s, 16)
            .map_err(|_| SeedParseError::Digits { text: s.to_owned() })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for BlockSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<BlockSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BlockSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        BlockSeed(seed)
    }
}
