use serde::{Deserialize, Serialize};

use crate::BoardConfigError;

/// Board dimensions, match rule and animation speeds.
///
/// Speeds are in cells per second and only feed the [`Motion`](super::Motion)
/// values and [`BoardEvent`](super::BoardEvent)s handed to the host.
///
/// Missing fields fall back to [`BoardConfig::default`] when deserialising, so a
/// config file only needs to name what it changes:
///
/// ```
/// use phantom_engine::BoardConfig;
///
/// let config: BoardConfig = serde_json::from_str(r#"{ "width": 6 }"#).unwrap();
/// assert_eq!(config.width, 6);
/// assert_eq!(config.height, BoardConfig::default().height);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: u16,
    pub height: u16,
    /// Minimum run length that counts as a match.
    pub match_threshold: usize,
    pub swap_speed: f32,
    pub fall_speed: f32,
    pub spawn_speed: f32,
    pub vanish_speed: f32,
    /// Seconds a freshly spawned block waits before entering the board.
    pub spawn_delay: f32,
    /// Swap the pair back when a player swap produces no match.
    pub revert_unmatched_swap: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            match_threshold: 3,
            swap_speed: 4.0,
            fall_speed: 8.0,
            spawn_speed: 8.0,
            vanish_speed: 5.0,
            spawn_delay: 0.0,
            revert_unmatched_swap: false,
        }
    }
}

impl BoardConfig {
    #[must_use]
    pub fn with_size(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), BoardConfigError> {
        if self.width == 0 {
            return Err(BoardConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(BoardConfigError::ZeroHeight);
        }
        if self.match_threshold < 2 {
            return Err(BoardConfigError::ThresholdTooSmall {
                threshold: self.match_threshold,
            });
        }
        let max = usize::from(self.width.max(self.height));
        if self.match_threshold > max {
            return Err(BoardConfigError::ThresholdTooLarge {
                threshold: self.match_threshold,
                max,
            });
        }
        for (name, value) in [
            ("swap speed", self.swap_speed),
            ("fall speed", self.fall_speed),
            ("spawn speed", self.spawn_speed),
            ("vanish speed", self.vanish_speed),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(BoardConfigError::NonPositiveSpeed { name, value });
            }
        }
        if self.spawn_delay.is_nan() || self.spawn_delay < 0.0 {
            return Err(BoardConfigError::NegativeDelay {
                delay: self.spawn_delay,
            });
        }
        Ok(())
    }
}
