use serde::{Deserialize, Serialize};

use super::GridPosition;

/// Animation state of a block travelling between two cells.
///
/// The board attaches a `Motion` whenever it issues a move (swap, fall or
/// spawn). The host advances it from its own tick; the simulation only looks
/// at whether a motion is still attached.
///
/// # Example
///
/// ```
/// use phantom_engine::{GridPosition, Motion};
///
/// let mut motion = Motion::new(GridPosition::new(0, 4), GridPosition::new(0, 2), 4.0, 0.0);
/// assert!(!motion.advance(0.25));
/// assert_eq!(motion.interpolated(), (0.0, 3.0));
/// assert!(motion.advance(0.25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    from: GridPosition,
    to: GridPosition,
    /// Cells per second.
    speed: f32,
    /// Seconds to wait before starting.
    delay: f32,
    elapsed: f32,
}

impl Motion {
    #[must_use]
    pub fn new(from: GridPosition, to: GridPosition, speed: f32, delay: f32) -> Self {
        Self {
            from,
            to,
            speed,
            delay: delay.max(0.0),
            elapsed: 0.0,
        }
    }

    #[must_use]
    pub fn origin(&self) -> GridPosition {
        self.from
    }

    #[must_use]
    pub fn target(&self) -> GridPosition {
        self.to
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[must_use]
    pub fn delay(&self) -> f32 {
        self.delay
    }

    #[expect(clippy::cast_precision_loss)]
    fn distance(&self) -> f32 {
        let dx = (self.to.x - self.from.x) as f32;
        let dy = (self.to.y - self.from.y) as f32;
        dx.hypot(dy)
    }

    /// Seconds of travel after the delay has elapsed.
    #[must_use]
    pub fn travel_time(&self) -> f32 {
        if self.speed <= 0.0 {
            return 0.0;
        }
        self.distance() / self.speed
    }

    /// Fraction of the travel completed, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let travel = self.travel_time();
        if travel <= 0.0 {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        ((self.elapsed - self.delay) / travel).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.travel_time()
    }

    /// Advances the motion by `dt` seconds and reports whether it finished.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        self.is_finished()
    }

    /// Linearly interpolated position in cell units.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn interpolated(&self) -> (f32, f32) {
        let t = self.progress();
        let lerp = |a: i32, b: i32| a as f32 + (b - a) as f32 * t;
        (lerp(self.from.x, self.to.x), lerp(self.from.y, self.to.y))
    }
}
