//! Spin animation math and winner resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::ops::Range;
use std::time::Duration;

/// Default length of a spin animation.
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(4500);

/// Default range of full turns drawn for each spin.
pub const DEFAULT_TURNS: Range<f64> = 3.0..5.0;

/// Cubic ease-out: fast start, decelerating to a stop at `progress == 1`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Angular size of one segment on a wheel with `count` segments.
pub fn segment_angle(count: usize) -> f64 {
    TAU / count as f64
}

/// Fold a rotation into `[0, 2π)`.
pub fn normalize_rotation(rotation: f64) -> f64 {
    let mut normalized = rotation % TAU;
    if normalized < 0.0 {
        normalized += TAU;
    }
    normalized
}

/// Index of the segment under the fixed pointer at the top of the wheel.
///
/// Segment `i` spans `[r + i·seg - π/2, r + (i+1)·seg - π/2)`. Increasing
/// rotation moves segments past the pointer in reverse index order, hence
/// `(n - raw - 1 + n) mod n`. Returns `None` for an empty wheel.
pub fn winner_index(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let normalized = normalize_rotation(rotation);
    let raw = (normalized / segment_angle(count)).floor() as usize;
    // Float rounding can land exactly on `count` just below 2π.
    let raw = raw.min(count);
    Some((count + count - raw - 1) % count)
}

/// A single in-flight spin: where it started and where it will stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    /// Scheduler timestamp when the spin began.
    pub start_time: Duration,
    /// Rotation at the start of the spin.
    pub start_angle: f64,
    /// Rotation the wheel settles on.
    pub target_angle: f64,
    /// Length of the animation.
    pub duration: Duration,
}

impl SpinPlan {
    /// Plan a spin of `turns` full rotations plus `offset` radians.
    pub fn new(start_time: Duration, start_angle: f64, turns: f64, offset: f64, duration: Duration) -> Self {
        Self {
            start_time,
            start_angle,
            target_angle: start_angle + turns * TAU + offset,
            duration,
        }
    }

    /// Plan a spin with a random turn count from `turns` and a random
    /// sub-turn offset in `[0, 2π)`.
    ///
    /// Negative or non-finite turn counts count as zero, so the target never
    /// lies behind `start_angle`.
    pub fn draw<R: Rng + ?Sized>(
        rng: &mut R,
        start_time: Duration,
        start_angle: f64,
        turns: Range<f64>,
        duration: Duration,
    ) -> Self {
        let low = if turns.start.is_finite() { turns.start.max(0.0) } else { 0.0 };
        let turns = if turns.end.is_finite() && turns.end > low {
            rng.gen_range(low..turns.end)
        } else {
            low
        };
        let offset = rng.gen_range(0.0..TAU);
        Self::new(start_time, start_angle, turns, offset, duration)
    }

    /// Fraction of the animation elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.start_time);
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    /// Eased rotation at `now`. Returns exactly `target_angle` once complete.
    pub fn rotation_at(&self, now: Duration) -> f64 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.target_angle;
        }
        self.start_angle + (self.target_angle - self.start_angle) * ease_out_cubic(progress)
    }
}
