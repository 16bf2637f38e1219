#![forbid(unsafe_code)]

//! Minimal tick-driven animation primitives.
//!
//! Animations are advanced explicitly with [`Animation::tick`]; nothing here
//! reads a clock. The reorder widget uses [`Tween`] to settle the drag proxy
//! onto its destination row after a drop.
//!
//! # Invariants
//!
//! 1. `value()` is always in `[0.0, 1.0]`.
//! 2. `is_complete()` is monotonic: once true it stays true until `reset()`.
//! 3. A zero-duration tween is complete before its first tick.

use web_time::Duration;

/// Easing curve applied to linear progress.
pub type EasingFn = fn(f32) -> f32;

/// Linear easing (identity).
#[must_use]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out.
#[must_use]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out.
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// A time-driven animation.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    fn is_complete(&self) -> bool;

    /// Current eased progress in `[0.0, 1.0]`.
    fn value(&self) -> f32;

    /// Rewind to the start.
    fn reset(&mut self);

    /// Time ticked past completion.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

/// Fixed-duration progress from 0 to 1 with an easing curve.
#[derive(Debug, Clone)]
pub struct Tween {
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Create a tween with ease-out easing.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            easing: ease_out,
        }
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32;
        (self.easing)(t)
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn tween_completes_after_duration() {
        let mut tw = Tween::new(Duration::from_millis(300));
        tw.tick(MS_100);
        assert!(!tw.is_complete());
        assert!(tw.value() > 0.0 && tw.value() < 1.0);
        tw.tick(MS_100 * 3);
        assert!(tw.is_complete());
        assert_eq!(tw.value(), 1.0);
        assert_eq!(tw.overshoot(), MS_100);
    }

    #[test]
    fn zero_duration_is_immediately_complete() {
        let tw = Tween::new(Duration::ZERO);
        assert!(tw.is_complete());
        assert_eq!(tw.value(), 1.0);
    }

    #[test]
    fn reset_rewinds() {
        let mut tw = Tween::new(MS_100).easing(linear);
        tw.tick(MS_100);
        tw.reset();
        assert!(!tw.is_complete());
        assert_eq!(tw.value(), 0.0);
    }

    #[test]
    fn easings_hit_endpoints() {
        for easing in [linear as EasingFn, ease_out, ease_in_out] {
            assert!(easing(0.0).abs() < 1e-6);
            assert!((easing(1.0) - 1.0).abs() < 1e-6);
        }
    }
}
