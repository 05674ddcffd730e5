//! # Timed Transitions
//!
//! Every long-running effect in the gallery (camera moves, day/night light
//! blends, avatar weight crossfades) is an [`ActiveTransition`]: an immutable
//! `from`/`to`/`start`/`duration` record sampled against an injected clock.
//!
//! Re-issuing a transition never mutates the old record. The caller samples the
//! live value, builds a fresh transition from it and replaces the old one, which
//! makes supersession a plain assignment.

use cgmath::Vector3;

/// Linear interpolation between two values of the same type.
///
/// Implementations must return `self` at `t = 0` and `other` at `t = 1`, and
/// must never leave the closed range spanned by the two endpoints for any
/// `t` in `[0, 1]`.
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

/// Interpolate a single scalar channel, clamped to the endpoint range.
pub fn lerp_scalar(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let value = a + (b - a) * t;
    value.clamp(a.min(b), a.max(b))
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        lerp_scalar(*self, *other, t)
    }
}

impl Lerp for Vector3<f32> {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vector3::new(
            lerp_scalar(self.x, other.x, t),
            lerp_scalar(self.y, other.y, t),
            lerp_scalar(self.z, other.z, t),
        )
    }
}

/// A single in-flight transition between two values
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTransition<T> {
    pub from: T,
    pub to: T,
    /// Clock time the transition was issued, in milliseconds
    pub start_ms: f64,
    /// Total length in milliseconds; zero or negative snaps on the first sample
    pub duration_ms: f64,
}

impl<T: Lerp> ActiveTransition<T> {
    pub fn new(from: T, to: T, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Normalized progress in `[0, 1]`
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= f64::EPSILON {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Sample the value at `now_ms`.
    ///
    /// Returns an exact clone of `to` once finished so the final value never
    /// carries interpolation rounding.
    pub fn sample(&self, now_ms: f64) -> T {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            self.to.clone()
        } else {
            self.from.lerp(&self.to, t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_clamped() {
        let transition = ActiveTransition::new(0.0_f32, 10.0, 100.0, 200.0);
        assert_eq!(transition.progress(0.0), 0.0);
        assert_eq!(transition.progress(200.0), 0.5);
        assert_eq!(transition.progress(10_000.0), 1.0);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let transition = ActiveTransition::new(3.0_f32, 7.0, 50.0, 0.0);
        assert!(transition.is_finished(50.0));
        assert_eq!(transition.sample(50.0), 7.0);
    }

    #[test]
    fn test_sample_stays_within_endpoints() {
        let transition = ActiveTransition::new(0.3_f32, 0.1, 0.0, 1000.0);
        for step in 0..=1000 {
            let value = transition.sample(step as f64);
            assert!((0.1..=0.3).contains(&value), "value {value} escaped range");
        }
        assert_eq!(transition.sample(1000.0), 0.1);
    }

    #[test]
    fn test_vector_lerp_midpoint() {
        let a = Vector3::new(0.0, 2.0, 10.0);
        let b = Vector3::new(4.0, 2.0, 0.0);
        assert_eq!(a.lerp(&b, 0.5), Vector3::new(2.0, 2.0, 5.0));
    }
}
