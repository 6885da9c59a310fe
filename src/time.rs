//! Time points for asynchronous prediction
//!
//! The estimator is generic over its clock: anything ordered that can report
//! the elapsed seconds between two of its values works as a time point. This
//! keeps wall-clock types, simulation ticks, and plain scalar timestamps all
//! usable without conversion at the call sites.

use ::core::time::Duration;
use nalgebra::RealField;

/// A point on a timeline.
///
/// `PartialOrd` supplies the ordering the estimator uses to reject
/// out-of-order prediction targets; `seconds_since` supplies the elapsed time
/// handed to dynamics and noise models. Implementations must keep the two
/// consistent: `b >= a` implies `b.seconds_since(&a) >= 0`.
pub trait TimePoint<T>: Copy + PartialOrd {
    /// Returns the number of seconds from `earlier` to `self`.
    fn seconds_since(&self, earlier: &Self) -> T;
}

impl TimePoint<f64> for f64 {
    #[inline]
    fn seconds_since(&self, earlier: &Self) -> f64 {
        self - earlier
    }
}

impl TimePoint<f32> for f32 {
    #[inline]
    fn seconds_since(&self, earlier: &Self) -> f32 {
        self - earlier
    }
}

impl<T: RealField + Copy> TimePoint<T> for Duration {
    #[inline]
    fn seconds_since(&self, earlier: &Self) -> T {
        T::from_f64(self.saturating_sub(*earlier).as_secs_f64()).unwrap()
    }
}

#[cfg(feature = "std")]
impl TimePoint<f64> for std::time::Instant {
    #[inline]
    fn seconds_since(&self, earlier: &Self) -> f64 {
        self.saturating_duration_since(*earlier).as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_seconds() {
        assert!((3.5_f64.seconds_since(&1.0) - 2.5).abs() < 1e-12);
        assert!((1.0_f64.seconds_since(&3.5) + 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_duration_seconds() {
        let a = Duration::from_millis(500);
        let b = Duration::from_millis(2750);

        let dt: f64 = b.seconds_since(&a);
        assert!((dt - 2.25).abs() < 1e-9);

        // Saturating: never negative
        let dt: f64 = a.seconds_since(&b);
        assert!(dt.abs() < 1e-12);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_instant_ordering() {
        let a = std::time::Instant::now();
        let b = a + Duration::from_secs(1);

        assert!(b > a);
        assert!((b.seconds_since(&a) - 1.0).abs() < 1e-6);
    }
}
