//! Process noise strategies
//!
//! Process noise accounts for the growth of uncertainty over a prediction
//! interval: the dynamics model is never a perfect description of the real
//! system, so the propagated covariance is inflated before it is committed.

use nalgebra::RealField;

use crate::types::spaces::{StateCovariance, StateVector};

// ============================================================================
// Process Noise Trait
// ============================================================================

/// A strategy for inflating the propagated covariance over a time interval.
///
/// Implementations receive the propagated mean alongside the covariance so
/// state-dependent noise models are expressible, though the common additive
/// model ignores it.
pub trait ProcessNoise<T: RealField, const N: usize> {
    /// Returns the covariance inflated by the noise accumulated over `dt`
    /// seconds.
    fn inflate(
        &self,
        dt: T,
        mean: &StateVector<T, N>,
        covariance: StateCovariance<T, N>,
    ) -> StateCovariance<T, N>;
}

// ============================================================================
// Additive Noise
// ============================================================================

/// Additive process noise that accumulates linearly with elapsed time.
///
/// Inflates the covariance by `dt * rate`, where `rate` is a fixed
/// covariance-per-second matrix. This is the workhorse model for systems
/// whose unmodeled disturbances are roughly stationary.
#[derive(Debug, Clone)]
pub struct TimeDependentAdditiveNoise<T: RealField, const N: usize> {
    /// Covariance accumulated per second of elapsed time
    pub rate: StateCovariance<T, N>,
}

impl<T: RealField + Copy, const N: usize> TimeDependentAdditiveNoise<T, N> {
    /// Creates an additive noise model from a covariance rate.
    #[inline]
    pub fn new(rate: StateCovariance<T, N>) -> Self {
        Self { rate }
    }

    /// Creates an isotropic additive noise model: `variance_rate` on every
    /// diagonal entry.
    #[inline]
    pub fn isotropic(variance_rate: T) -> Self {
        Self {
            rate: StateCovariance::identity().scale(variance_rate),
        }
    }
}

impl<T: RealField + Copy, const N: usize> ProcessNoise<T, N>
    for TimeDependentAdditiveNoise<T, N>
{
    #[inline]
    fn inflate(
        &self,
        dt: T,
        _mean: &StateVector<T, N>,
        covariance: StateCovariance<T, N>,
    ) -> StateCovariance<T, N> {
        covariance.add(&self.rate.scale(dt))
    }
}

// ============================================================================
// No Noise
// ============================================================================

/// A process noise model that adds nothing.
///
/// Useful for deterministic dynamics and in tests where the propagated
/// covariance should be inspected without inflation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProcessNoise;

impl<T: RealField + Copy, const N: usize> ProcessNoise<T, N> for NoProcessNoise {
    #[inline]
    fn inflate(
        &self,
        _dt: T,
        _mean: &StateVector<T, N>,
        covariance: StateCovariance<T, N>,
    ) -> StateCovariance<T, N> {
        covariance
    }
}

// ============================================================================
// Closure Adapter
// ============================================================================

/// Any closure with the right shape is a process noise model.
impl<T: RealField, const N: usize, F> ProcessNoise<T, N> for F
where
    F: Fn(T, &StateVector<T, N>, StateCovariance<T, N>) -> StateCovariance<T, N>,
{
    #[inline]
    fn inflate(
        &self,
        dt: T,
        mean: &StateVector<T, N>,
        covariance: StateCovariance<T, N>,
    ) -> StateCovariance<T, N> {
        self(dt, mean, covariance)
    }
}
