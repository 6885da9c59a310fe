//! Beliefs: mean and covariance pairs over a typed vector space
//!
//! A belief is the statistical representation of a Gaussian (or
//! Gaussian-approximated) distribution over a fixed-dimension vector space.

use nalgebra::RealField;

use super::spaces::{
    Covariance, ObservationCovariance, ObservationSpace, ObservationVector, StateSpace, Vector,
};
use super::transforms::CrossCovariance;

// ============================================================================
// Belief
// ============================================================================

/// A belief over a vector space: mean plus covariance.
///
/// # Type Parameters
///
/// - `T`: Scalar type (typically `f32` or `f64`)
/// - `N`: Dimension of the space (compile-time constant)
/// - `Space`: Marker type for the space the belief lives in
#[derive(Debug, Clone, PartialEq)]
pub struct Belief<T: RealField, const N: usize, Space> {
    /// Mean of the distribution
    pub mean: Vector<T, N, Space>,
    /// Covariance of the distribution
    pub covariance: Covariance<T, N, Space>,
}

impl<T: RealField + Copy, const N: usize, Space> Belief<T, N, Space> {
    /// Creates a new belief.
    #[inline]
    pub fn new(mean: Vector<T, N, Space>, covariance: Covariance<T, N, Space>) -> Self {
        Self { mean, covariance }
    }

    /// Creates a belief with identity covariance.
    #[inline]
    pub fn with_identity_covariance(mean: Vector<T, N, Space>) -> Self {
        Self {
            mean,
            covariance: Covariance::identity(),
        }
    }

    /// Creates a belief with diagonal covariance.
    #[inline]
    pub fn with_diagonal_covariance(
        mean: Vector<T, N, Space>,
        diagonal: &nalgebra::SVector<T, N>,
    ) -> Self {
        Self {
            mean,
            covariance: Covariance::from_diagonal(diagonal),
        }
    }

    /// Returns the trace of the covariance matrix (sum of variances).
    #[inline]
    pub fn uncertainty(&self) -> T {
        self.covariance.trace()
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// A belief over the state space.
pub type StateBelief<T, const N: usize> = Belief<T, N, StateSpace>;

/// A belief over the observation space.
///
/// Used both for predicted observations (before the cross-covariance is
/// attached) and for actual measurements, whose covariance is the measurement
/// noise.
pub type ObservationBelief<T, const M: usize> = Belief<T, M, ObservationSpace>;

// ============================================================================
// Predicted Observation
// ============================================================================

/// An observation-space belief augmented with the state/observation
/// cross-covariance.
///
/// Produced by [`StateEstimator::predict_observation`] and consumed by
/// [`StateEstimator::assimilate`]; the cross-covariance is what turns an
/// innovation into a state correction.
///
/// [`StateEstimator::predict_observation`]: crate::estimator::StateEstimator::predict_observation
/// [`StateEstimator::assimilate`]: crate::estimator::StateEstimator::assimilate
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedObservation<T: RealField, const N: usize, const M: usize> {
    /// Predicted observation mean
    pub mean: ObservationVector<T, M>,
    /// Predicted observation covariance (state uncertainty projected into
    /// observation space; measurement noise is not included)
    pub covariance: ObservationCovariance<T, M>,
    /// Cov(state, observation) under the current belief
    pub cross_covariance: CrossCovariance<T, N, M>,
}

impl<T: RealField + Copy, const N: usize, const M: usize> PredictedObservation<T, N, M> {
    /// Creates a predicted observation from an observation belief and the
    /// accompanying cross-covariance.
    #[inline]
    pub fn new(
        observation: ObservationBelief<T, M>,
        cross_covariance: CrossCovariance<T, N, M>,
    ) -> Self {
        Self {
            mean: observation.mean,
            covariance: observation.covariance,
            cross_covariance,
        }
    }

    /// Returns the observation-space part as a belief.
    #[inline]
    pub fn observation(&self) -> ObservationBelief<T, M> {
        ObservationBelief::new(self.mean, self.covariance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::spaces::{StateCovariance, StateVector};

    #[test]
    fn test_belief_creation() {
        let mean: StateVector<f64, 4> = StateVector::from_array([0.0, 0.0, 1.0, 0.0]);
        let cov: StateCovariance<f64, 4> = StateCovariance::identity();

        let belief = StateBelief::new(mean, cov);
        assert!((belief.mean.index(2) - 1.0).abs() < 1e-10);
        assert!((belief.uncertainty() - 4.0).abs() < 1e-10); // trace of 4x4 identity
    }

    #[test]
    fn test_belief_diagonal_covariance() {
        let mean: StateVector<f64, 2> = StateVector::from_array([1.0, 2.0]);
        let belief = StateBelief::with_diagonal_covariance(mean, &nalgebra::vector![4.0, 9.0]);

        assert!((belief.uncertainty() - 13.0).abs() < 1e-10);
    }

    #[test]
    fn test_predicted_observation_roundtrip() {
        let observation: ObservationBelief<f64, 2> = ObservationBelief::new(
            ObservationVector::from_array([1.0, 2.0]),
            ObservationCovariance::identity(),
        );
        let cross: CrossCovariance<f64, 4, 2> = CrossCovariance::zeros();

        let predicted = PredictedObservation::new(observation.clone(), cross);
        assert_eq!(predicted.observation(), observation);
    }
}
