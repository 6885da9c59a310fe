//! The recursive estimation cycle: predict, predict observation, assimilate
//!
//! # Example
//!
//! ```
//! use credence::prelude::*;
//!
//! // Track [x, y, vx, vy] from noisy position fixes.
//! let mut estimator = StateEstimator::new(
//!     0.0,
//!     StateBelief::with_identity_covariance(StateVector::from_array([0.0, 0.0, 1.0, 0.0])),
//! );
//!
//! let noise = TimeDependentAdditiveNoise::isotropic(0.01);
//! estimator.predict(1.0, &ConstantVelocity2D, &noise).unwrap();
//!
//! let observer = MatrixObserver::new(ObservationMatrix::from_matrix(nalgebra::matrix![
//!     1.0, 0.0, 0.0, 0.0;
//!     0.0, 1.0, 0.0, 0.0
//! ]));
//! let predicted = estimator.predict_observation(&observer, &());
//!
//! let fix = ObservationBelief::new(
//!     ObservationVector::from_array([1.1, 0.05]),
//!     ObservationCovariance::identity().scale(0.1),
//! );
//! estimator.assimilate(&predicted, &fix);
//!
//! assert!(estimator.estimate().uncertainty() < 4.0);
//! ```

use ::core::cmp::Ordering;

use nalgebra::RealField;

use crate::models::{DynamicsModel, ObserverModel};
use crate::noise::ProcessNoise;
use crate::time::TimePoint;
use crate::types::belief::{ObservationBelief, PredictedObservation, StateBelief};
use crate::types::spaces::{StateCovariance, StateVector};
use crate::{EstimatorError, Result};

// ============================================================================
// State Estimator
// ============================================================================

/// A recursive Bayesian estimator: a state belief pinned to a point in time.
///
/// The estimator only ever moves forward. `predict` advances the belief to a
/// later time under a dynamics model; `predict_observation` projects the
/// belief into a sensor's observation space without touching it; and
/// `assimilate` folds an actual measurement back into the belief.
///
/// # Type Parameters
///
/// - `T`: Scalar type
/// - `Time`: Timeline the estimator lives on (see [`TimePoint`])
/// - `N`: State dimension
#[derive(Debug, Clone)]
pub struct StateEstimator<T: RealField, Time, const N: usize> {
    time: Time,
    estimate: StateBelief<T, N>,
}

impl<T, Time, const N: usize> StateEstimator<T, Time, N>
where
    T: RealField + Copy,
    Time: TimePoint<T>,
{
    /// Creates an estimator holding `estimate` as of `time`.
    #[inline]
    pub fn new(time: Time, estimate: StateBelief<T, N>) -> Self {
        Self { time, estimate }
    }

    /// The time the current estimate refers to.
    #[inline]
    pub fn time(&self) -> Time {
        self.time
    }

    /// The current state belief.
    #[inline]
    pub fn estimate(&self) -> &StateBelief<T, N> {
        &self.estimate
    }

    /// Advances the estimate to `time`.
    ///
    /// The belief is propagated through `dynamics` over the elapsed interval
    /// and the propagated covariance inflated by `process_noise`. Predicting
    /// to the current time is a no-op; predicting to an earlier (or
    /// incomparable) time fails with [`EstimatorError::InvalidTimeOrder`] and
    /// leaves the estimator untouched.
    pub fn predict<D, Q>(&mut self, time: Time, dynamics: &D, process_noise: &Q) -> Result<()>
    where
        D: DynamicsModel<T, N>,
        Q: ProcessNoise<T, N>,
    {
        match time.partial_cmp(&self.time) {
            Some(Ordering::Equal) => Ok(()),
            Some(Ordering::Less) | None => Err(EstimatorError::InvalidTimeOrder),
            Some(Ordering::Greater) => {
                let dt = time.seconds_since(&self.time);
                let propagated = dynamics.propagate(&self.estimate, dt);
                let covariance =
                    process_noise.inflate(dt, &propagated.mean, propagated.covariance);

                self.time = time;
                self.estimate = StateBelief::new(propagated.mean, covariance);
                Ok(())
            }
        }
    }

    /// Predicts what `observer` would report given the current belief.
    ///
    /// Pure: the estimator is not modified, and several observations can be
    /// predicted from the same belief. The result carries the
    /// cross-covariance needed by [`assimilate`](Self::assimilate).
    #[inline]
    pub fn predict_observation<Obs, const M: usize>(
        &self,
        observer: &Obs,
        context: &Obs::Context,
    ) -> PredictedObservation<T, N, M>
    where
        Obs: ObserverModel<T, N, M>,
    {
        observer.predict_observation(&self.estimate, context)
    }

    /// Folds an actual measurement into the belief.
    ///
    /// `predicted` must come from [`predict_observation`] on this estimator's
    /// current belief; `observation` is the sensor reading with its
    /// measurement noise as covariance. The innovation covariance is the sum
    /// of the predicted and measurement covariances; the gain comes from its
    /// inverse.
    ///
    /// Never fails: if the innovation covariance is exactly singular the
    /// measurement carries no usable information along some direction and the
    /// update is skipped, leaving the belief as it was.
    ///
    /// [`predict_observation`]: Self::predict_observation
    pub fn assimilate<const M: usize>(
        &mut self,
        predicted: &PredictedObservation<T, N, M>,
        observation: &ObservationBelief<T, M>,
    ) {
        let innovation_cov =
            predicted.covariance.as_matrix() + observation.covariance.as_matrix();
        let Some(inverse) = innovation_cov.try_inverse() else {
            return;
        };

        let gain = predicted.cross_covariance.as_matrix() * inverse;
        let innovation = observation.mean.as_svector() - predicted.mean.as_svector();

        self.estimate.mean =
            StateVector::from_svector(self.estimate.mean.as_svector() + gain * innovation);
        self.estimate.covariance = StateCovariance::from_matrix(
            self.estimate.covariance.as_matrix() - gain * innovation_cov * gain.transpose(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinearDynamics, MatrixObserver};
    use crate::noise::NoProcessNoise;
    use crate::types::spaces::{
        ObservationCovariance, ObservationVector, StateCovariance, StateVector,
    };
    use crate::types::transforms::{ObservationMatrix, TransitionMatrix};

    fn static_dynamics() -> LinearDynamics<impl Fn(f64) -> TransitionMatrix<f64, 1>> {
        LinearDynamics::new(|_dt| TransitionMatrix::identity())
    }

    fn scalar_estimator(mean: f64, var: f64) -> StateEstimator<f64, f64, 1> {
        StateEstimator::new(
            0.0,
            StateBelief::new(
                StateVector::from_array([mean]),
                StateCovariance::from_matrix(nalgebra::matrix![var]),
            ),
        )
    }

    fn scalar_observer() -> MatrixObserver<f64, 1, 1> {
        MatrixObserver::new(ObservationMatrix::from_matrix(nalgebra::matrix![1.0]))
    }

    #[test]
    fn test_predict_to_same_time_is_noop() {
        let mut estimator = scalar_estimator(1.0, 2.0);
        let before = estimator.estimate().clone();

        estimator
            .predict(0.0, &static_dynamics(), &NoProcessNoise)
            .unwrap();

        assert_eq!(estimator.estimate(), &before);
        assert!((estimator.time() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_backwards_fails_without_mutation() {
        let mut estimator = scalar_estimator(1.0, 2.0);
        let before = estimator.estimate().clone();

        let result = estimator.predict(-1.0, &static_dynamics(), &NoProcessNoise);
        assert_eq!(result, Err(EstimatorError::InvalidTimeOrder));
        assert_eq!(estimator.estimate(), &before);
        assert!((estimator.time() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_assimilate_scalar_fusion() {
        // Prior N(0, 1), measurement N(5, 1): posterior N(2.5, 0.5).
        let mut estimator = scalar_estimator(0.0, 1.0);
        let predicted = estimator.predict_observation(&scalar_observer(), &());

        let observation = ObservationBelief::new(
            ObservationVector::from_array([5.0]),
            ObservationCovariance::from_matrix(nalgebra::matrix![1.0]),
        );
        estimator.assimilate(&predicted, &observation);

        assert!((estimator.estimate().mean.index(0) - 2.5).abs() < 1e-10);
        assert!((estimator.estimate().covariance.as_matrix()[(0, 0)] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_assimilate_singular_innovation_skips() {
        // Zero predicted covariance plus zero measurement noise: singular S.
        let mut estimator = StateEstimator::new(
            0.0,
            StateBelief::new(
                StateVector::from_array([1.0]),
                StateCovariance::zeros(),
            ),
        );
        let before = estimator.estimate().clone();

        let predicted = estimator.predict_observation(&scalar_observer(), &());
        let observation = ObservationBelief::new(
            ObservationVector::from_array([100.0]),
            ObservationCovariance::zeros(),
        );
        estimator.assimilate(&predicted, &observation);

        assert_eq!(estimator.estimate(), &before);
    }
}
