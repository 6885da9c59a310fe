//! Observer models: projecting a state belief into an observation space
//!
//! An observer predicts what a sensor would report given the current belief:
//! the expected reading, the uncertainty of that reading that comes from
//! state uncertainty alone, and the state/observation cross-covariance.
//! Measurement noise belongs to the actual observation, not to the observer;
//! keeping the two apart lets one prediction be compared against sensors of
//! differing quality.

use ::core::marker::PhantomData;

use nalgebra::RealField;
#[cfg(feature = "alloc")]
use num_traits::Float;

#[cfg(feature = "alloc")]
use crate::sigma::{SigmaPoints, SigmaScheme};
use crate::types::belief::{ObservationBelief, PredictedObservation, StateBelief};
use crate::types::spaces::{ObservationVector, StateVector};
use crate::types::transforms::ObservationMatrix;

// ============================================================================
// Observer Model Trait
// ============================================================================

/// A model of a sensor observing the hidden state.
///
/// `Context` carries per-prediction side information the sensor needs, such
/// as its own pose; observers that need none use `()`.
///
/// The returned covariance reflects state uncertainty projected into
/// observation space only. It never fails: observers are expected to be
/// total over the state space, clamping or saturating at singular
/// configurations instead of erroring.
pub trait ObserverModel<T: RealField, const N: usize, const M: usize> {
    /// Side information consumed per prediction
    type Context;

    /// Predicts the observation implied by the given belief.
    fn predict_observation(
        &self,
        estimate: &StateBelief<T, N>,
        context: &Self::Context,
    ) -> PredictedObservation<T, N, M>;
}

// ============================================================================
// Matrix Observer
// ============================================================================

/// A linear observer defined by a fixed observation matrix.
///
/// Predicts `H * x` with covariance `H * P * H^T` and cross-covariance
/// `P * H^T`. Exact for linear sensors.
#[derive(Debug, Clone)]
pub struct MatrixObserver<T: RealField, const M: usize, const N: usize> {
    /// The observation matrix H
    pub matrix: ObservationMatrix<T, M, N>,
}

impl<T: RealField + Copy, const M: usize, const N: usize> MatrixObserver<T, M, N> {
    /// Creates a linear observer from an observation matrix.
    #[inline]
    pub fn new(matrix: ObservationMatrix<T, M, N>) -> Self {
        Self { matrix }
    }
}

impl<T: RealField + Copy, const M: usize, const N: usize> ObserverModel<T, N, M>
    for MatrixObserver<T, M, N>
{
    type Context = ();

    fn predict_observation(
        &self,
        estimate: &StateBelief<T, N>,
        _context: &(),
    ) -> PredictedObservation<T, N, M> {
        PredictedObservation::new(
            ObservationBelief::new(
                self.matrix.observe(&estimate.mean),
                self.matrix.project_covariance(&estimate.covariance),
            ),
            self.matrix.cross_covariance(&estimate.covariance),
        )
    }
}

// ============================================================================
// Differentiable Observer
// ============================================================================

/// A nonlinear observer linearized at the current mean.
///
/// The predicted mean is `observe(x, context)` exactly; covariance and
/// cross-covariance come from the supplied Jacobian evaluated at the mean.
#[derive(Debug, Clone)]
pub struct DifferentiableObserver<F, J, C> {
    /// The observation function
    pub observe: F,
    /// The Jacobian of `observe` with respect to the state
    pub jacobian: J,
    _context: PhantomData<fn(&C)>,
}

impl<F, J, C> DifferentiableObserver<F, J, C> {
    /// Creates a differentiable observer from an observation function and its
    /// Jacobian.
    #[inline]
    pub fn new(observe: F, jacobian: J) -> Self {
        Self {
            observe,
            jacobian,
            _context: PhantomData,
        }
    }
}

impl<T, const N: usize, const M: usize, F, J, C> ObserverModel<T, N, M>
    for DifferentiableObserver<F, J, C>
where
    T: RealField + Copy,
    F: Fn(&StateVector<T, N>, &C) -> ObservationVector<T, M>,
    J: Fn(&StateVector<T, N>, &C) -> ObservationMatrix<T, M, N>,
{
    type Context = C;

    fn predict_observation(
        &self,
        estimate: &StateBelief<T, N>,
        context: &C,
    ) -> PredictedObservation<T, N, M> {
        let jac = (self.jacobian)(&estimate.mean, context);
        PredictedObservation::new(
            ObservationBelief::new(
                (self.observe)(&estimate.mean, context),
                jac.project_covariance(&estimate.covariance),
            ),
            jac.cross_covariance(&estimate.covariance),
        )
    }
}

// ============================================================================
// Sampled Observer
// ============================================================================

/// A nonlinear observer evaluated through sigma points.
///
/// Pushes a sigma-point set through the observation function and recombines;
/// the cross-covariance falls out of the same weighted point sets. No
/// Jacobian required.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct SampledObserver<T: RealField, F, C> {
    /// The observation function
    pub observe: F,
    /// The sigma-point placement rule
    pub scheme: SigmaScheme<T>,
    _context: PhantomData<fn(&C)>,
}

#[cfg(feature = "alloc")]
impl<T: RealField, F, C> SampledObserver<T, F, C> {
    /// Creates a sampled observer with the default (cubature) scheme.
    #[inline]
    pub fn new(observe: F) -> Self {
        Self {
            observe,
            scheme: SigmaScheme::Cubature,
            _context: PhantomData,
        }
    }

    /// Creates a sampled observer with an explicit scheme.
    #[inline]
    pub fn with_scheme(observe: F, scheme: SigmaScheme<T>) -> Self {
        Self {
            observe,
            scheme,
            _context: PhantomData,
        }
    }
}

#[cfg(feature = "alloc")]
impl<T, const N: usize, const M: usize, F, C> ObserverModel<T, N, M> for SampledObserver<T, F, C>
where
    T: RealField + Float + Copy,
    F: Fn(&StateVector<T, N>, &C) -> ObservationVector<T, M>,
{
    type Context = C;

    fn predict_observation(
        &self,
        estimate: &StateBelief<T, N>,
        context: &C,
    ) -> PredictedObservation<T, N, M> {
        let sigma = SigmaPoints::sample(estimate, &self.scheme);
        let observation: ObservationBelief<T, M> =
            sigma.recover_mean_cov(|point| (self.observe)(point, context));
        let cross = sigma.cross_covariance(
            &estimate.mean,
            |point| (self.observe)(point, context),
            &observation.mean,
        );

        PredictedObservation::new(observation, cross)
    }
}

// ============================================================================
// Range-Bearing Sensor
// ============================================================================

/// Pose of a planar sensor, used as observer context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorPose<T> {
    /// Sensor x position
    pub x: T,
    /// Sensor y position
    pub y: T,
}

/// A planar range-bearing sensor observing the first two state components as
/// a position.
///
/// Reports `[range, bearing]` relative to the sensor pose supplied as
/// context. At zero range the bearing is undefined; the range is clamped to
/// a small positive floor so the prediction stays finite.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeBearing2D;

impl RangeBearing2D {
    fn offsets<T: RealField + Copy, const N: usize>(
        state: &StateVector<T, N>,
        pose: &SensorPose<T>,
    ) -> (T, T, T) {
        let dx = *state.index(0) - pose.x;
        let dy = *state.index(1) - pose.y;
        let range = (dx * dx + dy * dy).sqrt().max(T::from_f64(1e-9).unwrap());
        (dx, dy, range)
    }
}

impl<T: RealField + Copy, const N: usize> ObserverModel<T, N, 2> for RangeBearing2D {
    type Context = SensorPose<T>;

    fn predict_observation(
        &self,
        estimate: &StateBelief<T, N>,
        context: &SensorPose<T>,
    ) -> PredictedObservation<T, N, 2> {
        let (dx, dy, range) = Self::offsets(&estimate.mean, context);
        let bearing = dy.atan2(dx);

        let mut jac = nalgebra::SMatrix::<T, 2, N>::zeros();
        let range_sq = range * range;
        jac[(0, 0)] = dx / range;
        jac[(0, 1)] = dy / range;
        jac[(1, 0)] = -dy / range_sq;
        jac[(1, 1)] = dx / range_sq;
        let jac = ObservationMatrix::from_matrix(jac);

        PredictedObservation::new(
            ObservationBelief::new(
                ObservationVector::from_array([range, bearing]),
                jac.project_covariance(&estimate.covariance),
            ),
            jac.cross_covariance(&estimate.covariance),
        )
    }
}
