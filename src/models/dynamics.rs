//! Dynamics models: propagating a state belief forward in time

use nalgebra::RealField;
#[cfg(feature = "alloc")]
use num_traits::Float;

#[cfg(feature = "alloc")]
use crate::sigma::{SigmaPoints, SigmaScheme};
use crate::types::belief::StateBelief;
use crate::types::spaces::StateVector;
use crate::types::transforms::TransitionMatrix;

// ============================================================================
// Dynamics Model Trait
// ============================================================================

/// A model of how the hidden state evolves over an interval of `dt` seconds.
///
/// Propagation transforms the whole belief, mean and covariance together.
/// Process noise is not this trait's concern; the estimator inflates the
/// propagated covariance with a separate noise strategy afterwards.
pub trait DynamicsModel<T: RealField, const N: usize> {
    /// Propagates a belief forward by `dt` seconds.
    fn propagate(&self, estimate: &StateBelief<T, N>, dt: T) -> StateBelief<T, N>;
}

// ============================================================================
// Linear Dynamics
// ============================================================================

/// Linear dynamics defined by a (possibly time-step-dependent) transition
/// matrix.
///
/// The mean is propagated as `F(dt) * x` and the covariance as
/// `F(dt) * P * F(dt)^T`. For linear systems this is exact.
#[derive(Debug, Clone)]
pub struct LinearDynamics<F> {
    /// Builds the transition matrix for a given time step
    pub transition: F,
}

impl<F> LinearDynamics<F> {
    /// Creates linear dynamics from a transition matrix builder.
    #[inline]
    pub fn new(transition: F) -> Self {
        Self { transition }
    }
}

impl<T, const N: usize, F> DynamicsModel<T, N> for LinearDynamics<F>
where
    T: RealField + Copy,
    F: Fn(T) -> TransitionMatrix<T, N>,
{
    fn propagate(&self, estimate: &StateBelief<T, N>, dt: T) -> StateBelief<T, N> {
        let f = (self.transition)(dt);
        StateBelief::new(
            f.apply_state(&estimate.mean),
            f.propagate_covariance(&estimate.covariance),
        )
    }
}

// ============================================================================
// Differentiable Dynamics
// ============================================================================

/// Nonlinear dynamics propagated by linearization at the current mean.
///
/// The mean is pushed through `map` exactly; the covariance is propagated
/// through the supplied `jacobian`, evaluated at the prior mean:
/// `P' = J * P * J^T`. This is the extended-filter prediction step.
#[derive(Debug, Clone)]
pub struct DifferentiableDynamics<F, J> {
    /// The state transition function
    pub map: F,
    /// The Jacobian of `map` with respect to the state
    pub jacobian: J,
}

impl<F, J> DifferentiableDynamics<F, J> {
    /// Creates differentiable dynamics from a transition function and its
    /// Jacobian.
    #[inline]
    pub fn new(map: F, jacobian: J) -> Self {
        Self { map, jacobian }
    }
}

impl<T, const N: usize, F, J> DynamicsModel<T, N> for DifferentiableDynamics<F, J>
where
    T: RealField + Copy,
    F: Fn(&StateVector<T, N>, T) -> StateVector<T, N>,
    J: Fn(&StateVector<T, N>, T) -> TransitionMatrix<T, N>,
{
    fn propagate(&self, estimate: &StateBelief<T, N>, dt: T) -> StateBelief<T, N> {
        let jac = (self.jacobian)(&estimate.mean, dt);
        StateBelief::new(
            (self.map)(&estimate.mean, dt),
            jac.propagate_covariance(&estimate.covariance),
        )
    }
}

// ============================================================================
// Sampled Dynamics
// ============================================================================

/// Nonlinear dynamics propagated through sigma points.
///
/// Draws a sigma-point set from the belief, pushes every point through `map`,
/// and recombines. No Jacobian is required; use this when the dynamics are
/// not differentiable or the linearization is too coarse.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct SampledDynamics<T: RealField, F> {
    /// The state transition function
    pub map: F,
    /// The sigma-point placement rule
    pub scheme: SigmaScheme<T>,
}

#[cfg(feature = "alloc")]
impl<T: RealField, F> SampledDynamics<T, F> {
    /// Creates sampled dynamics with the default (cubature) scheme.
    #[inline]
    pub fn new(map: F) -> Self {
        Self {
            map,
            scheme: SigmaScheme::Cubature,
        }
    }

    /// Creates sampled dynamics with an explicit scheme.
    #[inline]
    pub fn with_scheme(map: F, scheme: SigmaScheme<T>) -> Self {
        Self { map, scheme }
    }
}

#[cfg(feature = "alloc")]
impl<T, const N: usize, F> DynamicsModel<T, N> for SampledDynamics<T, F>
where
    T: RealField + Float + Copy,
    F: Fn(&StateVector<T, N>, T) -> StateVector<T, N>,
{
    fn propagate(&self, estimate: &StateBelief<T, N>, dt: T) -> StateBelief<T, N> {
        let sigma = SigmaPoints::sample(estimate, &self.scheme);
        sigma.recover_mean_cov(|point| (self.map)(point, dt))
    }
}

// ============================================================================
// Constant Velocity Model
// ============================================================================

/// Constant-velocity motion in the plane over the state `[x, y, vx, vy]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantVelocity2D;

impl ConstantVelocity2D {
    /// Builds the constant-velocity transition matrix for a time step.
    pub fn transition<T: RealField + Copy>(dt: T) -> TransitionMatrix<T, 4> {
        let one = T::one();
        let zero = T::zero();
        TransitionMatrix::from_matrix(nalgebra::matrix![
            one, zero, dt, zero;
            zero, one, zero, dt;
            zero, zero, one, zero;
            zero, zero, zero, one
        ])
    }
}

impl<T: RealField + Copy> DynamicsModel<T, 4> for ConstantVelocity2D {
    fn propagate(&self, estimate: &StateBelief<T, 4>, dt: T) -> StateBelief<T, 4> {
        let f = Self::transition(dt);
        StateBelief::new(
            f.apply_state(&estimate.mean),
            f.propagate_covariance(&estimate.covariance),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::spaces::StateCovariance;

    #[test]
    fn test_constant_velocity_propagation() {
        let belief = StateBelief::with_identity_covariance(StateVector::from_array([
            0.0, 0.0, 1.0, 2.0,
        ]));

        let propagated = ConstantVelocity2D.propagate(&belief, 2.0);
        assert!((propagated.mean.index(0) - 2.0).abs() < 1e-10);
        assert!((propagated.mean.index(1) - 4.0).abs() < 1e-10);
        assert!((propagated.mean.index(2) - 1.0).abs() < 1e-10);

        // Position variance picks up dt^2 from velocity uncertainty
        assert!((propagated.covariance.as_matrix()[(0, 0)] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_differentiable_matches_linear_on_linear_map() {
        let belief = StateBelief::new(
            StateVector::from_array([1.0, -1.0, 0.5, 0.25]),
            StateCovariance::from_diagonal(&nalgebra::vector![1.0, 2.0, 3.0, 4.0]),
        );

        let linear = LinearDynamics::new(ConstantVelocity2D::transition::<f64>);
        let differentiable = DifferentiableDynamics::new(
            |x: &StateVector<f64, 4>, dt: f64| {
                ConstantVelocity2D::transition(dt).apply_state(x)
            },
            |_x: &StateVector<f64, 4>, dt: f64| ConstantVelocity2D::transition(dt),
        );

        let a = linear.propagate(&belief, 0.5);
        let b = differentiable.propagate(&belief, 0.5);

        for i in 0..4 {
            assert!((a.mean.index(i) - b.mean.index(i)).abs() < 1e-12);
            for j in 0..4 {
                assert!(
                    (a.covariance.as_matrix()[(i, j)] - b.covariance.as_matrix()[(i, j)]).abs()
                        < 1e-12
                );
            }
        }
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_sampled_matches_linear_on_linear_map() {
        let belief = StateBelief::new(
            StateVector::from_array([1.0, -1.0, 0.5, 0.25]),
            StateCovariance::from_diagonal(&nalgebra::vector![1.0, 2.0, 3.0, 4.0]),
        );

        let linear = LinearDynamics::new(ConstantVelocity2D::transition::<f64>);
        let sampled = SampledDynamics::new(|x: &StateVector<f64, 4>, dt: f64| {
            ConstantVelocity2D::transition(dt).apply_state(x)
        });

        let a = linear.propagate(&belief, 0.5);
        let b = sampled.propagate(&belief, 0.5);

        for i in 0..4 {
            assert!((a.mean.index(i) - b.mean.index(i)).abs() < 1e-9);
            for j in 0..4 {
                assert!(
                    (a.covariance.as_matrix()[(i, j)] - b.covariance.as_matrix()[(i, j)]).abs()
                        < 1e-6
                );
            }
        }
    }
}
