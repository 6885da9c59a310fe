//! Sigma-point sampling and recombination
//!
//! A sigma-point set is a small weighted collection of vectors that is
//! statistically representative of a belief. Propagating the points through a
//! nonlinear map and recombining them (the unscented transform) approximates
//! the pushforward distribution to a bounded statistical order, without
//! explicit linearization.
//!
//! Two quadrature schemes are provided:
//!
//! - **Cubature**: 2N points at `mean ± sqrt(N) * col_i(sqrt(P))` with equal
//!   weights `1/(2N)`. Exact on linear maps; the default scheme.
//! - **Merwe scaled**: 2N+1 points with separate mean/covariance weights for
//!   the central point, controlled by the (alpha, beta, kappa) parameters.
//!
//! # Sampling never fails
//!
//! The required matrix square root uses the Cholesky factor when the
//! covariance is positive definite and otherwise retries with a vanishing
//! diagonal ridge, so sampling is total over all inputs (a degenerate
//! covariance yields degenerate points, not an error).

use alloc::vec::Vec;

use nalgebra::{RealField, SMatrix, SVector};
use num_traits::Float;

use crate::types::belief::{Belief, StateBelief};
use crate::types::spaces::{StateSpace, StateVector, Vector};
use crate::types::transforms::Transform;

// ============================================================================
// Sigma-Point Schemes
// ============================================================================

/// Selects the quadrature rule used to place sigma points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SigmaScheme<T: RealField> {
    /// Spherical cubature rule: 2N equally weighted points.
    Cubature,
    /// Van der Merwe scaled symmetric rule: 2N+1 points.
    ///
    /// Common choices: alpha=1e-3, beta=2, kappa=0. For Gaussian beliefs
    /// beta=2 is optimal.
    MerweScaled {
        /// Primary scaling parameter (controls sigma point spread)
        alpha: T,
        /// Secondary scaling parameter (prior knowledge of the distribution)
        beta: T,
        /// Tertiary scaling parameter
        kappa: T,
    },
}

impl<T: RealField> Default for SigmaScheme<T> {
    fn default() -> Self {
        SigmaScheme::Cubature
    }
}

impl<T: RealField + Float + Copy> SigmaScheme<T> {
    /// Creates a Merwe scaled scheme with the customary defaults
    /// (alpha=1e-3, beta=2, kappa=0).
    pub fn merwe_default() -> Self {
        SigmaScheme::MerweScaled {
            alpha: T::from_f64(1e-3).unwrap(),
            beta: T::from_f64(2.0).unwrap(),
            kappa: T::zero(),
        }
    }

    /// Computes the scaling parameter lambda = alpha^2 (n + kappa) - n.
    #[inline]
    fn lambda(alpha: T, kappa: T, n: usize) -> T {
        let n_t = T::from_usize(n).unwrap();
        alpha * alpha * (n_t + kappa) - n_t
    }
}

// ============================================================================
// Sigma Points
// ============================================================================

/// A weighted sigma-point set drawn from a state-space belief.
///
/// Point count depends on the scheme (2N for cubature, 2N+1 for Merwe).
/// The mean weights always sum to one; covariance weights may differ for the
/// central point under the Merwe rule.
#[derive(Debug, Clone)]
pub struct SigmaPoints<T: RealField, const N: usize> {
    /// The sigma points
    pub points: Vec<StateVector<T, N>>,
    /// Per-point weights for mean recombination
    pub mean_weights: Vec<T>,
    /// Per-point weights for covariance recombination
    pub cov_weights: Vec<T>,
}

impl<T: RealField + Float + Copy, const N: usize> SigmaPoints<T, N> {
    /// Draws a sigma-point set representative of the given belief.
    pub fn sample(belief: &StateBelief<T, N>, scheme: &SigmaScheme<T>) -> Self {
        let sqrt_p = belief.covariance.sqrt();

        match *scheme {
            SigmaScheme::Cubature => {
                let gamma = Float::sqrt(T::from_usize(N).unwrap());
                let weight = T::one() / T::from_usize(2 * N).unwrap();

                let mut points = Vec::with_capacity(2 * N);
                for i in 0..N {
                    let offset = sqrt_p.column(i).into_owned().scale(gamma);
                    points.push(StateVector::from_svector(
                        belief.mean.as_svector() + offset,
                    ));
                    points.push(StateVector::from_svector(
                        belief.mean.as_svector() - offset,
                    ));
                }

                Self {
                    points,
                    mean_weights: alloc::vec![weight; 2 * N],
                    cov_weights: alloc::vec![weight; 2 * N],
                }
            }
            SigmaScheme::MerweScaled { alpha, beta, kappa } => {
                let n_t = T::from_usize(N).unwrap();
                let lambda = SigmaScheme::lambda(alpha, kappa, N);
                let gamma = Float::sqrt(n_t + lambda);

                let weight_0_mean = lambda / (n_t + lambda);
                let weight_0_cov = weight_0_mean + (T::one() - alpha * alpha + beta);
                let weight_i = T::one() / (T::from_f64(2.0).unwrap() * (n_t + lambda));

                let mut points = Vec::with_capacity(2 * N + 1);
                let mut mean_weights = Vec::with_capacity(2 * N + 1);
                let mut cov_weights = Vec::with_capacity(2 * N + 1);

                points.push(belief.mean);
                mean_weights.push(weight_0_mean);
                cov_weights.push(weight_0_cov);

                for i in 0..N {
                    let offset = sqrt_p.column(i).into_owned().scale(gamma);
                    points.push(StateVector::from_svector(
                        belief.mean.as_svector() + offset,
                    ));
                    points.push(StateVector::from_svector(
                        belief.mean.as_svector() - offset,
                    ));
                    mean_weights.push(weight_i);
                    mean_weights.push(weight_i);
                    cov_weights.push(weight_i);
                    cov_weights.push(weight_i);
                }

                Self {
                    points,
                    mean_weights,
                    cov_weights,
                }
            }
        }
    }

    /// Recombines the point set itself into a belief (identity transform).
    pub fn statistics(&self) -> StateBelief<T, N> {
        self.recover_mean_cov(|x| *x)
    }

    /// Propagates every point through `transform` and recombines the results
    /// into a belief over the target space.
    pub fn recover_mean_cov<const D: usize, Space, F>(&self, transform: F) -> Belief<T, D, Space>
    where
        F: Fn(&StateVector<T, N>) -> Vector<T, D, Space>,
    {
        let transformed: Vec<SVector<T, D>> = self
            .points
            .iter()
            .map(|p| transform(p).into_svector())
            .collect();

        let mut mean = SVector::<T, D>::zeros();
        for (w, z) in self.mean_weights.iter().zip(&transformed) {
            mean += z.scale(*w);
        }

        let mut cov = SMatrix::<T, D, D>::zeros();
        for (w, z) in self.cov_weights.iter().zip(&transformed) {
            let diff = z - mean;
            cov += (diff * diff.transpose()).scale(*w);
        }

        Belief::new(
            Vector::from_svector(mean),
            crate::types::spaces::Covariance::from_matrix(cov),
        )
    }

    /// Computes the cross-covariance between the (mean-centered) state points
    /// and the (mean-centered) transformed points.
    ///
    /// This is the unscented cross-covariance estimator: the weighted sum of
    /// outer products of the two centered point sets.
    pub fn cross_covariance<const D: usize, Space, F>(
        &self,
        state_mean: &StateVector<T, N>,
        transform: F,
        transformed_mean: &Vector<T, D, Space>,
    ) -> Transform<T, N, D, StateSpace, Space>
    where
        F: Fn(&StateVector<T, N>) -> Vector<T, D, Space>,
    {
        let mut cross = SMatrix::<T, N, D>::zeros();
        for (w, point) in self.cov_weights.iter().zip(&self.points) {
            let state_diff = point.as_svector() - state_mean.as_svector();
            let trans_diff = transform(point).into_svector() - transformed_mean.as_svector();
            cross += (state_diff * trans_diff.transpose()).scale(*w);
        }

        Transform::from_matrix(cross)
    }
}

// ============================================================================
// Tests
// ============================================================================
