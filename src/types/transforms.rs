//! Typed transformation matrices
//!
//! Matrices that transform vectors between spaces, with type-level
//! encoding of source and target spaces.

use ::core::marker::PhantomData;
use nalgebra::{RealField, SMatrix, Scalar};

use super::spaces::{
    ObservationCovariance, ObservationSpace, ObservationVector, StateCovariance, StateSpace,
    StateVector, Vector,
};

// ============================================================================
// Transform Matrix
// ============================================================================

/// A transformation matrix that maps vectors from one space to another.
///
/// # Type Parameters
///
/// - `T`: Scalar type
/// - `ROWS`: Number of rows (dimension of target space)
/// - `COLS`: Number of columns (dimension of source space)
/// - `To`: Target space marker
/// - `From`: Source space marker
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Transform<T: Scalar, const ROWS: usize, const COLS: usize, To, From> {
    inner: SMatrix<T, ROWS, COLS>,
    _marker: PhantomData<(To, From)>,
}

impl<T: Scalar, const ROWS: usize, const COLS: usize, To, From> Transform<T, ROWS, COLS, To, From> {
    /// Creates a transform from a raw matrix.
    #[inline]
    pub fn from_matrix(inner: SMatrix<T, ROWS, COLS>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the underlying matrix.
    #[inline]
    pub fn as_matrix(&self) -> &SMatrix<T, ROWS, COLS> {
        &self.inner
    }

    /// Consumes self and returns the underlying matrix.
    #[inline]
    pub fn into_matrix(self) -> SMatrix<T, ROWS, COLS> {
        self.inner
    }
}

impl<T: Scalar + Copy, const ROWS: usize, const COLS: usize, To: Clone, From: Clone> Copy
    for Transform<T, ROWS, COLS, To, From>
where
    SMatrix<T, ROWS, COLS>: Copy,
{
}

impl<T: RealField + Copy, const ROWS: usize, const COLS: usize, To, From>
    Transform<T, ROWS, COLS, To, From>
{
    /// Creates a zero transform.
    #[inline]
    pub fn zeros() -> Self {
        Self {
            inner: SMatrix::zeros(),
            _marker: PhantomData,
        }
    }

    /// Returns the transpose of this transform.
    ///
    /// The transpose maps from `To` to `From` (reversed).
    #[inline]
    pub fn transpose(&self) -> Transform<T, COLS, ROWS, From, To> {
        Transform {
            inner: self.inner.transpose(),
            _marker: PhantomData,
        }
    }

    /// Applies the transform to a vector in the source space.
    #[inline]
    pub fn apply(&self, v: &Vector<T, COLS, From>) -> Vector<T, ROWS, To> {
        Vector::from_svector(self.inner * v.as_svector())
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// State transition matrix: StateSpace -> StateSpace
pub type TransitionMatrix<T, const N: usize> = Transform<T, N, N, StateSpace, StateSpace>;

/// Observation matrix (or observation Jacobian): StateSpace -> ObservationSpace
pub type ObservationMatrix<T, const M: usize, const N: usize> =
    Transform<T, M, N, ObservationSpace, StateSpace>;

/// Cross-covariance between state and observation: Cov(state, observation).
///
/// An N_state x N_obs matrix; the central quantity for computing the Kalman
/// gain during assimilation.
pub type CrossCovariance<T, const N: usize, const M: usize> =
    Transform<T, N, M, StateSpace, ObservationSpace>;

// ============================================================================
// Specific Transform Applications
// ============================================================================

impl<T: RealField + Copy, const N: usize> TransitionMatrix<T, N> {
    /// Creates an identity transition matrix.
    #[inline]
    pub fn identity() -> Self {
        Self {
            inner: SMatrix::identity(),
            _marker: PhantomData,
        }
    }

    /// Applies the transition to a state vector.
    #[inline]
    pub fn apply_state(&self, state: &StateVector<T, N>) -> StateVector<T, N> {
        StateVector::from_svector(self.inner * state.as_svector())
    }

    /// Propagates a covariance matrix: F * P * F^T
    #[inline]
    pub fn propagate_covariance(&self, cov: &StateCovariance<T, N>) -> StateCovariance<T, N> {
        StateCovariance::from_matrix(self.inner * cov.as_matrix() * self.inner.transpose())
    }
}

impl<T: RealField + Copy, const M: usize, const N: usize> ObservationMatrix<T, M, N> {
    /// Applies the observation map to a state vector.
    #[inline]
    pub fn observe(&self, state: &StateVector<T, N>) -> ObservationVector<T, M> {
        ObservationVector::from_svector(self.inner * state.as_svector())
    }

    /// Projects state covariance into observation space: H * P * H^T
    #[inline]
    pub fn project_covariance(&self, cov: &StateCovariance<T, N>) -> ObservationCovariance<T, M> {
        ObservationCovariance::from_matrix(self.inner * cov.as_matrix() * self.inner.transpose())
    }

    /// Computes the cross-covariance P * H^T for a linearized observation map.
    #[inline]
    pub fn cross_covariance(&self, cov: &StateCovariance<T, N>) -> CrossCovariance<T, N, M> {
        CrossCovariance::from_matrix(cov.as_matrix() * self.inner.transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_matrix() {
        // Simple 2D constant velocity model
        let dt = 1.0_f64;
        let f = TransitionMatrix::<f64, 4>::from_matrix(nalgebra::matrix![
            1.0, 0.0, dt, 0.0;
            0.0, 1.0, 0.0, dt;
            0.0, 0.0, 1.0, 0.0;
            0.0, 0.0, 0.0, 1.0
        ]);

        let state = StateVector::from_array([0.0, 0.0, 1.0, 2.0]);
        let predicted = f.apply_state(&state);

        assert!((predicted.index(0) - 1.0).abs() < 1e-10);
        assert!((predicted.index(1) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_observation_matrix() {
        // Observe position only from [x, y, vx, vy]
        let h = ObservationMatrix::<f64, 2, 4>::from_matrix(nalgebra::matrix![
            1.0, 0.0, 0.0, 0.0;
            0.0, 1.0, 0.0, 0.0
        ]);

        let state = StateVector::from_array([10.0, 20.0, 1.0, 2.0]);
        let observation = h.observe(&state);

        assert!((observation.index(0) - 10.0).abs() < 1e-10);
        assert!((observation.index(1) - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_covariance_projection() {
        let h = ObservationMatrix::<f64, 2, 4>::from_matrix(nalgebra::matrix![
            1.0, 0.0, 0.0, 0.0;
            0.0, 1.0, 0.0, 0.0
        ]);
        let p = StateCovariance::from_matrix(nalgebra::SMatrix::<f64, 4, 4>::identity().scale(2.0));

        let projected = h.project_covariance(&p);
        assert!((projected.trace() - 4.0).abs() < 1e-10);

        // Cross-covariance P * H^T picks out the first two columns of P
        let cross = h.cross_covariance(&p);
        assert!((cross.as_matrix()[(0, 0)] - 2.0).abs() < 1e-10);
        assert!((cross.as_matrix()[(2, 0)] - 0.0).abs() < 1e-10);
    }
}
