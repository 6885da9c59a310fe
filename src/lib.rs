//! Credence: recursive Bayesian state estimation
//!
//! A type-safe implementation of the predict / observe / assimilate cycle for
//! tracking a hidden state from noisy, asynchronously arriving observations.
//!
//! # Features
//!
//! - **Type Safety**: State and observation spaces encoded in the type system
//! - **Compile-Time Checks**: Dimension mismatches caught at compile time
//! - **Explicit Dispatch**: EKF-style (differentiable) and UKF-style
//!   (sigma-point) propagation selected by concrete strategy types, never by
//!   implicit detection
//! - **no_std Support**: The differentiable paths work without `alloc`;
//!   sigma-point sampling requires the `alloc` feature

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod estimator;
pub mod models;
pub mod noise;
#[cfg(feature = "alloc")]
pub mod sigma;
pub mod time;
pub mod types;

pub mod prelude {
    pub use crate::estimator::StateEstimator;
    pub use crate::models::*;
    pub use crate::noise::*;
    #[cfg(feature = "alloc")]
    pub use crate::sigma::{SigmaPoints, SigmaScheme};
    pub use crate::time::TimePoint;
    pub use crate::types::belief::*;
    pub use crate::types::spaces::*;
    pub use crate::types::transforms::*;
    pub use crate::{EstimatorError, Result};
}

/// Error types for the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstimatorError {
    /// `predict` was asked to wind the estimator back to an earlier time
    InvalidTimeOrder,
}

#[cfg(feature = "std")]
impl std::error::Error for EstimatorError {}

impl ::core::fmt::Display for EstimatorError {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            EstimatorError::InvalidTimeOrder => {
                write!(f, "target time precedes the estimator's current time")
            }
        }
    }
}

pub type Result<T> = ::core::result::Result<T, EstimatorError>;
