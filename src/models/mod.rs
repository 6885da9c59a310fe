//! Dynamics and observation models
//!
//! Models are the pluggable strategy types of the estimation cycle: a
//! dynamics model propagates a state belief forward in time, and an observer
//! model projects a state belief into an observation space. Both come in a
//! differentiable (linearizing) flavor and a sigma-point (sampling) flavor,
//! selected explicitly by the type the caller hands in.

mod dynamics;
mod observer;

pub use dynamics::*;
pub use observer::*;
