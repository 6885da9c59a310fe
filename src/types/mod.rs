//! Core types for type-safe vector spaces, transformations, and beliefs

pub mod belief;
pub mod spaces;
pub mod transforms;
