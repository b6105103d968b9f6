//! Heartline Core: shared abstractions.
//!
//! This crate defines the error taxonomy, configuration, and the determinism
//! and persistence seams that every other Heartline crate depends on. It
//! contains no infrastructure code.

pub mod config;
pub mod error;
pub mod progress;
pub mod rng;
