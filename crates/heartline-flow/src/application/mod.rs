//! Orchestration services.

pub mod builder;
pub mod orchestrator;
pub mod presenter;
