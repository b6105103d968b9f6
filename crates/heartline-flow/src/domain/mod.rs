//! Flow domain types.

pub mod input;
pub mod phase;
pub mod scoring;
