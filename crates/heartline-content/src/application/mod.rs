//! Scene bank services.

pub mod bank;
pub mod loader;
