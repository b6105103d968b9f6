//! Content domain types.

pub mod scene;
