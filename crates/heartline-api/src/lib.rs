//! Heartline: HTTP boundary and composition root.
//!
//! The game loop runs in its own task; handlers only forward player signals
//! into it and read the latest snapshot it published.

pub mod error;
pub mod presenter;
pub mod routes;
pub mod state;
