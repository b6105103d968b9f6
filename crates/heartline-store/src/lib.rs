//! Heartline: progress persistence adapters.

pub mod json_file_progress_store;
