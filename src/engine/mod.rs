//! Core pipeline: fixture partitioning, prediction reduction, the
//! per-league orchestrator and the board that ties them to the listings.

pub mod partitioner;
pub mod reducer;
pub mod orchestrator;
pub mod board;
