//! FootyForecast: fixture boards and match predictions per league.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod teams;
pub mod service;
pub mod engine;
pub mod dashboard;
