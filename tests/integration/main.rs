//! Integration tests: boards, orchestration and the dashboard API driven
//! end to end against an in-memory forecast service.

mod mock_service;
mod pipeline;
