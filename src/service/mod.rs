//! Data and prediction service integration.
//!
//! Defines the `ForecastService` trait the pipeline consumes and provides
//! the reqwest-backed HTTP implementation.

pub mod http;
pub mod wire;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::types::{
    Fixture, ForecastError, PredictionPayload, PredictionRequest, ScorerRow, StandingsRow,
};

/// Abstraction over the external sports-data and prediction service.
///
/// Every failure surfaces as `ForecastError::Transport`; callers decide
/// whether to report, fall back or suppress.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForecastService: Send + Sync {
    /// `GET <path>` → `{ response: Fixture[] }`.
    async fn fetch_fixtures(&self, path: &str) -> Result<Vec<Fixture>, ForecastError>;

    /// `GET <path>` → `{ table: StandingsRow[] }`.
    async fn fetch_table(&self, path: &str) -> Result<Vec<StandingsRow>, ForecastError>;

    /// `GET <path>` → `{ scorers: ScorerRow[] }`.
    async fn fetch_top_scorers(&self, path: &str) -> Result<Vec<ScorerRow>, ForecastError>;

    /// `GET /logos` → canonical team name → badge URL.
    async fn fetch_badges(&self) -> Result<HashMap<String, String>, ForecastError>;

    /// `POST /predict`. A JSON `null` body is an absent payload.
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<Option<PredictionPayload>, ForecastError>;
}
