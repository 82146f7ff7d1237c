//! HTTP client for the FootyForecast data and prediction service.
//!
//! Listing endpoints: `GET /fixtures`, `/table`, `/top_scorers` and their
//! per-league variants (paths come from config). Predictions: `POST /predict`
//! with `{ home_team, away_team, league }`. Badges: `GET /logos`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::wire::{fixtures_from_envelope, FixtureEnvelope, ScorersEnvelope, TableEnvelope};
use super::ForecastService;
use crate::config::ServiceConfig;
use crate::types::{
    Fixture, ForecastError, PredictionPayload, PredictionRequest, ScorerRow, StandingsRow,
};

const PREDICT_PATH: &str = "/predict";
const LOGOS_PATH: &str = "/logos";

/// reqwest-backed `ForecastService`.
pub struct HttpForecastService {
    http: Client,
    base_url: String,
}

impl HttpForecastService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to build HTTP client for forecast service")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ForecastError> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ForecastError::transport(path, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ForecastError::transport(path, format!("HTTP {status}: {body}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| ForecastError::transport(path, format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl ForecastService for HttpForecastService {
    async fn fetch_fixtures(&self, path: &str) -> Result<Vec<Fixture>, ForecastError> {
        let envelope: FixtureEnvelope = self.get_json(path).await?;
        Ok(fixtures_from_envelope(envelope))
    }

    async fn fetch_table(&self, path: &str) -> Result<Vec<StandingsRow>, ForecastError> {
        let envelope: TableEnvelope = self.get_json(path).await?;
        Ok(envelope.table)
    }

    async fn fetch_top_scorers(&self, path: &str) -> Result<Vec<ScorerRow>, ForecastError> {
        let envelope: ScorersEnvelope = self.get_json(path).await?;
        Ok(envelope.scorers)
    }

    async fn fetch_badges(&self) -> Result<HashMap<String, String>, ForecastError> {
        self.get_json(LOGOS_PATH).await
    }

    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<Option<PredictionPayload>, ForecastError> {
        let url = self.url(PREDICT_PATH);
        debug!(
            home = %request.home_team,
            away = %request.away_team,
            league = %request.league,
            "POST /predict"
        );

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ForecastError::transport(PREDICT_PATH, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ForecastError::transport(PREDICT_PATH, format!("HTTP {status}: {body}")));
        }

        resp.json::<Option<PredictionPayload>>()
            .await
            .map_err(|e| ForecastError::transport(PREDICT_PATH, format!("invalid response body: {e}")))
    }
}
