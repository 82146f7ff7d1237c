//! Mock forecast service for integration testing.
//!
//! Provides a deterministic `ForecastService` that serves a fixed fixture
//! listing, answers predictions from a per-matchup table and records
//! every request it receives. Individual home teams can be made to fail
//! or be held at a gate until the test releases them.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use footyforecast::service::ForecastService;
use footyforecast::types::{
    Fixture, ForecastError, PredictionPayload, PredictionRequest, ScorerRow, StandingsRow,
};

pub struct MockService {
    fixtures: Arc<Mutex<Vec<Fixture>>>,
    predictions: HashMap<(String, String), PredictionPayload>,
    requests: Arc<Mutex<Vec<PredictionRequest>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    gated: Arc<Mutex<HashSet<String>>>,
    gate: watch::Sender<bool>,
    /// If set, listing calls return this error.
    listing_error: Arc<Mutex<Option<String>>>,
}

impl MockService {
    pub fn new(fixtures: Vec<Fixture>) -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            fixtures: Arc::new(Mutex::new(fixtures)),
            predictions: HashMap::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            gated: Arc::new(Mutex::new(HashSet::new())),
            gate,
            listing_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Answer `home` v `away` (canonical names) with `payload`.
    pub fn with_prediction(mut self, home: &str, away: &str, payload: &str) -> Self {
        let payload = serde_json::from_str(payload).expect("valid payload JSON");
        self.predictions.insert((home.to_string(), away.to_string()), payload);
        self
    }

    pub fn set_fixtures(&self, fixtures: Vec<Fixture>) {
        *self.fixtures.lock().unwrap() = fixtures;
    }

    /// Fail every prediction request whose home team is `home`.
    pub fn fail_home(&self, home: &str) {
        self.failing.lock().unwrap().insert(home.to_string());
    }

    /// Hold prediction requests whose home team is `home` until `release`.
    pub fn hold_home(&self, home: &str) {
        self.gated.lock().unwrap().insert(home.to_string());
    }

    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    pub fn set_listing_error(&self, msg: &str) {
        *self.listing_error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn requests(&self) -> Vec<PredictionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn check_listing(&self, path: &str) -> Result<(), ForecastError> {
        match self.listing_error.lock().unwrap().as_ref() {
            Some(msg) => Err(ForecastError::transport(path, msg)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ForecastService for MockService {
    async fn fetch_fixtures(&self, path: &str) -> Result<Vec<Fixture>, ForecastError> {
        self.check_listing(path)?;
        Ok(self.fixtures.lock().unwrap().clone())
    }

    async fn fetch_table(&self, path: &str) -> Result<Vec<StandingsRow>, ForecastError> {
        self.check_listing(path)?;
        Ok(Vec::new())
    }

    async fn fetch_top_scorers(&self, path: &str) -> Result<Vec<ScorerRow>, ForecastError> {
        self.check_listing(path)?;
        Ok(Vec::new())
    }

    async fn fetch_badges(&self) -> Result<HashMap<String, String>, ForecastError> {
        Ok(HashMap::new())
    }

    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<Option<PredictionPayload>, ForecastError> {
        self.requests.lock().unwrap().push(request.clone());

        let held = self.gated.lock().unwrap().contains(&request.home_team);
        if held {
            let mut open = self.gate.subscribe();
            let _ = open.wait_for(|released| *released).await;
        }

        if self.failing.lock().unwrap().contains(&request.home_team) {
            return Err(ForecastError::transport("/predict", "HTTP 500: model unavailable"));
        }

        Ok(self
            .predictions
            .get(&(request.home_team.clone(), request.away_team.clone()))
            .cloned())
    }
}

/// A fixed reference instant for deterministic partitioning.
pub fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-14T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn fixture(id: u64, hours_from_now: i64, home: &str, away: &str) -> Fixture {
    Fixture {
        id: id.into(),
        kickoff: now() + Duration::hours(hours_from_now),
        venue: None,
        home_team: home.to_string(),
        away_team: away.to_string(),
    }
}
