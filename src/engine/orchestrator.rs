//! Per-fixture prediction orchestration.
//!
//! One `PredictionOrchestrator` per league. Each change of the fixture
//! selection starts a fresh `PredictionRun`, which issues one prediction
//! request per fixture strictly in fixture order and, once settled, replaces
//! the published `PredictionMap` in a single step.
//!
//! Selecting again supersedes the run in flight: its cancellation flag is
//! set, and the run drops whatever completes afterwards instead of
//! publishing it. Requests already sent are not aborted.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::reducer::reduce;
use crate::service::ForecastService;
use crate::teams::TeamIdentityResolver;
use crate::types::{Fixture, FixtureId, PredictionMap, PredictionRequest, PredictionStatus};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Lifecycle of the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// No fixtures selected.
    Idle,
    /// Requests for `generation` in flight.
    Fetching { generation: u64, fixtures: usize },
    /// Every request of `generation` completed or failed.
    Settled {
        generation: u64,
        succeeded: usize,
        failed: usize,
    },
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Settled {
        run_id: Uuid,
        generation: u64,
        succeeded: usize,
        failed: usize,
    },
    /// Superseded by a newer selection; nothing was published.
    Cancelled {
        run_id: Uuid,
        generation: u64,
        completed: usize,
    },
}

impl RunReport {
    pub fn is_settled(&self) -> bool {
        matches!(self, RunReport::Settled { .. })
    }
}

struct Published {
    generation: u64,
    state: RunState,
    predictions: PredictionMap,
    cancel: Option<Arc<AtomicBool>>,
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Read side of an orchestrator, handed to the rendering layer.
#[derive(Clone)]
pub struct PredictionReader {
    published: Arc<RwLock<Published>>,
}

impl PredictionReader {
    pub async fn state(&self) -> RunState {
        self.published.read().await.state.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.published.read().await.generation
    }

    /// Copy of the published map.
    pub async fn predictions(&self) -> PredictionMap {
        self.published.read().await.predictions.clone()
    }

    /// `Pending` until the fixture's view has been published.
    pub async fn status(&self, fixture_id: &FixtureId) -> PredictionStatus {
        match self.published.read().await.predictions.get(fixture_id) {
            Some(view) => PredictionStatus::Ready(view.clone()),
            None => PredictionStatus::Pending,
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct PredictionOrchestrator {
    league_tag: String,
    service: Arc<dyn ForecastService>,
    resolver: Arc<TeamIdentityResolver>,
    published: Arc<RwLock<Published>>,
}

impl PredictionOrchestrator {
    pub fn new(
        league_tag: impl Into<String>,
        service: Arc<dyn ForecastService>,
        resolver: Arc<TeamIdentityResolver>,
    ) -> Self {
        Self {
            league_tag: league_tag.into(),
            service,
            resolver,
            published: Arc::new(RwLock::new(Published {
                generation: 0,
                state: RunState::Idle,
                predictions: PredictionMap::new(),
                cancel: None,
            })),
        }
    }

    pub fn reader(&self) -> PredictionReader {
        PredictionReader {
            published: Arc::clone(&self.published),
        }
    }

    /// Make `fixtures` the current selection.
    ///
    /// Cancels the run in flight, clears the published map and returns the
    /// run to drive for the new selection, or `None` (Idle) when the
    /// selection is empty.
    pub async fn select(&self, fixtures: &[Fixture]) -> Option<PredictionRun> {
        let requests: Vec<(FixtureId, PredictionRequest)> = fixtures
            .iter()
            .map(|f| {
                let request = PredictionRequest {
                    home_team: self.resolver.canonicalize(&f.home_team),
                    away_team: self.resolver.canonicalize(&f.away_team),
                    league: self.league_tag.clone(),
                };
                (f.id.clone(), request)
            })
            .collect();

        let mut published = self.published.write().await;
        if let Some(previous) = published.cancel.take() {
            previous.store(true, Ordering::Release);
            debug!(
                league = %self.league_tag,
                generation = published.generation,
                "Superseded run cancelled"
            );
        }
        published.generation += 1;
        published.predictions = PredictionMap::new();

        if requests.is_empty() {
            published.state = RunState::Idle;
            info!(league = %self.league_tag, "Selection empty, orchestrator idle");
            return None;
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        published.cancel = Some(Arc::clone(&cancelled));
        published.state = RunState::Fetching {
            generation: published.generation,
            fixtures: requests.len(),
        };

        Some(PredictionRun {
            run_id: Uuid::new_v4(),
            generation: published.generation,
            league_tag: self.league_tag.clone(),
            requests,
            cancelled,
            service: Arc::clone(&self.service),
            published: Arc::clone(&self.published),
        })
    }

    /// Select `fixtures` and drive the resulting run to completion.
    pub async fn select_and_run(&self, fixtures: &[Fixture]) -> Option<RunReport> {
        match self.select(fixtures).await {
            Some(run) => Some(run.execute().await),
            None => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// One orchestration pass over a fixed selection. Built by
/// `PredictionOrchestrator::select`, consumed by `execute`.
pub struct PredictionRun {
    run_id: Uuid,
    generation: u64,
    league_tag: String,
    requests: Vec<(FixtureId, PredictionRequest)>,
    cancelled: Arc<AtomicBool>,
    service: Arc<dyn ForecastService>,
    published: Arc<RwLock<Published>>,
}

impl PredictionRun {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn requests(&self) -> &[(FixtureId, PredictionRequest)] {
        &self.requests
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn cancelled_report(&self, completed: usize) -> RunReport {
        debug!(
            run_id = %self.run_id,
            league = %self.league_tag,
            generation = self.generation,
            completed,
            "Run superseded, results dropped"
        );
        RunReport::Cancelled {
            run_id: self.run_id,
            generation: self.generation,
            completed,
        }
    }

    /// Issue every request in order, then publish the buffer if this run is
    /// still current.
    pub async fn execute(self) -> RunReport {
        info!(
            run_id = %self.run_id,
            league = %self.league_tag,
            generation = self.generation,
            fixtures = self.requests.len(),
            "Prediction run started"
        );

        let mut buffer = PredictionMap::with_capacity(self.requests.len());
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for (fixture_id, request) in &self.requests {
            if self.is_cancelled() {
                return self.cancelled_report(succeeded + failed);
            }

            let result = self.service.predict(request).await;

            if self.is_cancelled() {
                return self.cancelled_report(succeeded + failed + 1);
            }

            match result {
                Ok(payload) => {
                    buffer.insert(fixture_id.clone(), reduce(payload.as_ref()));
                    succeeded += 1;
                }
                Err(e) => {
                    warn!(
                        run_id = %self.run_id,
                        fixture_id = %fixture_id,
                        home = %request.home_team,
                        away = %request.away_team,
                        error = %e,
                        "Prediction failed, fixture stays pending"
                    );
                    failed += 1;
                }
            }
        }

        let mut published = self.published.write().await;
        if published.generation != self.generation || self.is_cancelled() {
            drop(published);
            return self.cancelled_report(succeeded + failed);
        }

        published.predictions = buffer;
        published.state = RunState::Settled {
            generation: self.generation,
            succeeded,
            failed,
        };
        published.cancel = None;
        drop(published);

        info!(
            run_id = %self.run_id,
            league = %self.league_tag,
            generation = self.generation,
            succeeded,
            failed,
            "Prediction run settled"
        );

        RunReport::Settled {
            run_id: self.run_id,
            generation: self.generation,
            succeeded,
            failed,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
