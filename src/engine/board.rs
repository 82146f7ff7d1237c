//! Per-league board: listing ingestion, degraded mode and the snapshot
//! handed to the rendering layer.
//!
//! A board refreshes its fixtures, table and scorers from the service,
//! partitions the fixtures, and feeds the upcoming subset to its
//! `PredictionOrchestrator` whenever that selection changes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::orchestrator::{PredictionOrchestrator, PredictionReader, PredictionRun, RunState};
use super::partitioner::FixturePartitioner;
use crate::config::LeagueConfig;
use crate::service::ForecastService;
use crate::teams::TeamIdentityResolver;
use crate::types::{Fixture, FixtureId, PredictionStatus, ScorerRow, StandingsRow};

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamCard {
    pub name: String,
    /// Absent when no badge is known; the image is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureCard {
    pub id: FixtureId,
    pub kickoff: DateTime<Utc>,
    pub venue: Option<String>,
    pub home: TeamCard,
    pub away: TeamCard,
    /// Present for upcoming fixtures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionStatus>,
}

/// Everything the rendering layer needs for one league.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub key: String,
    pub name: String,
    /// Fixtures come from the static fallback dataset, not the live service.
    pub degraded: bool,
    pub messages: Vec<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub predictions: RunState,
    pub upcoming: Vec<FixtureCard>,
    pub recent: Vec<FixtureCard>,
    pub table: Vec<StandingsRow>,
    pub scorers: Vec<ScorerRow>,
}

#[derive(Debug, Default)]
struct Listings {
    upcoming: Vec<Fixture>,
    recent: Vec<Fixture>,
    table: Vec<StandingsRow>,
    scorers: Vec<ScorerRow>,
    degraded: bool,
    messages: Vec<String>,
    refreshed_at: Option<DateTime<Utc>>,
    selection: Vec<FixtureId>,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

pub struct LeagueBoard {
    league: LeagueConfig,
    service: Arc<dyn ForecastService>,
    resolver: Arc<TeamIdentityResolver>,
    partitioner: FixturePartitioner,
    orchestrator: PredictionOrchestrator,
    fallback: Option<Vec<Fixture>>,
    listings: RwLock<Listings>,
}

impl LeagueBoard {
    pub fn new(
        league: LeagueConfig,
        recent_window: usize,
        service: Arc<dyn ForecastService>,
        resolver: Arc<TeamIdentityResolver>,
    ) -> Self {
        let partitioner =
            FixturePartitioner::new(league.upcoming_window).with_recent_window(recent_window);
        let orchestrator =
            PredictionOrchestrator::new(league.tag.clone(), Arc::clone(&service), Arc::clone(&resolver));
        Self {
            league,
            service,
            resolver,
            partitioner,
            orchestrator,
            fallback: None,
            listings: RwLock::new(Listings::default()),
        }
    }

    /// Static fixtures shown, flagged as degraded, when the live listing fails.
    pub fn with_fallback(mut self, fixtures: Vec<Fixture>) -> Self {
        self.fallback = Some(fixtures);
        self
    }

    pub fn key(&self) -> &str {
        &self.league.key
    }

    pub fn name(&self) -> &str {
        &self.league.name
    }

    pub fn predictions(&self) -> PredictionReader {
        self.orchestrator.reader()
    }

    /// Reload every listing and update the prediction selection.
    ///
    /// Returns the run to drive when the upcoming selection changed; an
    /// unchanged selection keeps its published predictions.
    pub async fn refresh(&self, now: DateTime<Utc>) -> Option<PredictionRun> {
        let league = &self.league;
        let mut messages = Vec::new();

        let recent_fetch = async {
            match &league.recent_path {
                Some(path) => Some(self.service.fetch_fixtures(path).await),
                None => None,
            }
        };

        let (fixtures, table, scorers, recent_listing) = tokio::join!(
            self.service.fetch_fixtures(&league.fixtures_path),
            self.service.fetch_table(&league.table_path),
            self.service.fetch_top_scorers(&league.scorers_path),
            recent_fetch,
        );

        // `None` keeps the previous listing and selection.
        let fresh = match fixtures {
            Ok(fixtures) => Some((fixtures, false)),
            Err(e) => {
                warn!(league = %league.key, error = %e, "Fixture listing failed");
                match &self.fallback {
                    Some(fallback) => {
                        warn!(
                            league = %league.key,
                            fixtures = fallback.len(),
                            "Entering degraded mode with fallback fixtures"
                        );
                        messages.push(format!(
                            "Live {} fixtures unavailable; showing fallback schedule.",
                            league.name
                        ));
                        Some((fallback.clone(), true))
                    }
                    None => {
                        messages.push(format!(
                            "Failed to load {} fixtures; showing the last listing.",
                            league.name
                        ));
                        None
                    }
                }
            }
        };

        let table = table.unwrap_or_else(|e| {
            warn!(league = %league.key, error = %e, "Table listing failed");
            messages.push(format!("Failed to load {} table.", league.name));
            Vec::new()
        });

        let scorers = scorers.unwrap_or_else(|e| {
            warn!(league = %league.key, error = %e, "Top scorers listing failed");
            messages.push(format!("Failed to load {} top scorers.", league.name));
            Vec::new()
        });

        let mut listings = self.listings.write().await;

        let (upcoming, listing_recent, degraded) = match fresh {
            Some((fixtures, degraded)) => {
                let partition = self.partitioner.partition(&fixtures, now);
                (partition.upcoming, partition.recent, degraded)
            }
            None => (listings.upcoming.clone(), listings.recent.clone(), listings.degraded),
        };
        let recent = match recent_listing {
            None => listing_recent,
            Some(Ok(listing)) => self.partitioner.partition(&listing, now).recent,
            Some(Err(e)) => {
                warn!(league = %league.key, error = %e, "Recent results listing failed");
                messages.push(format!("Failed to load {} recent results.", league.name));
                Vec::new()
            }
        };
        let selection: Vec<FixtureId> = upcoming.iter().map(|f| f.id.clone()).collect();

        let changed = listings.selection != selection;

        info!(
            league = %league.key,
            upcoming = upcoming.len(),
            recent = recent.len(),
            table = table.len(),
            scorers = scorers.len(),
            degraded,
            selection_changed = changed,
            "Board refreshed"
        );

        *listings = Listings {
            upcoming: upcoming.clone(),
            recent,
            table,
            scorers,
            degraded,
            messages,
            refreshed_at: Some(now),
            selection,
        };

        // Select while the listings lock is held so the stored selection
        // always matches the orchestrator's current generation.
        if changed {
            self.orchestrator.select(&upcoming).await
        } else {
            None
        }
    }

    fn card(&self, fixture: &Fixture, prediction: Option<PredictionStatus>) -> FixtureCard {
        let (home, home_badge) = self.resolver.resolve(&fixture.home_team);
        let (away, away_badge) = self.resolver.resolve(&fixture.away_team);
        FixtureCard {
            id: fixture.id.clone(),
            kickoff: fixture.kickoff,
            venue: fixture.venue.clone(),
            home: TeamCard { name: home, badge: home_badge },
            away: TeamCard { name: away, badge: away_badge },
            prediction,
        }
    }

    /// Current view of the board for the rendering layer.
    pub async fn snapshot(&self) -> BoardSnapshot {
        let listings = self.listings.read().await;
        let reader = self.orchestrator.reader();
        let state = reader.state().await;
        let predictions = reader.predictions().await;

        let upcoming = listings
            .upcoming
            .iter()
            .map(|f| {
                let status = match predictions.get(&f.id) {
                    Some(view) => PredictionStatus::Ready(view.clone()),
                    None => PredictionStatus::Pending,
                };
                self.card(f, Some(status))
            })
            .collect();
        let recent = listings.recent.iter().map(|f| self.card(f, None)).collect();

        BoardSnapshot {
            key: self.league.key.clone(),
            name: self.league.name.clone(),
            degraded: listings.degraded,
            messages: listings.messages.clone(),
            refreshed_at: listings.refreshed_at,
            predictions: state,
            upcoming,
            recent,
            table: listings.table.clone(),
            scorers: listings.scorers.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
