//! Shared types for the FootyForecast pipeline.
//!
//! These types form the data model used across all modules: fixtures as
//! received from the data service, the per-fixture prediction request and
//! raw payload, and the normalized view handed to the rendering layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// Stable identifier of a single match.
///
/// The data service emits ids as numbers for some leagues and as strings for
/// others; both are carried as their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(pub String);

impl FixtureId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FixtureId {
    fn from(s: &str) -> Self {
        FixtureId(s.to_string())
    }
}

impl From<u64> for FixtureId {
    fn from(n: u64) -> Self {
        FixtureId(n.to_string())
    }
}

/// A scheduled or completed match. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub kickoff: DateTime<Utc>,
    pub venue: Option<String>,
    /// Home team name exactly as the source spelled it.
    pub home_team: String,
    /// Away team name exactly as the source spelled it.
    pub away_team: String,
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} vs {} ({})",
            self.id,
            self.home_team,
            self.away_team,
            self.kickoff.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

// ---------------------------------------------------------------------------
// Prediction request / payload
// ---------------------------------------------------------------------------

/// Body of one `POST /predict` call. Built per fixture, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    pub home_team: String,
    pub away_team: String,
    pub league: String,
}

/// Probability fields as the prediction service may spell them.
///
/// Each side has a long (`home_win`) and a short (`home`) key; the long key
/// wins when both are present. Non-numeric values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProbabilityFields {
    #[serde(default, deserialize_with = "lenient_number")]
    pub home_win: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub home: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub draw: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub away_win: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub away: Option<f64>,
}

impl ProbabilityFields {
    pub fn home_prob(&self) -> Option<f64> {
        self.home_win.or(self.home)
    }

    pub fn draw_prob(&self) -> Option<f64> {
        self.draw
    }

    pub fn away_prob(&self) -> Option<f64> {
        self.away_win.or(self.away)
    }
}

/// Raw response of the prediction service.
///
/// Probabilities may sit at the top level or nested under `probs`; the
/// nested object takes precedence field by field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionPayload {
    #[serde(default, deserialize_with = "lenient_probs")]
    pub probs: Option<ProbabilityFields>,
    #[serde(flatten)]
    pub top_level: ProbabilityFields,
    #[serde(default, deserialize_with = "lenient_score")]
    pub home_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub away_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub suggested: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub report: Option<String>,
}

impl PredictionPayload {
    pub fn home_prob(&self) -> Option<f64> {
        self.probs
            .as_ref()
            .and_then(ProbabilityFields::home_prob)
            .or_else(|| self.top_level.home_prob())
    }

    pub fn draw_prob(&self) -> Option<f64> {
        self.probs
            .as_ref()
            .and_then(ProbabilityFields::draw_prob)
            .or_else(|| self.top_level.draw_prob())
    }

    pub fn away_prob(&self) -> Option<f64> {
        self.probs
            .as_ref()
            .and_then(ProbabilityFields::away_prob)
            .or_else(|| self.top_level.away_prob())
    }

    /// Both scores, only when both are present as integral numbers.
    pub fn scoreline(&self) -> Option<PredictedScore> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some(PredictedScore { home, away }),
            _ => None,
        }
    }

    /// The outcome the payload asserts explicitly, if it is recognisable.
    pub fn asserted_outcome(&self) -> Option<Outcome> {
        self.suggested.as_deref().and_then(Outcome::parse)
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(String::from)))
}

fn lenient_probs<'de, D>(deserializer: D) -> Result<Option<ProbabilityFields>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

// ---------------------------------------------------------------------------
// Prediction view
// ---------------------------------------------------------------------------

/// Single suggested result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// Case-insensitive parse; accepts the `*_win` spellings the service
    /// uses for probability keys. Empty or unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "home_win" => Some(Outcome::Home),
            "draw" => Some(Outcome::Draw),
            "away" | "away_win" => Some(Outcome::Away),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Home => write!(f, "home"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::Away => write!(f, "away"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedScore {
    pub home: i64,
    pub away: i64,
}

/// Normalized prediction for one fixture. Derived, never persisted.
///
/// Probabilities are reported as received; they are not rescaled to sum
/// to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionView {
    pub home_prob: f64,
    pub draw_prob: f64,
    pub away_prob: f64,
    /// `None` only for the zero view produced from an absent payload.
    pub suggested: Option<Outcome>,
    pub predicted_score: Option<PredictedScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl PredictionView {
    /// The view of an absent payload.
    pub fn zero() -> Self {
        Self {
            home_prob: 0.0,
            draw_prob: 0.0,
            away_prob: 0.0,
            suggested: None,
            predicted_score: None,
            report: None,
        }
    }
}

/// Fixture id → view for one league's current selection.
pub type PredictionMap = HashMap<FixtureId, PredictionView>;

/// What the rendering layer shows for a fixture in the selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictionStatus {
    Pending,
    Ready(PredictionView),
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// One row of a league table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    #[serde(default)]
    pub pos: u32,
    pub team: String,
    #[serde(default)]
    pub played: u32,
    #[serde(default)]
    pub won: u32,
    #[serde(default)]
    pub drawn: u32,
    #[serde(default)]
    pub lost: u32,
    #[serde(default)]
    pub gf: u32,
    #[serde(default)]
    pub ga: u32,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub form: Vec<String>,
}

impl StandingsRow {
    pub fn goal_difference(&self) -> i64 {
        self.gf as i64 - self.ga as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerRow {
    pub player: String,
    pub team: String,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub photo_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for FootyForecast.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// Any GET/POST failure: connect, non-success status, or undecodable body.
    #[error("Transport error ({endpoint}): {message}")]
    Transport { endpoint: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ForecastError {
    pub fn transport(endpoint: impl Into<String>, message: impl fmt::Display) -> Self {
        ForecastError::Transport {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
