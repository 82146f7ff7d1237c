//! Wire shapes of the data service and their conversion to domain types.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::types::{Fixture, FixtureId, ScorerRow, StandingsRow};

#[derive(Debug, Deserialize)]
pub struct FixtureEnvelope {
    #[serde(default)]
    pub response: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct TableEnvelope {
    #[serde(default)]
    pub table: Vec<StandingsRow>,
}

#[derive(Debug, Deserialize)]
pub struct ScorersEnvelope {
    #[serde(default)]
    pub scorers: Vec<ScorerRow>,
}

#[derive(Debug, Deserialize)]
struct WireFixture {
    fixture: WireFixtureInfo,
    teams: WireTeams,
}

#[derive(Debug, Deserialize)]
struct WireFixtureInfo {
    id: serde_json::Value,
    date: String,
    #[serde(default)]
    venue: Option<WireVenue>,
}

#[derive(Debug, Deserialize)]
struct WireVenue {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTeams {
    home: WireTeam,
    away: WireTeam,
}

#[derive(Debug, Deserialize)]
struct WireTeam {
    name: String,
}

/// Parse a kickoff timestamp.
///
/// Accepts RFC 3339, a timestamp without offset (taken as UTC) and a bare
/// date (midnight UTC).
pub fn parse_kickoff(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_id(value: &serde_json::Value) -> Option<FixtureId> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(FixtureId(s.trim().to_string())),
        serde_json::Value::Number(n) => Some(FixtureId(n.to_string())),
        _ => None,
    }
}

fn parse_fixture(value: serde_json::Value) -> Option<Fixture> {
    let wire: WireFixture = serde_json::from_value(value).ok()?;
    let id = parse_id(&wire.fixture.id)?;
    let kickoff = parse_kickoff(&wire.fixture.date)?;
    let venue = wire
        .fixture
        .venue
        .and_then(|v| v.name)
        .filter(|name| !name.trim().is_empty());
    Some(Fixture {
        id,
        kickoff,
        venue,
        home_team: wire.teams.home.name,
        away_team: wire.teams.away.name,
    })
}

/// Convert a fixture envelope, skipping entries without a readable id or
/// kickoff.
pub fn fixtures_from_envelope(envelope: FixtureEnvelope) -> Vec<Fixture> {
    let total = envelope.response.len();
    let fixtures: Vec<Fixture> = envelope.response.into_iter().filter_map(parse_fixture).collect();
    if fixtures.len() < total {
        warn!(
            skipped = total - fixtures.len(),
            total,
            "Skipped unreadable fixture entries"
        );
    }
    fixtures
}

/// Parse a `{ "response": [...] }` document, e.g. a fallback dataset file.
pub fn parse_fixture_listing(json: &str) -> Result<Vec<Fixture>> {
    let envelope: FixtureEnvelope =
        serde_json::from_str(json).context("Invalid fixture listing JSON")?;
    Ok(fixtures_from_envelope(envelope))
}

/// Load a fallback fixture dataset from disk.
pub fn load_fixture_file(path: &str) -> Result<Vec<Fixture>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture file: {path}"))?;
    parse_fixture_listing(&json).with_context(|| format!("Failed to parse fixture file: {path}"))
}
