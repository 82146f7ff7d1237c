//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! One `[[leagues]]` entry per league names the listing endpoints, the
//! matchday window, an optional fallback dataset and extra team aliases.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;

use crate::types::ForecastError;

/// Size of the recent-results window when the config does not set one.
pub const DEFAULT_RECENT_WINDOW: usize = 5;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub service: ServiceConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub teams: TeamsConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    pub leagues: Vec<LeagueConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recent_window: DEFAULT_RECENT_WINDOW,
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TeamsConfig {
    /// JSON object of canonical team name → badge URL.
    #[serde(default)]
    pub badges_file: Option<String>,
    /// Load the badge table from the service's `/logos` endpoint at startup.
    #[serde(default)]
    pub fetch_badges: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LeagueConfig {
    /// Short route key, e.g. `epl`.
    pub key: String,
    pub name: String,
    /// Value sent as `league` in prediction requests.
    pub tag: String,
    pub fixtures_path: String,
    pub table_path: String,
    pub scorers_path: String,
    /// Dedicated recent-results listing; recent fixtures are otherwise
    /// taken from the fixtures listing.
    #[serde(default)]
    pub recent_path: Option<String>,
    /// Matchday window: how many upcoming fixtures are selected.
    pub upcoming_window: usize,
    /// Static fixture dataset used when the live listing fails.
    #[serde(default)]
    pub fallback_file: Option<String>,
    /// Extra lowercase alias → canonical name, merged over the built-ins.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    "FootyForecast/0.1.0".to_string()
}

fn default_recent_window() -> usize {
    DEFAULT_RECENT_WINDOW
}

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_dashboard_port() -> u16 {
    8080
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file: {path}"))
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(contents).context("Failed to parse configuration TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.leagues.is_empty() {
            return Err(ForecastError::Config("at least one [[leagues]] entry is required".into()));
        }
        let mut seen = HashSet::new();
        for league in &self.leagues {
            if !seen.insert(league.key.as_str()) {
                return Err(ForecastError::Config(format!("duplicate league key: {}", league.key)));
            }
            if league.upcoming_window == 0 {
                return Err(ForecastError::Config(format!(
                    "league {}: upcoming_window must be at least 1",
                    league.key
                )));
            }
        }
        Ok(())
    }

    pub fn league(&self, key: &str) -> Option<&LeagueConfig> {
        self.leagues.iter().find(|l| l.key == key)
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
