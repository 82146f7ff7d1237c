//! FootyForecast: fixture boards and match predictions per league.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds one board per configured league and refreshes them on an
//! interval, driving prediction runs in background tasks, until Ctrl+C.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use footyforecast::config::{self, AppConfig};
use footyforecast::dashboard::{self, routes::DashboardState};
use footyforecast::engine::board::LeagueBoard;
use footyforecast::engine::orchestrator::RunReport;
use footyforecast::service::http::HttpForecastService;
use footyforecast::service::wire::load_fixture_file;
use footyforecast::service::ForecastService;
use footyforecast::teams::{TeamAliasTable, TeamBadgeTable, TeamIdentityResolver};

const BANNER: &str = r#"
  FootyForecast v0.1.0
  fixtures · tables · predictions
"#;

const CONFIG_PATH_ENV: &str = "FOOTY_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        AppConfig::resolve_env(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        config = %config_path,
        service = %cfg.service.base_url,
        leagues = cfg.leagues.len(),
        refresh_interval_secs = cfg.pipeline.refresh_interval_secs,
        "FootyForecast starting up"
    );

    // -- Initialise components -------------------------------------------

    let service: Arc<dyn ForecastService> = Arc::new(HttpForecastService::new(&cfg.service)?);
    let badges = Arc::new(load_badges(&cfg, service.as_ref()).await);

    let mut boards = Vec::with_capacity(cfg.leagues.len());
    for league in &cfg.leagues {
        let resolver = Arc::new(TeamIdentityResolver::new(
            TeamAliasTable::for_league(&league.key, &league.aliases),
            Arc::clone(&badges),
        ));
        let mut board = LeagueBoard::new(
            league.clone(),
            cfg.pipeline.recent_window,
            Arc::clone(&service),
            resolver,
        );

        if let Some(path) = &league.fallback_file {
            match load_fixture_file(path) {
                Ok(fixtures) => {
                    info!(league = %league.key, fixtures = fixtures.len(), "Fallback fixtures loaded");
                    board = board.with_fallback(fixtures);
                }
                Err(e) => warn!(league = %league.key, error = %e, "Fallback fixtures unavailable"),
            }
        }

        boards.push(Arc::new(board));
    }

    if cfg.dashboard.enabled {
        let state = Arc::new(DashboardState::new(boards.clone()));
        dashboard::spawn_dashboard(state, cfg.dashboard.port).await?;
    }

    // -- Main loop -------------------------------------------------------

    let mut interval =
        tokio::time::interval(Duration::from_secs(cfg.pipeline.refresh_interval_secs.max(1)));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.pipeline.refresh_interval_secs,
        "Entering main loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Utc::now();
                for board in &boards {
                    if let Some(run) = board.refresh(now).await {
                        let league = board.key().to_string();
                        tokio::spawn(async move {
                            log_run_report(&league, &run.execute().await);
                        });
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("FootyForecast shut down cleanly.");
    Ok(())
}

/// Badge table from the configured file, overlaid with the service's
/// `/logos` listing when enabled. Missing sources only cost the images.
async fn load_badges(cfg: &AppConfig, service: &dyn ForecastService) -> TeamBadgeTable {
    let mut table = TeamBadgeTable::default();

    if let Some(path) = &cfg.teams.badges_file {
        match TeamBadgeTable::load(path) {
            Ok(file) => table = table.merged(file),
            Err(e) => warn!(error = %e, "Badge file unavailable"),
        }
    }

    if cfg.teams.fetch_badges {
        match service.fetch_badges().await {
            Ok(remote) => {
                info!(badges = remote.len(), "Badge table fetched from service");
                table = table.merged(TeamBadgeTable::new(remote));
            }
            Err(e) => warn!(error = %e, "Badge listing failed"),
        }
    }

    table
}

/// Log how a prediction run ended.
fn log_run_report(league: &str, report: &RunReport) {
    match report {
        RunReport::Settled {
            run_id,
            generation,
            succeeded,
            failed,
        } => info!(
            league,
            run_id = %run_id,
            generation,
            succeeded,
            failed,
            "Prediction run complete"
        ),
        RunReport::Cancelled {
            run_id,
            generation,
            completed,
        } => info!(
            league,
            run_id = %run_id,
            generation,
            completed,
            "Prediction run superseded"
        ),
    }
    if let RunReport::Settled { failed, .. } = report {
        if *failed > 0 {
            warn!(league, failed, "Some predictions failed and were left pending");
        }
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("footyforecast=info"));

    let json_logging = std::env::var("FOOTY_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
