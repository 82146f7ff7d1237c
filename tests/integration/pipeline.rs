//! End-to-end pipeline scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use footyforecast::config::LeagueConfig;
use footyforecast::engine::board::LeagueBoard;
use footyforecast::engine::orchestrator::{RunReport, RunState};
use footyforecast::service::wire::parse_fixture_listing;
use footyforecast::teams::{TeamAliasTable, TeamBadgeTable, TeamIdentityResolver};
use footyforecast::types::{FixtureId, Outcome, PredictionStatus};

use crate::mock_service::{fixture, now, MockService};

fn epl(upcoming_window: usize) -> LeagueConfig {
    LeagueConfig {
        key: "epl".into(),
        name: "Premier League".into(),
        tag: "EPL".into(),
        fixtures_path: "/fixtures".into(),
        table_path: "/table".into(),
        scorers_path: "/top_scorers".into(),
        recent_path: None,
        upcoming_window,
        fallback_file: None,
        aliases: HashMap::new(),
    }
}

fn board(service: Arc<MockService>, upcoming_window: usize) -> LeagueBoard {
    let resolver = Arc::new(TeamIdentityResolver::new(
        TeamAliasTable::for_league("epl", &HashMap::new()),
        Arc::new(TeamBadgeTable::default()),
    ));
    LeagueBoard::new(epl(upcoming_window), 5, service, resolver)
}

async fn wait_for_requests(service: &MockService, count: usize) {
    while service.requests().len() < count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_refresh_and_run_publish_canonical_predictions() {
    let service = Arc::new(
        MockService::new(vec![
            fixture(1, 2, "Arsenal FC", "Man Utd"),
            fixture(2, -20, "Everton", "Fulham"),
            fixture(3, 26, "Spurs", "Wolves"),
        ])
        .with_prediction(
            "Arsenal",
            "Manchester United",
            r#"{"probs": {"home_win": 0.3, "draw": 0.3, "away_win": 0.4}, "home_score": 2, "away_score": 0}"#,
        )
        .with_prediction(
            "Tottenham Hotspur",
            "Wolverhampton Wanderers",
            r#"{"home": 0.35, "draw": 0.35, "away": 0.3}"#,
        ),
    );
    let board = board(Arc::clone(&service), 10);

    let run = board.refresh(now()).await.expect("new selection");
    let report = run.execute().await;
    assert!(report.is_settled());

    let requests = service.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].home_team, "Arsenal");
    assert_eq!(requests[0].away_team, "Manchester United");
    assert_eq!(requests[0].league, "EPL");
    assert_eq!(requests[1].home_team, "Tottenham Hotspur");

    let reader = board.predictions();
    match reader.status(&FixtureId::from(1u64)).await {
        PredictionStatus::Ready(view) => {
            // The scoreline outranks the away-leaning probabilities.
            assert_eq!(view.suggested, Some(Outcome::Home));
            assert_eq!(view.away_prob, 0.4);
        }
        PredictionStatus::Pending => panic!("fixture 1 should be ready"),
    }
    match reader.status(&FixtureId::from(3u64)).await {
        PredictionStatus::Ready(view) => assert_eq!(view.suggested, Some(Outcome::Home)),
        PredictionStatus::Pending => panic!("fixture 3 should be ready"),
    }
    // Recent fixtures are never predicted.
    assert_eq!(
        reader.status(&FixtureId::from(2u64)).await,
        PredictionStatus::Pending
    );
}

#[tokio::test]
async fn test_requests_follow_kickoff_order() {
    let service = Arc::new(MockService::new(vec![
        fixture(10, 48, "Chelsea", "Brentford"),
        fixture(11, 1, "Liverpool", "Everton"),
        fixture(12, 24, "Newcastle", "Leeds"),
        fixture(13, 72, "Burnley", "Fulham"),
    ]));
    let board = board(Arc::clone(&service), 3);

    board.refresh(now()).await.unwrap().execute().await;

    let homes: Vec<String> = service.requests().into_iter().map(|r| r.home_team).collect();
    assert_eq!(homes, vec!["Liverpool", "Newcastle United", "Chelsea"]);
}

#[tokio::test]
async fn test_failed_and_null_predictions() {
    let service = Arc::new(MockService::new(vec![
        fixture(1, 2, "Arsenal", "Chelsea"),
        fixture(2, 3, "Brighton", "Everton"),
    ]));
    service.fail_home("Arsenal");
    let board = board(Arc::clone(&service), 10);

    let report = board.refresh(now()).await.unwrap().execute().await;
    match report {
        RunReport::Settled { succeeded, failed, .. } => {
            assert_eq!(succeeded, 1);
            assert_eq!(failed, 1);
        }
        other => panic!("expected settled run, got {other:?}"),
    }

    let snapshot = board.snapshot().await;
    assert_eq!(snapshot.upcoming[0].prediction, Some(PredictionStatus::Pending));
    match &snapshot.upcoming[1].prediction {
        Some(PredictionStatus::Ready(view)) => {
            assert_eq!(view.home_prob, 0.0);
            assert_eq!(view.suggested, None);
            assert!(view.predicted_score.is_none());
        }
        other => panic!("expected zero view, got {other:?}"),
    }
}

#[tokio::test]
async fn test_superseded_run_never_publishes() {
    let service = Arc::new(
        MockService::new(vec![
            fixture(1, 2, "Arsenal", "Chelsea"),
            fixture(2, 4, "Everton", "Fulham"),
        ])
        .with_prediction("Arsenal", "Chelsea", r#"{"home": 0.6, "draw": 0.2, "away": 0.2}"#)
        .with_prediction("Everton", "Fulham", r#"{"home": 0.2, "draw": 0.2, "away": 0.6}"#)
        .with_prediction("Leeds United", "Burnley", r#"{"home": 0.2, "draw": 0.5, "away": 0.3}"#),
    );
    service.hold_home("Everton");
    let board = board(Arc::clone(&service), 10);
    let reader = board.predictions();

    let first = board.refresh(now()).await.unwrap();
    assert_eq!(first.generation(), 1);
    let first = tokio::spawn(first.execute());
    wait_for_requests(&service, 2).await;

    service.set_fixtures(vec![fixture(3, 6, "Leeds United", "Burnley")]);
    let second = board.refresh(now()).await.expect("selection changed");
    assert_eq!(second.generation(), 2);
    assert!(reader.predictions().await.is_empty());
    assert_eq!(
        reader.state().await,
        RunState::Fetching { generation: 2, fixtures: 1 }
    );

    assert!(second.execute().await.is_settled());

    service.release();
    let first_report = first.await.unwrap();
    assert!(matches!(first_report, RunReport::Cancelled { generation: 1, .. }));

    let published = reader.predictions().await;
    assert_eq!(published.len(), 1);
    assert!(published.contains_key(&FixtureId::from(3u64)));
    assert_eq!(
        published[&FixtureId::from(3u64)].suggested,
        Some(Outcome::Draw)
    );
    assert_eq!(
        reader.state().await,
        RunState::Settled { generation: 2, succeeded: 1, failed: 0 }
    );
}

#[tokio::test]
async fn test_listing_outage_falls_back_to_static_fixtures() {
    let fallback = parse_fixture_listing(
        r#"{"response": [
            {"fixture": {"id": 9101, "date": "2026-03-15T15:00:00Z", "venue": {"name": "Selhurst Park"}},
             "teams": {"home": {"name": "Crystal Palace"}, "away": {"name": "Brighton & Hove Albion"}}},
            {"fixture": {"id": 9100, "date": "2026-03-10T15:00:00Z"},
             "teams": {"home": {"name": "Sunderland AFC"}, "away": {"name": "Aston Villa"}}}
        ]}"#,
    )
    .unwrap();

    let service = Arc::new(MockService::new(Vec::new()));
    service.set_listing_error("HTTP 503");
    let board = board(Arc::clone(&service), 10).with_fallback(fallback);

    let run = board.refresh(now()).await.expect("fallback fixtures selected");
    run.execute().await;

    let snapshot = board.snapshot().await;
    assert!(snapshot.degraded);
    assert_eq!(snapshot.messages.len(), 3);
    assert_eq!(snapshot.upcoming.len(), 1);
    assert_eq!(snapshot.upcoming[0].away.name, "Brighton");
    assert_eq!(snapshot.upcoming[0].venue.as_deref(), Some("Selhurst Park"));
    assert_eq!(snapshot.recent[0].home.name, "Sunderland");
    assert!(snapshot.table.is_empty());

    assert_eq!(service.requests()[0].away_team, "Brighton");
}

#[tokio::test]
async fn test_empty_selection_goes_idle() {
    let service = Arc::new(MockService::new(vec![fixture(1, 2, "Arsenal", "Chelsea")]));
    let board = board(Arc::clone(&service), 10);
    board.refresh(now()).await.unwrap().execute().await;
    assert_eq!(board.predictions().predictions().await.len(), 1);

    service.set_fixtures(vec![fixture(1, -2, "Arsenal", "Chelsea")]);
    assert!(board.refresh(now()).await.is_none());
    assert_eq!(board.predictions().state().await, RunState::Idle);
    assert!(board.predictions().predictions().await.is_empty());
}
