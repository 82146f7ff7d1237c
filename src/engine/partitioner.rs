//! Splits a fixture listing into upcoming and recent subsets.

use chrono::{DateTime, Utc};

use crate::config::DEFAULT_RECENT_WINDOW;
use crate::types::Fixture;

/// Upcoming fixtures ascending by kickoff, recent fixtures descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixturePartition {
    pub upcoming: Vec<Fixture>,
    pub recent: Vec<Fixture>,
}

#[derive(Debug, Clone, Copy)]
pub struct FixturePartitioner {
    upcoming_window: usize,
    recent_window: usize,
}

impl FixturePartitioner {
    pub fn new(upcoming_window: usize) -> Self {
        Self {
            upcoming_window,
            recent_window: DEFAULT_RECENT_WINDOW,
        }
    }

    pub fn with_recent_window(mut self, recent_window: usize) -> Self {
        self.recent_window = recent_window;
        self
    }

    pub fn upcoming_window(&self) -> usize {
        self.upcoming_window
    }

    pub fn partition(&self, fixtures: &[Fixture], now: DateTime<Utc>) -> FixturePartition {
        partition(fixtures, now, self.upcoming_window, self.recent_window)
    }
}

/// Classify each fixture against `now` (kickoff at or after `now` is
/// upcoming, strictly before is recent), order and truncate both sides.
///
/// Both sorts are stable: fixtures sharing a kickoff keep their source order.
pub fn partition(
    fixtures: &[Fixture],
    now: DateTime<Utc>,
    upcoming_window: usize,
    recent_window: usize,
) -> FixturePartition {
    let (mut upcoming, mut recent): (Vec<Fixture>, Vec<Fixture>) =
        fixtures.iter().cloned().partition(|f| f.kickoff >= now);

    upcoming.sort_by(|a, b| a.kickoff.cmp(&b.kickoff));
    upcoming.truncate(upcoming_window);

    recent.sort_by(|a, b| b.kickoff.cmp(&a.kickoff));
    recent.truncate(recent_window);

    FixturePartition { upcoming, recent }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
    }

    fn fixture(id: &str, kickoff: DateTime<Utc>) -> Fixture {
        Fixture {
            id: id.into(),
            kickoff,
            venue: None,
            home_team: format!("Home {id}"),
            away_team: format!("Away {id}"),
        }
    }

    fn ids(fixtures: &[Fixture]) -> Vec<&str> {
        fixtures.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_scenario_window_two() {
        let fixtures = vec![
            fixture("1", now() + Duration::days(1)),
            fixture("2", now() - Duration::days(1)),
            fixture("3", now() + Duration::days(2)),
        ];
        let p = partition(&fixtures, now(), 2, DEFAULT_RECENT_WINDOW);
        assert_eq!(ids(&p.upcoming), vec!["1", "3"]);
        assert_eq!(ids(&p.recent), vec!["2"]);
    }

    #[test]
    fn test_empty_input() {
        let p = partition(&[], now(), 10, 5);
        assert!(p.upcoming.is_empty());
        assert!(p.recent.is_empty());
    }

    #[test]
    fn test_kickoff_equal_to_now_is_upcoming() {
        let fixtures = vec![fixture("a", now()), fixture("b", now() - Duration::seconds(1))];
        let p = partition(&fixtures, now(), 10, 5);
        assert_eq!(ids(&p.upcoming), vec!["a"]);
        assert_eq!(ids(&p.recent), vec!["b"]);
    }

    #[test]
    fn test_totality_without_truncation() {
        let fixtures: Vec<Fixture> = (0..12)
            .map(|i| fixture(&i.to_string(), now() + Duration::hours(i * 7 - 40)))
            .collect();
        let p = partition(&fixtures, now(), usize::MAX, usize::MAX);
        assert_eq!(p.upcoming.len() + p.recent.len(), fixtures.len());
        for f in &fixtures {
            let in_up = p.upcoming.iter().any(|u| u.id == f.id);
            let in_recent = p.recent.iter().any(|r| r.id == f.id);
            assert!(in_up ^ in_recent, "fixture {} must be in exactly one side", f.id);
            assert_eq!(in_up, f.kickoff >= now());
        }
    }

    #[test]
    fn test_ordering() {
        let offsets = [5, -3, 1, -9, 2, -1, 8, -4];
        let fixtures: Vec<Fixture> = offsets
            .iter()
            .enumerate()
            .map(|(i, h)| fixture(&i.to_string(), now() + Duration::hours(*h)))
            .collect();
        let p = partition(&fixtures, now(), 10, 10);
        assert!(p.upcoming.windows(2).all(|w| w[0].kickoff <= w[1].kickoff));
        assert!(p.recent.windows(2).all(|w| w[0].kickoff >= w[1].kickoff));
    }

    #[test]
    fn test_stable_on_equal_kickoff() {
        let later = now() + Duration::days(3);
        let earlier = now() - Duration::days(3);
        let fixtures = vec![
            fixture("u-first", later),
            fixture("r-first", earlier),
            fixture("u-second", later),
            fixture("r-second", earlier),
            fixture("u-third", later),
        ];
        let p = partition(&fixtures, now(), 10, 10);
        assert_eq!(ids(&p.upcoming), vec!["u-first", "u-second", "u-third"]);
        assert_eq!(ids(&p.recent), vec!["r-first", "r-second"]);
    }

    #[test]
    fn test_recent_truncated_to_window() {
        let fixtures: Vec<Fixture> = (1..=8)
            .map(|d| fixture(&d.to_string(), now() - Duration::days(d)))
            .collect();
        let p = FixturePartitioner::new(10).partition(&fixtures, now());
        assert_eq!(ids(&p.recent), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_upcoming_truncated_to_window() {
        let fixtures: Vec<Fixture> = (1..=6)
            .rev()
            .map(|d| fixture(&d.to_string(), now() + Duration::days(d)))
            .collect();
        let partitioner = FixturePartitioner::new(3).with_recent_window(0);
        assert_eq!(partitioner.upcoming_window(), 3);
        let p = partitioner.partition(&fixtures, now());
        assert_eq!(ids(&p.upcoming), vec!["1", "2", "3"]);
    }
}
