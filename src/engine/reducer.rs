//! Reduces a raw prediction payload to a `PredictionView`.
//!
//! Suggested-outcome precedence, each step short-circuiting the next:
//! 1. both scores present → compare them (overrides any asserted outcome);
//! 2. an explicitly asserted outcome;
//! 3. the largest probability, ties resolved home, then away, then draw.

use crate::types::{Outcome, PredictedScore, PredictionPayload, PredictionView};

/// Build the view for one payload. `None` yields the zero view.
pub fn reduce(payload: Option<&PredictionPayload>) -> PredictionView {
    let Some(payload) = payload else {
        return PredictionView::zero();
    };

    let home_prob = payload.home_prob().unwrap_or(0.0);
    let draw_prob = payload.draw_prob().unwrap_or(0.0);
    let away_prob = payload.away_prob().unwrap_or(0.0);

    let predicted_score = payload.scoreline();
    let suggested = predicted_score
        .map(outcome_from_score)
        .or_else(|| payload.asserted_outcome())
        .unwrap_or_else(|| outcome_from_probs(home_prob, draw_prob, away_prob));

    PredictionView {
        home_prob,
        draw_prob,
        away_prob,
        suggested: Some(suggested),
        predicted_score,
        report: payload.report.clone(),
    }
}

pub fn outcome_from_score(score: PredictedScore) -> Outcome {
    match score.home.cmp(&score.away) {
        std::cmp::Ordering::Greater => Outcome::Home,
        std::cmp::Ordering::Less => Outcome::Away,
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

/// The maximum is compared against home first, then away; anything else is
/// a draw.
pub fn outcome_from_probs(home: f64, draw: f64, away: f64) -> Outcome {
    let max = home.max(draw).max(away);
    if max == home {
        Outcome::Home
    } else if max == away {
        Outcome::Away
    } else {
        Outcome::Draw
    }
}
