use serde::Serialize;

use crate::models::{FormStats, HeadToHeadStats, OutcomeProbabilities};
use crate::utils::normalize_to_percent;

/// Hand-tuned policy constants for turning form and head-to-head history into
/// outcome scores. They are not fitted to data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    /// Flat bonus added to the home side's score
    pub home_advantage: f64,
    /// Multiplier on each head-to-head percentage
    pub h2h_weight: f64,
    /// Multiplier on the attack minus defense differential
    pub goal_margin_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            home_advantage: 5.0,
            h2h_weight: 0.2,
            goal_margin_weight: 5.0,
        }
    }
}

pub struct OutcomeScorer {
    weights: ScoringWeights,
}

impl OutcomeScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Raw `(home, draw, away)` scores before normalization. Any of them may be
    /// negative when a side concedes more than it scores.
    pub fn raw_scores(&self, home_form: &FormStats, away_form: &FormStats, h2h: &HeadToHeadStats) -> (f64, f64, f64) {
        let w = &self.weights;

        let mut home_score = home_form.win_rate
            + (home_form.attack - home_form.defense) * w.goal_margin_weight
            + w.home_advantage;
        let mut away_score = away_form.win_rate + (away_form.attack - away_form.defense) * w.goal_margin_weight;

        home_score += w.h2h_weight * h2h.team1_pct;
        away_score += w.h2h_weight * h2h.team2_pct;
        let draw_score = w.h2h_weight * h2h.draw_pct;

        (home_score, draw_score, away_score)
    }

    pub fn score(&self, home_form: &FormStats, away_form: &FormStats, h2h: &HeadToHeadStats) -> OutcomeProbabilities {
        let (home, draw, away) = self.raw_scores(home_form, away_form, h2h);
        let [home_win_pct, draw_pct, away_win_pct] = normalize_to_percent([home, draw, away]);

        OutcomeProbabilities {
            home_win_pct,
            draw_pct,
            away_win_pct,
        }
    }
}

impl Default for OutcomeScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}
