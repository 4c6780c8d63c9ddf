use crate::models::{FormStats, Outcome, OutcomeProbabilities, Prediction};

/// Expected scoreline and most likely result for a fixture.
///
/// Goals are rounded half-to-even and never go below zero. The most likely
/// outcome is chosen before the draw adjustment: when the rounded scoreline is
/// level, a predicted win is widened to "win or draw".
pub fn estimate(
    home_form: &FormStats,
    away_form: &FormStats,
    probabilities: &OutcomeProbabilities,
    home_team: &str,
    away_team: &str,
) -> Prediction {
    let goal_diff_factor = (probabilities.home_win_pct - probabilities.away_win_pct) / 100.0;

    let expected_home_goals = expected_goals(home_form.attack - away_form.defense + 1.0 + goal_diff_factor);
    let expected_away_goals = expected_goals(away_form.attack - home_form.defense + 1.0 - goal_diff_factor);

    let mut most_likely = most_likely_outcome(probabilities);
    if expected_home_goals == expected_away_goals && most_likely.is_win() {
        most_likely = most_likely.or_draw();
    }

    Prediction {
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        expected_home_goals,
        expected_away_goals,
        most_likely,
    }
}

fn expected_goals(raw: f64) -> u32 {
    let rounded = raw.round_ties_even();
    if rounded.is_finite() && rounded > 0.0 {
        rounded as u32
    } else {
        0
    }
}

/// Home is checked first, so a home/draw tie at the top goes to the home side
/// before the home-versus-away tie-break runs.
// NOTE: open product question whether that tie should read as a draw.
pub fn most_likely_outcome(probabilities: &OutcomeProbabilities) -> Outcome {
    let OutcomeProbabilities { home_win_pct: home, draw_pct: draw, away_win_pct: away } = *probabilities;
    let max = home.max(draw).max(away);

    if max == home {
        Outcome::HomeWin
    } else if max == away {
        Outcome::AwayWin
    } else if home > away {
        Outcome::HomeWin
    } else if away > home {
        Outcome::AwayWin
    } else {
        Outcome::Draw
    }
}
