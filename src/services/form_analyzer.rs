use std::cmp::Ordering;

use crate::models::{FormStats, MatchRecord, Side};
use crate::utils::{percentage, weighted_average};

/// Recent form of `team_id` from its matches on `side`.
///
/// `matches` must be oldest first; attack and defense weight later matches
/// more heavily. Matches without a full-time score, or where the team played
/// the other side, are skipped.
pub fn analyze_form(team_id: u32, matches: &[MatchRecord], side: Side) -> FormStats {
    let mut wins = 0usize;
    let mut goals_for = Vec::new();
    let mut goals_against = Vec::new();

    for record in matches {
        let Some((home_goals, away_goals)) = record.final_score() else {
            continue;
        };

        let (scored, conceded) = match side {
            Side::Home if record.home_team_id == team_id => (home_goals, away_goals),
            Side::Away if record.away_team_id == team_id => (away_goals, home_goals),
            _ => continue,
        };

        if scored.cmp(&conceded) == Ordering::Greater {
            wins += 1;
        }
        goals_for.push(scored as f64);
        goals_against.push(conceded as f64);
    }

    let total = goals_for.len();
    FormStats {
        win_rate: percentage(wins, total),
        attack: weighted_average(&goals_for),
        defense: weighted_average(&goals_against),
        matches: total,
    }
}
