use std::cmp::Ordering;

use crate::models::{HeadToHeadStats, MatchRecord};
use crate::utils::percentage;

/// Win/draw/loss split between two teams from `team1_id`'s point of view,
/// whichever side of the pitch it played on. Unfinished matches and records
/// not between the two teams are ignored; no usable history gives all zeros.
pub fn analyze_head_to_head(team1_id: u32, team2_id: u32, matches: &[MatchRecord]) -> HeadToHeadStats {
    let mut team1_wins = 0usize;
    let mut team2_wins = 0usize;
    let mut draws = 0usize;

    for record in matches {
        if !(record.involves(team1_id) && record.involves(team2_id)) {
            continue;
        }
        let Some((home_goals, away_goals)) = record.final_score() else {
            continue;
        };

        let (team1_goals, team2_goals) = if record.home_team_id == team1_id {
            (home_goals, away_goals)
        } else {
            (away_goals, home_goals)
        };

        match team1_goals.cmp(&team2_goals) {
            Ordering::Greater => team1_wins += 1,
            Ordering::Less => team2_wins += 1,
            Ordering::Equal => draws += 1,
        }
    }

    let total = team1_wins + team2_wins + draws;
    HeadToHeadStats {
        team1_pct: percentage(team1_wins, total),
        draw_pct: percentage(draws, total),
        team2_pct: percentage(team2_wins, total),
        matches: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn played(home: u32, away: u32, home_goals: u32, away_goals: u32) -> MatchRecord {
        MatchRecord {
            home_team_id: home,
            away_team_id: away,
            home_goals: Some(home_goals),
            away_goals: Some(away_goals),
        }
    }

    #[test]
    fn test_no_shared_history_is_all_zero() {
        let stats = analyze_head_to_head(1, 2, &[]);
        assert_eq!(stats, HeadToHeadStats::default());
    }

    #[test]
    fn test_scores_are_read_from_team1_perspective() {
        let matches = vec![
            played(1, 2, 2, 0), // team1 wins at home
            played(2, 1, 0, 1), // team1 wins away
            played(2, 1, 3, 1), // team2 wins
            played(1, 2, 1, 1), // draw
        ];

        let stats = analyze_head_to_head(1, 2, &matches);
        assert_eq!(stats.matches, 4);
        assert_relative_eq!(stats.team1_pct, 50.0);
        assert_relative_eq!(stats.draw_pct, 25.0);
        assert_relative_eq!(stats.team2_pct, 25.0);
        assert_relative_eq!(stats.team1_pct + stats.draw_pct + stats.team2_pct, 100.0);
    }

    #[test]
    fn test_swapping_teams_mirrors_result() {
        let matches = vec![played(1, 2, 2, 0), played(2, 1, 2, 2), played(2, 1, 1, 0)];

        let forward = analyze_head_to_head(1, 2, &matches);
        let reverse = analyze_head_to_head(2, 1, &matches);
        assert_relative_eq!(forward.team1_pct, reverse.team2_pct);
        assert_relative_eq!(forward.draw_pct, reverse.draw_pct);
    }

    #[test]
    fn test_ignores_unplayed_and_unrelated_matches() {
        let matches = vec![
            MatchRecord { home_team_id: 1, away_team_id: 2, home_goals: None, away_goals: Some(1) },
            played(1, 3, 5, 0),
            played(2, 1, 1, 0),
        ];

        let stats = analyze_head_to_head(1, 2, &matches);
        assert_eq!(stats.matches, 1);
        assert_relative_eq!(stats.team2_pct, 100.0);
    }
}
