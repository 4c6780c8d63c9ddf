use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::parse_utc;

/// A single match as seen by the analyzers. Goals are `None` until the match
/// has a full-time result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
}

impl MatchRecord {
    /// Full-time score as `(home, away)`, only when both sides are known.
    pub fn final_score(&self) -> Option<(u32, u32)> {
        match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    /// Kickoff exactly as the provider sent it.
    pub utc_date: String,
}

impl Fixture {
    pub fn kickoff(&self) -> Option<DateTime<Utc>> {
        parse_utc(&self.utc_date)
    }
}

/// Recent-form profile of one team on one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FormStats {
    /// 0–100
    pub win_rate: f64,
    /// Recency-weighted goals scored per match
    pub attack: f64,
    /// Recency-weighted goals conceded per match
    pub defense: f64,
    pub matches: usize,
}

/// Head-to-head outcome distribution from team1's point of view. Either sums
/// to 100 or is all zero when there is no shared history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HeadToHeadStats {
    pub team1_pct: f64,
    pub draw_pct: f64,
    pub team2_pct: f64,
    pub matches: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutcomeProbabilities {
    pub home_win_pct: f64,
    pub draw_pct: f64,
    pub away_win_pct: f64,
}

impl OutcomeProbabilities {
    pub fn total(&self) -> f64 {
        self.home_win_pct + self.draw_pct + self.away_win_pct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
    HomeWinOrDraw,
    AwayWinOrDraw,
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::HomeWin | Outcome::AwayWin)
    }

    /// Widen a win into "win or draw". Anything else is returned unchanged.
    pub fn or_draw(self) -> Self {
        match self {
            Outcome::HomeWin => Outcome::HomeWinOrDraw,
            Outcome::AwayWin => Outcome::AwayWinOrDraw,
            other => other,
        }
    }

    pub fn describe(&self, home_team: &str, away_team: &str) -> String {
        match self {
            Outcome::HomeWin => format!("{} win", home_team),
            Outcome::AwayWin => format!("{} win", away_team),
            Outcome::Draw => "Draw".to_string(),
            Outcome::HomeWinOrDraw => format!("{} win/draw", home_team),
            Outcome::AwayWinOrDraw => format!("{} win/draw", away_team),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub home_team: String,
    pub away_team: String,
    pub expected_home_goals: u32,
    pub expected_away_goals: u32,
    pub most_likely: Outcome,
}

impl Prediction {
    pub fn most_likely_label(&self) -> String {
        self.most_likely.describe(&self.home_team, &self.away_team)
    }
}

/// Inputs `predict` pulls from the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastInput {
    HomeRecentMatches,
    AwayRecentMatches,
    HeadToHead,
}

/// An input that could not be fetched and was treated as empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataGap {
    pub input: ForecastInput,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub home_form: FormStats,
    pub away_form: FormStats,
    pub head_to_head: HeadToHeadStats,
    pub probabilities: OutcomeProbabilities,
    pub prediction: Prediction,
    pub data_gaps: Vec<DataGap>,
}
