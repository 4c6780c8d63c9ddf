use clap::Args;

use crate::services::{HistoryLimits, ScoringWeights};

/// Scoring policy and history windows. Each flag can also come from the
/// environment (or `.env`).
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Flat bonus added to the home side's score
    #[arg(long, env = "HOME_ADVANTAGE", default_value = "5.0")]
    pub home_advantage: f64,

    /// Multiplier applied to each head-to-head percentage
    #[arg(long, env = "H2H_WEIGHT", default_value = "0.2")]
    pub h2h_weight: f64,

    /// Multiplier applied to the attack minus defense differential
    #[arg(long, env = "GOAL_MARGIN_WEIGHT", default_value = "5.0")]
    pub goal_margin_weight: f64,

    /// Number of recent finished matches pulled per team
    #[arg(long, env = "RECENT_LIMIT", default_value = "10")]
    pub recent_limit: usize,

    /// Number of past meetings pulled for the head-to-head record
    #[arg(long, env = "H2H_LIMIT", default_value = "5")]
    pub h2h_limit: usize,
}

impl ModelArgs {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            home_advantage: self.home_advantage,
            h2h_weight: self.h2h_weight,
            goal_margin_weight: self.goal_margin_weight,
        }
    }

    pub fn limits(&self) -> HistoryLimits {
        HistoryLimits {
            recent_matches: self.recent_limit,
            head_to_head: self.h2h_limit,
        }
    }
}
