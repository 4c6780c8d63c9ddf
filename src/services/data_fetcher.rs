use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::env;
use thiserror::Error;

use crate::models::{Fixture, MatchRecord, TeamRef};
use crate::utils::parse_utc;

const DEFAULT_BASE_URL: &str = "https://api.football-data.org/v4";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_ATTEMPTS: u32 = 3;

// ── football-data.org structures ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FootballDataMatches {
    #[serde(default)]
    pub matches: Vec<FootballMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootballMatch {
    pub id: u32,
    pub utc_date: String,
    pub home_team: MatchTeam,
    pub away_team: MatchTeam,
    #[serde(default)]
    pub score: MatchScore,
}

#[derive(Debug, Deserialize)]
pub struct MatchTeam {
    // Unresolved knockout slots arrive with null ids and names.
    pub id: Option<u32>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub full_time: Option<Score>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Score {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl FootballMatch {
    /// Reduce a provider match to the fields the analyzers read. Matches whose
    /// teams are not known yet cannot be attributed and yield `None`.
    pub fn to_record(&self) -> Option<MatchRecord> {
        let score = self.score.full_time.as_ref();
        Some(MatchRecord {
            home_team_id: self.home_team.id?,
            away_team_id: self.away_team.id?,
            home_goals: score.and_then(|s| s.home),
            away_goals: score.and_then(|s| s.away),
        })
    }

    pub fn to_fixture(&self) -> Option<Fixture> {
        Some(Fixture {
            id: self.id,
            home_team: team_ref(&self.home_team)?,
            away_team: team_ref(&self.away_team)?,
            utc_date: self.utc_date.clone(),
        })
    }

    fn kickoff(&self) -> Option<DateTime<Utc>> {
        parse_utc(&self.utc_date)
    }
}

fn team_ref(team: &MatchTeam) -> Option<TeamRef> {
    Some(TeamRef {
        id: team.id?,
        name: team.name.clone()?,
    })
}

/// Sort by kickoff, oldest first, and keep the last `limit` matches as records.
///
/// The analyzers weight later entries more, so ordering is established here
/// instead of trusting the provider. Matches with an unreadable date are dropped.
pub fn latest_records(matches: Vec<FootballMatch>, limit: usize) -> Vec<MatchRecord> {
    let mut dated: Vec<(DateTime<Utc>, FootballMatch)> = matches
        .into_iter()
        .filter_map(|m| match m.kickoff() {
            Some(kickoff) => Some((kickoff, m)),
            None => {
                tracing::warn!("Bad date '{}' on match {}, skipping", m.utc_date, m.id);
                None
            }
        })
        .collect();
    dated.sort_by_key(|(kickoff, _)| *kickoff);

    let skip = dated.len().saturating_sub(limit);
    dated
        .into_iter()
        .skip(skip)
        .filter_map(|(_, m)| m.to_record())
        .collect()
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("FOOTBALL_DATA_API_KEY not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("API rate limit exceeded after {attempts} attempts")]
    RateLimited { attempts: u32 },
}

// ── Data source seam ────────────────────────────────────────────────────────

/// Supplier of fixtures and finished matches. Match lists are returned oldest
/// first.
#[async_trait]
pub trait MatchDataSource: Send + Sync {
    async fn upcoming_fixtures(&self, competition: &str) -> Result<Vec<Fixture>, FetchError>;

    /// The team's last `limit` finished matches in the recent-form window.
    async fn recent_matches(&self, team_id: u32, limit: usize) -> Result<Vec<MatchRecord>, FetchError>;

    /// The last `limit` finished meetings between the two teams.
    async fn head_to_head(&self, team1_id: u32, team2_id: u32, limit: usize) -> Result<Vec<MatchRecord>, FetchError>;
}

// ── DataFetcher ─────────────────────────────────────────────────────────────

pub struct DataFetcher {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    recent_window_days: i64,
    h2h_window_days: i64,
}

impl DataFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: env::var("FOOTBALL_DATA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: env::var("FOOTBALL_DATA_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            recent_window_days: 365,
            h2h_window_days: 365 * 2,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_matches(&self, path: &str, query: &[(&str, String)]) -> Result<FootballDataMatches, FetchError> {
        let api_key = self.api_key.as_ref().ok_or(FetchError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, path);

        // Retry on 429 with exponential backoff; the free tier allows 10 req/min
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            tracing::debug!("GET {} (attempt {})", url, attempts);

            let resp = self.client
                .get(&url)
                .header("X-Auth-Token", api_key)
                .query(query)
                .send().await?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                if attempts >= MAX_ATTEMPTS {
                    return Err(FetchError::RateLimited { attempts });
                }
                let wait = 2u64.pow(attempts) * 5; // 10s, 20s
                tracing::warn!("football-data 429 rate-limited, waiting {}s (attempt {})", wait, attempts);
                tokio::time::sleep(tokio::time::Duration::from_secs(wait)).await;
                continue;
            }

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(FetchError::Status { status, body });
            }

            return Ok(resp.json().await?);
        }
    }

    async fn finished_team_matches(&self, team_id: u32, window_days: i64) -> Result<Vec<FootballMatch>, FetchError> {
        let today = Utc::now().date_naive();
        let query = finished_window(today, window_days);
        let data = self.get_matches(&format!("/teams/{}/matches", team_id), &query).await?;
        Ok(data.matches)
    }
}

fn finished_window(today: NaiveDate, window_days: i64) -> Vec<(&'static str, String)> {
    let from = today - Duration::days(window_days);
    vec![
        ("status", "FINISHED".to_string()),
        ("dateFrom", from.format("%Y-%m-%d").to_string()),
        ("dateTo", today.format("%Y-%m-%d").to_string()),
    ]
}

#[async_trait]
impl MatchDataSource for DataFetcher {
    async fn upcoming_fixtures(&self, competition: &str) -> Result<Vec<Fixture>, FetchError> {
        tracing::info!("Fetching scheduled {} matches from football-data.org…", competition);

        let query = [("status", "SCHEDULED".to_string())];
        let data = self.get_matches(&format!("/competitions/{}/matches", competition), &query).await?;

        let fixtures: Vec<Fixture> = data.matches.iter().filter_map(FootballMatch::to_fixture).collect();
        tracing::info!("Found {} upcoming {} fixtures", fixtures.len(), competition);
        Ok(fixtures)
    }

    async fn recent_matches(&self, team_id: u32, limit: usize) -> Result<Vec<MatchRecord>, FetchError> {
        let matches = self.finished_team_matches(team_id, self.recent_window_days).await?;
        let records = latest_records(matches, limit);
        tracing::info!("Team {}: {} recent matches", team_id, records.len());
        Ok(records)
    }

    async fn head_to_head(&self, team1_id: u32, team2_id: u32, limit: usize) -> Result<Vec<MatchRecord>, FetchError> {
        let matches: Vec<FootballMatch> = self
            .finished_team_matches(team1_id, self.h2h_window_days)
            .await?
            .into_iter()
            .filter(|m| m.home_team.id == Some(team2_id) || m.away_team.id == Some(team2_id))
            .collect();

        let records = latest_records(matches, limit);
        tracing::info!("Teams {} v {}: {} head-to-head matches", team1_id, team2_id, records.len());
        Ok(records)
    }
}
