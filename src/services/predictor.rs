use crate::models::{DataGap, Forecast, ForecastInput, MatchRecord, Side, TeamRef};
use crate::services::{analyze_form, analyze_head_to_head, estimate, MatchDataSource, OutcomeScorer, ScoringWeights};

/// History windows pulled for each forecast.
#[derive(Debug, Clone, Copy)]
pub struct HistoryLimits {
    pub recent_matches: usize,
    pub head_to_head: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            recent_matches: 10,
            head_to_head: 5,
        }
    }
}

pub struct PredictionEngine {
    scorer: OutcomeScorer,
    limits: HistoryLimits,
}

impl PredictionEngine {
    pub fn new(weights: ScoringWeights, limits: HistoryLimits) -> Self {
        Self {
            scorer: OutcomeScorer::new(weights),
            limits,
        }
    }

    /// Fetch history for both teams and forecast the fixture.
    ///
    /// A failed fetch never aborts the forecast: the affected input is treated
    /// as empty and recorded in `data_gaps`.
    pub async fn predict<S>(&self, source: &S, home: &TeamRef, away: &TeamRef) -> Forecast
    where
        S: MatchDataSource + ?Sized,
    {
        let mut gaps = Vec::new();

        let home_matches = or_gap(
            source.recent_matches(home.id, self.limits.recent_matches).await,
            ForecastInput::HomeRecentMatches,
            &mut gaps,
        );
        let away_matches = or_gap(
            source.recent_matches(away.id, self.limits.recent_matches).await,
            ForecastInput::AwayRecentMatches,
            &mut gaps,
        );
        let h2h_matches = or_gap(
            source.head_to_head(home.id, away.id, self.limits.head_to_head).await,
            ForecastInput::HeadToHead,
            &mut gaps,
        );

        let mut forecast = self.forecast(home, away, &home_matches, &away_matches, &h2h_matches);
        forecast.data_gaps = gaps;

        tracing::info!(
            "Forecast {} vs {}: Home {:.1}%, Draw {:.1}%, Away {:.1}% ({} {}-{})",
            home.name,
            away.name,
            forecast.probabilities.home_win_pct,
            forecast.probabilities.draw_pct,
            forecast.probabilities.away_win_pct,
            forecast.prediction.most_likely_label(),
            forecast.prediction.expected_home_goals,
            forecast.prediction.expected_away_goals,
        );

        forecast
    }

    /// Forecast from already fetched match lists, each oldest first.
    pub fn forecast(
        &self,
        home: &TeamRef,
        away: &TeamRef,
        home_matches: &[MatchRecord],
        away_matches: &[MatchRecord],
        h2h_matches: &[MatchRecord],
    ) -> Forecast {
        let home_form = analyze_form(home.id, home_matches, Side::Home);
        let away_form = analyze_form(away.id, away_matches, Side::Away);
        let head_to_head = analyze_head_to_head(home.id, away.id, h2h_matches);

        let probabilities = self.scorer.score(&home_form, &away_form, &head_to_head);
        let prediction = estimate(&home_form, &away_form, &probabilities, &home.name, &away.name);

        Forecast {
            home_team: home.clone(),
            away_team: away.clone(),
            home_form,
            away_form,
            head_to_head,
            probabilities,
            prediction,
            data_gaps: Vec::new(),
        }
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(ScoringWeights::default(), HistoryLimits::default())
    }
}

fn or_gap<E: std::fmt::Display>(
    result: Result<Vec<MatchRecord>, E>,
    input: ForecastInput,
    gaps: &mut Vec<DataGap>,
) -> Vec<MatchRecord> {
    match result {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("No data for {:?}: {}", input, e);
            gaps.push(DataGap {
                input,
                reason: e.to_string(),
            });
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Fixture, FormStats, Outcome};
    use crate::services::FetchError;
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use reqwest::StatusCode;

    const HOME: u32 = 57;
    const AWAY: u32 = 61;

    fn team(id: u32, name: &str) -> TeamRef {
        TeamRef { id, name: name.to_string() }
    }

    fn played(home: u32, away: u32, home_goals: u32, away_goals: u32) -> MatchRecord {
        MatchRecord {
            home_team_id: home,
            away_team_id: away,
            home_goals: Some(home_goals),
            away_goals: Some(away_goals),
        }
    }

    struct StubSource {
        home: Option<Vec<MatchRecord>>,
        away: Option<Vec<MatchRecord>>,
        h2h: Option<Vec<MatchRecord>>,
    }

    #[async_trait]
    impl MatchDataSource for StubSource {
        async fn upcoming_fixtures(&self, _competition: &str) -> Result<Vec<Fixture>, FetchError> {
            Ok(Vec::new())
        }

        async fn recent_matches(&self, team_id: u32, limit: usize) -> Result<Vec<MatchRecord>, FetchError> {
            let matches = if team_id == HOME { &self.home } else { &self.away };
            let matches = matches.as_ref().ok_or(FetchError::RateLimited { attempts: 3 })?;
            let skip = matches.len().saturating_sub(limit);
            Ok(matches[skip..].to_vec())
        }

        async fn head_to_head(&self, _team1: u32, _team2: u32, _limit: usize) -> Result<Vec<MatchRecord>, FetchError> {
            self.h2h.clone().ok_or(FetchError::Status {
                status: StatusCode::FORBIDDEN,
                body: "restricted".to_string(),
            })
        }
    }

    fn stub() -> StubSource {
        StubSource {
            home: Some(vec![played(HOME, 1, 1, 1), played(HOME, 2, 2, 0), played(3, HOME, 0, 0), played(HOME, 4, 3, 1)]),
            away: Some(vec![played(5, AWAY, 2, 2), played(AWAY, 6, 4, 0), played(7, AWAY, 0, 1)]),
            h2h: Some(vec![played(HOME, AWAY, 1, 0), played(AWAY, HOME, 2, 2)]),
        }
    }

    #[tokio::test]
    async fn test_predict_combines_all_inputs() {
        let engine = PredictionEngine::default();
        let forecast = engine.predict(&stub(), &team(HOME, "Arsenal FC"), &team(AWAY, "Chelsea FC")).await;

        assert!(forecast.data_gaps.is_empty());
        assert_eq!(forecast.home_form.matches, 3);
        assert_eq!(forecast.away_form.matches, 2);
        assert_eq!(forecast.head_to_head.matches, 2);
        assert_relative_eq!(forecast.head_to_head.team1_pct, 50.0);
        assert_relative_eq!(forecast.probabilities.total(), 100.0, epsilon = 1e-9);
        assert_eq!(forecast.prediction.home_team, "Arsenal FC");
    }

    #[tokio::test]
    async fn test_failed_fetch_becomes_data_gap() {
        let source = StubSource { h2h: None, ..stub() };
        let engine = PredictionEngine::default();
        let forecast = engine.predict(&source, &team(HOME, "Arsenal FC"), &team(AWAY, "Chelsea FC")).await;

        assert_eq!(forecast.data_gaps.len(), 1);
        assert_eq!(forecast.data_gaps[0].input, ForecastInput::HeadToHead);
        assert!(forecast.data_gaps[0].reason.contains("403"));
        assert_eq!(forecast.head_to_head.matches, 0);
        assert_eq!(forecast.probabilities.draw_pct, 0.0);
        assert_relative_eq!(forecast.probabilities.total(), 100.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_failed_recent_matches_leave_zero_form() {
        let source = StubSource { home: None, away: None, ..stub() };
        let engine = PredictionEngine::default();
        let forecast = engine.predict(&source, &team(HOME, "Arsenal FC"), &team(AWAY, "Chelsea FC")).await;

        let inputs: Vec<ForecastInput> = forecast.data_gaps.iter().map(|g| g.input).collect();
        assert_eq!(inputs, vec![ForecastInput::HomeRecentMatches, ForecastInput::AwayRecentMatches]);
        assert!(forecast.data_gaps[0].reason.contains("rate limit"));

        assert_eq!(forecast.home_form, FormStats::default());
        assert_eq!(forecast.away_form, FormStats::default());
        // Head-to-head still counts: 1 win and 1 draw for the home side
        assert_eq!(forecast.head_to_head.matches, 2);
        // home 5 + 10, draw 10, away 0
        assert_relative_eq!(forecast.probabilities.home_win_pct, 60.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.probabilities.draw_pct, 40.0, epsilon = 1e-9);
        assert_eq!(forecast.probabilities.away_win_pct, 0.0);
    }

    #[tokio::test]
    async fn test_recent_limit_is_passed_to_source() {
        let limits = HistoryLimits { recent_matches: 1, head_to_head: 5 };
        let engine = PredictionEngine::new(ScoringWeights::default(), limits);
        let forecast = engine.predict(&stub(), &team(HOME, "Arsenal FC"), &team(AWAY, "Chelsea FC")).await;

        // Only the latest match of each list survives: a home win and an away win
        assert_eq!(forecast.home_form.matches, 1);
        assert_eq!(forecast.away_form.matches, 1);
        assert_relative_eq!(forecast.home_form.win_rate, 100.0);
        assert_relative_eq!(forecast.away_form.win_rate, 100.0);
    }

    #[test]
    fn test_forecast_home_leaning_history() {
        let home_matches = vec![
            played(HOME, 1, 2, 1),
            played(HOME, 2, 0, 1),
            played(HOME, 3, 3, 0),
            played(HOME, 4, 1, 1),
            played(HOME, 5, 2, 0),
        ];
        let away_matches = vec![played(6, AWAY, 2, 0), played(7, AWAY, 1, 1)];
        let h2h = vec![played(HOME, AWAY, 2, 0)];

        let engine = PredictionEngine::default();
        let forecast = engine.forecast(&team(HOME, "H"), &team(AWAY, "A"), &home_matches, &away_matches, &h2h);

        assert_relative_eq!(forecast.home_form.win_rate, 60.0);
        assert_eq!(forecast.away_form.win_rate, 0.0);
        assert_relative_eq!(forecast.probabilities.total(), 100.0, epsilon = 1e-9);
        assert!(forecast.probabilities.home_win_pct > forecast.probabilities.away_win_pct);
        assert!(matches!(forecast.prediction.most_likely, Outcome::HomeWin | Outcome::HomeWinOrDraw));
    }

    #[test]
    fn test_forecast_without_any_history() {
        let engine = PredictionEngine::default();
        let forecast = engine.forecast(&team(HOME, "H"), &team(AWAY, "A"), &[], &[], &[]);

        assert_eq!(forecast.home_form.matches, 0);
        assert_relative_eq!(forecast.probabilities.home_win_pct, 100.0);
        // 0 - 0 + 1 + 1 = 2 and 0 - 0 + 1 - 1 = 0
        assert_eq!(forecast.prediction.expected_home_goals, 2);
        assert_eq!(forecast.prediction.expected_away_goals, 0);
        assert_eq!(forecast.prediction.most_likely, Outcome::HomeWin);
    }
}
