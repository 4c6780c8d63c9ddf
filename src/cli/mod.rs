use anyhow::{anyhow, bail, Result};

use crate::config::ModelArgs;
use crate::models::{Fixture, Forecast, ForecastInput};
use crate::services::{DataFetcher, MatchDataSource, PredictionEngine};
use crate::utils::team_name_similarity;

/// Competitions offered by the CLI: (football-data.org code, display name)
pub const LEAGUES: &[(&str, &str)] = &[
    ("PL", "Premier League"),
    ("PD", "La Liga"),
    ("SA", "Serie A"),
    ("BL1", "Bundesliga"),
    ("FL1", "Ligue 1"),
    ("CL", "UEFA Champions League"),
];

const MIN_NAME_SIMILARITY: f64 = 0.5;

/// How the user picked a fixture from the upcoming list
#[derive(Debug, Clone)]
pub enum FixtureSelection {
    /// 1-based position in the listing
    Index(usize),
    Teams { home: String, away: String },
}

pub fn league_name(code: &str) -> Option<&'static str> {
    LEAGUES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

pub fn show_leagues() {
    println!("🏆 Available Leagues:\n");
    for (i, (code, name)) in LEAGUES.iter().enumerate() {
        println!("{}. {} ({})", i + 1, name, code);
    }
    println!("\n💡 Use 'matchcast fixtures --competition <CODE>' to list upcoming matches");
}

pub async fn show_fixtures(competition: &str, limit: usize) -> Result<()> {
    let competition = competition.to_uppercase();
    let fetcher = connect()?;
    let fixtures = fetcher.upcoming_fixtures(&competition).await?;

    println!("📘 {}\n", league_name(&competition).unwrap_or(competition.as_str()));

    if fixtures.is_empty() {
        println!("📭 No upcoming matches in this competition right now.");
        return Ok(());
    }

    println!("📅 Upcoming matches:");
    for (i, fixture) in fixtures.iter().take(limit).enumerate() {
        println!(
            "{}. {} vs {}  🕒 {}",
            i + 1,
            fixture.home_team.name,
            fixture.away_team.name,
            format_kickoff(fixture)
        );
    }

    Ok(())
}

pub async fn predict_fixture(competition: &str, selection: FixtureSelection, model: &ModelArgs, json: bool) -> Result<()> {
    let competition = competition.to_uppercase();
    let fetcher = connect()?;
    let fixtures = fetcher.upcoming_fixtures(&competition).await?;

    if fixtures.is_empty() {
        println!("📭 No upcoming matches in this competition right now.");
        return Ok(());
    }

    let fixture = select_fixture(&fixtures, &selection)?;
    tracing::info!("Selected fixture {}: {} vs {}", fixture.id, fixture.home_team.name, fixture.away_team.name);

    let engine = PredictionEngine::new(model.weights(), model.limits());
    let forecast = engine.predict(&fetcher, &fixture.home_team, &fixture.away_team).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
    } else {
        print_forecast(&forecast);
    }

    Ok(())
}

fn connect() -> Result<DataFetcher> {
    let fetcher = DataFetcher::new()?;
    if !fetcher.has_api_key() {
        bail!("FOOTBALL_DATA_API_KEY not set. Add it to your environment or a .env file");
    }
    Ok(fetcher)
}

pub fn select_fixture<'a>(fixtures: &'a [Fixture], selection: &FixtureSelection) -> Result<&'a Fixture> {
    match selection {
        FixtureSelection::Index(n) => n
            .checked_sub(1)
            .and_then(|i| fixtures.get(i))
            .ok_or_else(|| anyhow!("Invalid selection {}: choose 1-{}", n, fixtures.len())),
        FixtureSelection::Teams { home, away } => {
            let scored: Vec<(f64, &Fixture)> = fixtures
                .iter()
                .map(|f| {
                    let score = team_name_similarity(home, &f.home_team.name)
                        .min(team_name_similarity(away, &f.away_team.name));
                    (score, f)
                })
                .collect();

            let best = scored.iter().map(|(score, _)| *score).fold(0.0, f64::max);
            if best < MIN_NAME_SIMILARITY {
                bail!("No upcoming fixture matches '{}' vs '{}'", home, away);
            }

            let candidates: Vec<&Fixture> = scored
                .iter()
                .filter(|(score, _)| *score == best)
                .map(|(_, f)| *f)
                .collect();

            match candidates.as_slice() {
                [fixture] => Ok(*fixture),
                _ => {
                    let listing: Vec<String> = candidates
                        .iter()
                        .map(|f| format!("{} vs {}", f.home_team.name, f.away_team.name))
                        .collect();
                    bail!(
                        "'{}' vs '{}' is ambiguous, matches: {}. Use --fixture <N> or fuller names",
                        home,
                        away,
                        listing.join("; ")
                    )
                }
            }
        }
    }
}

pub fn format_kickoff(fixture: &Fixture) -> String {
    match fixture.kickoff() {
        Some(kickoff) => kickoff.format("%d/%m/%Y - %H:%M UTC").to_string(),
        None => fixture.utc_date.clone(),
    }
}

fn print_forecast(forecast: &Forecast) {
    let home = &forecast.home_team.name;
    let away = &forecast.away_team.name;
    let probs = &forecast.probabilities;
    let prediction = &forecast.prediction;

    println!("\n🎯 Prediction for: {} 🆚 {}", home, away);

    for gap in &forecast.data_gaps {
        let what = match gap.input {
            ForecastInput::HomeRecentMatches => format!("{} recent matches", home),
            ForecastInput::AwayRecentMatches => format!("{} recent matches", away),
            ForecastInput::HeadToHead => "head-to-head history".to_string(),
        };
        println!("⚠️  No data for {} ({}), treated as empty", what, gap.reason);
    }

    println!("\n🔮 Pre-match forecast:");
    println!("🏠 {} win: {:.1}%", home, probs.home_win_pct);
    println!("🤝 Draw: {:.1}%", probs.draw_pct);
    println!("🚩 {} win: {:.1}%", away, probs.away_win_pct);

    println!(
        "\n📊 Form: {} home {:.0}% wins ({} matches) | {} away {:.0}% wins ({} matches) | H2H over {} meetings",
        home,
        forecast.home_form.win_rate,
        forecast.home_form.matches,
        away,
        forecast.away_form.win_rate,
        forecast.away_form.matches,
        forecast.head_to_head.matches
    );

    println!("\n✅ Most likely result: {}", prediction.most_likely_label());
    println!(
        "🎯 Expected score: {} {} - {} {}",
        home, prediction.expected_home_goals, prediction.expected_away_goals, away
    );
}
