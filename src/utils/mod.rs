use chrono::{DateTime, Utc};

/// Linearly recency-weighted average. Values are oldest first and the value at
/// index `i` carries weight `i + 1`, so the latest of `n` values counts `n`
/// times as much as the first. Empty input averages to 0.
pub fn weighted_average(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }

    let total_weight = (n * (n + 1) / 2) as f64;
    let weighted_sum: f64 = values
        .iter()
        .enumerate()
        .map(|(i, v)| v * (i + 1) as f64)
        .sum();

    weighted_sum / total_weight
}

/// `count / total` as a percentage, 0 when there is nothing to divide by
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Scale raw scores to percentages of their sum. A zero sum is replaced by 1,
/// so an all-zero input stays all zero instead of dividing by zero.
pub fn normalize_to_percent(scores: [f64; 3]) -> [f64; 3] {
    let mut total: f64 = scores.iter().sum();
    if total == 0.0 {
        total = 1.0;
    }
    scores.map(|s| s / total * 100.0)
}

/// Shortest team-name query worth matching
pub const MIN_TEAM_QUERY_LEN: usize = 3;

/// Parse an RFC 3339 timestamp (football-data.org `utcDate`) into UTC
pub fn parse_utc(timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Case-insensitive similarity in `[0, 1]` between a user-typed team name and
/// a provider name. The query scores 1.0 when its words appear as a run of
/// whole words in the name, so "Arsenal" finds "Arsenal FC" but "ars" does
/// not. Queries shorter than `MIN_TEAM_QUERY_LEN` never match.
pub fn team_name_similarity(query: &str, name: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let name = name.trim().to_lowercase();
    if query.chars().count() < MIN_TEAM_QUERY_LEN {
        return 0.0;
    }

    let query_words: Vec<&str> = query.split_whitespace().collect();
    let name_words: Vec<&str> = name.split_whitespace().collect();
    if name_words.windows(query_words.len()).any(|w| w == query_words.as_slice()) {
        return 1.0;
    }
    strsim::normalized_levenshtein(&query, &name)
}
