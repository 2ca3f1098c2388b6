//! Formatting helpers for timers, scoreboards and share links.

use crate::types::ScoreEntry;
use reqwest::Url;

/// Render a duration as `m:ss`
pub fn format_clock(ms: u64) -> String {
    let mins = ms / 60_000;
    let secs = (ms % 60_000) / 1000;
    format!("{}:{:02}", mins, secs)
}

/// Whole seconds, as shown next to leaderboard entries
pub fn format_seconds(ms: u64) -> String {
    format!("{}s", ms / 1000)
}

/// One scoreboard row: `1. Ada - 28 pts - 61s`
pub fn scoreboard_line(rank: usize, entry: &ScoreEntry) -> String {
    format!(
        "{}. {} - {} pts - {}",
        rank,
        entry.name,
        entry.score,
        format_seconds(entry.time)
    )
}

/// Link that drops a participant straight into `room`.
///
/// An empty origin gives a relative link.
pub fn player_link(origin: &str, room: &str) -> String {
    let query = Url::parse_with_params("http://localhost/player", &[("game", room)])
        .ok()
        .and_then(|url| url.query().map(str::to_string))
        .unwrap_or_default();
    format!("{}/player?{}", origin.trim_end_matches('/'), query)
}
