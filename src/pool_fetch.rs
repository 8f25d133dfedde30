use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::http_client;

const POOL_URL: &str = "https://api.mpg.football/api/data/championship-players-pool";
const PLAYER_STATS_URL: &str = "https://api.mpg.football/api/data/championship-player-stats";

const DETAIL_ATTEMPTS: usize = 3;
const DETAIL_RETRY_PAUSE: Duration = Duration::from_millis(300);

/// One entry of the championship players pool, as served by MPG.
/// Unknown fields (next match, trends, ultra position) are ignored.
/// The `stats` block is required: a pool payload without it is a
/// malformed upstream response, not a droppable row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayerRecord {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    pub last_name: String,
    pub position: u8,
    #[serde(default)]
    pub quotation: f64,
    pub stats: RawPlayerStats,
}

/// Upstream serializes the match counters as plain JSON numbers, so
/// they may carry fractional parts; the cleaner truncates them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayerStats {
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub average_points: Option<f64>,
    #[serde(default)]
    pub total_goals: f64,
    #[serde(default)]
    pub total_matches: f64,
    #[serde(default)]
    pub total_started_matches: f64,
    #[serde(default)]
    pub total_played_matches: f64,
}

#[derive(Debug, Deserialize)]
struct PoolResponse {
    #[serde(rename = "poolPlayers", default)]
    pool_players: Vec<RawPlayerRecord>,
}

/// Detailed per-player record. Only the `championships` mapping is
/// read; the first entry's `mercatoPickRate` is the metric the
/// refresh job stores.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerFullStats {
    #[serde(default)]
    pub championships: serde_json::Map<String, Value>,
}

pub fn fetch_pool(championship: u32, season: u32) -> Result<Vec<RawPlayerRecord>> {
    let client = http_client()?;
    let url = format!("{POOL_URL}/{championship}?season={season}");
    let body = get_text(client, &url).context("pool request failed")?;
    parse_pool_json(&body)
}

pub fn parse_pool_json(raw: &str) -> Result<Vec<RawPlayerRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty pool response"));
    }
    let parsed: PoolResponse = serde_json::from_str(trimmed).context("invalid pool json")?;
    Ok(parsed.pool_players)
}

/// Fetch the full per-player stats record. One bounded call per
/// player; transient failures get a short fixed retry, never an
/// unbounded loop.
pub fn fetch_player_full_stats(player_id: &str, season: u32) -> Result<PlayerFullStats> {
    let client = http_client()?;
    let url = format!("{PLAYER_STATS_URL}/{player_id}/{season}");

    let mut last_err = None;
    for attempt in 0..DETAIL_ATTEMPTS {
        match get_text(client, &url).and_then(|body| parse_player_full_stats_json(&body)) {
            Ok(full) => return Ok(full),
            Err(err) => {
                last_err = Some(err);
                if attempt + 1 < DETAIL_ATTEMPTS {
                    std::thread::sleep(DETAIL_RETRY_PAUSE);
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("player stats fetch failed")))
}

pub fn parse_player_full_stats_json(raw: &str) -> Result<PlayerFullStats> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty player stats response"));
    }
    serde_json::from_str(trimmed).context("invalid player stats json")
}

/// Pick rate of the first championship entry. Any missing link in
/// the path means the metric was never published for this player;
/// that is a 0, not an error.
pub fn extract_mercato_pick_rate(full: &PlayerFullStats) -> f64 {
    full.championships
        .values()
        .next()
        .and_then(Value::as_object)
        .and_then(|stats| stats.get("mercatoPickRate"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

fn get_text(client: &reqwest::blocking::Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }
    Ok(body)
}
