use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cleaning::{PlayerRow, Position, clean_pool};
use crate::pick_rate_store::{self, PickRateStore};
use crate::pool_fetch;
use crate::rankings::{self, RankCriterion, TOP_LIMIT};

const DEFAULT_CHAMPIONSHIP: u32 = 2;
const DEFAULT_SEASON: u32 = 2023;

/// One ranking request, fully explicit: no ambient query-arg state,
/// every parameter travels with the call.
#[derive(Debug, Clone)]
pub struct RankRequest {
    pub count: usize,
    pub criterion: Option<String>,
    pub positions: Vec<Position>,
}

/// Serving entry point: fetch a fresh pool, clean it, rank the top
/// players per position, and return the requested position groups in
/// request order. An empty position list defaults to forwards, the
/// original service's default. The count is capped at [`TOP_LIMIT`]
/// (the refresh job only maintains pick rates that deep); a zero
/// count is rejected, not clamped.
pub fn top_players(request: &RankRequest) -> Result<Vec<PlayerRow>> {
    let criterion = match request.criterion.as_deref() {
        Some(raw) => RankCriterion::parse(raw)?,
        None => RankCriterion::default(),
    };
    let count = clamp_count(request.count);

    let raw = pool_fetch::fetch_pool(championship_from_env(), season_from_env())?;
    let rows = clean_pool(raw);

    let store = open_store()?;
    let table = rankings::rank_players(&rows, count, criterion, &store)?;

    let positions: &[Position] = if request.positions.is_empty() {
        &[Position::Forward]
    } else {
        &request.positions
    };
    Ok(table.select(positions))
}

/// Cost-control cap applied at the boundary before the ranker sees
/// the count. Documented behavior, not an error.
pub fn clamp_count(count: usize) -> usize {
    count.min(TOP_LIMIT)
}

pub fn championship_from_env() -> u32 {
    env_u32("MPG_CHAMPIONSHIP", DEFAULT_CHAMPIONSHIP)
}

pub fn season_from_env() -> u32 {
    env_u32("MPG_SEASON", DEFAULT_SEASON)
}

pub fn db_path_from_env() -> Result<PathBuf> {
    if let Ok(raw) = std::env::var("MPG_DB_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    pick_rate_store::default_db_path().context("unable to resolve pick rate db path")
}

fn open_store() -> Result<PickRateStore> {
    let path = db_path_from_env()?;
    PickRateStore::open(&path)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(default)
}
