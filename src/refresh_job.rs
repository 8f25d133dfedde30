use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDateTime};

use crate::cleaning::clean_pool;
use crate::pick_rate_store::PickRateStore;
use crate::pool_fetch;
use crate::rankings::{self, RankCriterion, TOP_LIMIT};

/// Stall guard for the nightly run: once exceeded, no new per-player
/// calls are issued and whatever was collected so far is written.
const MAX_RUN: Duration = Duration::from_secs(15 * 60);

const FALLBACK_DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct RefreshSummary {
    pub players_total: usize,
    pub players_updated: usize,
    pub players_skipped: usize,
    pub errors: Vec<String>,
}

/// Recompute mercato pick rates for the players any client may be
/// served: the top [`TOP_LIMIT`] per position under the default
/// criterion. One upstream call per player, issued sequentially —
/// this is the cost that keeps the metric out of the request path.
///
/// A player whose detail fetch fails is skipped (the previously
/// stored rate survives); a player whose record lacks the pick-rate
/// key path is written as 0. All collected pairs land in a single
/// transaction, so re-running with identical upstream data is
/// idempotent.
pub fn refresh_pick_rates(
    store: &mut PickRateStore,
    championship: u32,
    season: u32,
) -> Result<RefreshSummary> {
    let raw =
        pool_fetch::fetch_pool(championship, season).context("pool fetch for refresh failed")?;
    let rows = clean_pool(raw);
    let table = rankings::rank_players(&rows, TOP_LIMIT, RankCriterion::default(), store)?;

    let started = Instant::now();
    let mut entries: Vec<(String, f64)> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for row in table.rows() {
        if started.elapsed() > MAX_RUN {
            skipped += 1;
            errors.push(format!("{} ({}): run ceiling reached", row.full_name, row.id));
            continue;
        }
        match pool_fetch::fetch_player_full_stats(&row.id, season) {
            Ok(full) => {
                entries.push((row.id.clone(), pool_fetch::extract_mercato_pick_rate(&full)));
            }
            Err(err) => {
                skipped += 1;
                errors.push(format!("{} ({}): {err}", row.full_name, row.id));
            }
        }
    }

    let updated = store
        .put_all(&entries)
        .context("pick rate batch write failed")?;

    Ok(RefreshSummary {
        players_total: table.len(),
        players_updated: updated,
        players_skipped: skipped,
        errors,
    })
}

/// Time left until the next local midnight, the schedule the nightly
/// refresh runs on. Clamped to at least a minute so a wake landing
/// just short of midnight cannot spin.
pub fn duration_until_next_midnight(now: NaiveDateTime) -> Duration {
    let Some(tomorrow) = now.date().checked_add_days(Days::new(1)) else {
        return FALLBACK_DAY;
    };
    let Some(next_midnight) = tomorrow.and_hms_opt(0, 0, 0) else {
        return FALLBACK_DAY;
    };
    let seconds = (next_midnight - now).num_seconds().max(60);
    Duration::from_secs(seconds as u64)
}
