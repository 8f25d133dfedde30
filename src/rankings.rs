use std::collections::HashMap;

use anyhow::{Result, anyhow};

use crate::cleaning::{PlayerRow, Position};
use crate::pick_rate_store::PickRateStore;

/// Shared ceiling for the serving boundary and the refresh job: the
/// nightly job records pick rates for exactly this many players per
/// position, so no request may rank deeper than the cache covers.
pub const TOP_LIMIT: usize = 25;

/// Eligibility cutoff: only players who took part in more than this
/// share of their team's matches are ranked. Hard-coded on purpose.
pub const MIN_PARTICIPATION: f64 = 75.0;

/// The numeric row fields a ranking may sort by. Statically
/// enumerated so a bad wire name fails at the boundary instead of
/// turning into a silent column miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankCriterion {
    AverageRating,
    AveragePoints,
    TotalGoals,
    TotalMatches,
    TotalStartedMatches,
    TotalPlayedMatches,
    Quotation,
    Participation,
}

impl Default for RankCriterion {
    fn default() -> Self {
        RankCriterion::AveragePoints
    }
}

impl RankCriterion {
    pub const FIELD_NAMES: &'static [&'static str] = &[
        "averageRating",
        "averagePoints",
        "totalGoals",
        "totalMatches",
        "totalStartedMatches",
        "totalPlayedMatches",
        "quotation",
        "participation",
    ];

    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "averageRating" => Ok(RankCriterion::AverageRating),
            "averagePoints" => Ok(RankCriterion::AveragePoints),
            "totalGoals" => Ok(RankCriterion::TotalGoals),
            "totalMatches" => Ok(RankCriterion::TotalMatches),
            "totalStartedMatches" => Ok(RankCriterion::TotalStartedMatches),
            "totalPlayedMatches" => Ok(RankCriterion::TotalPlayedMatches),
            "quotation" => Ok(RankCriterion::Quotation),
            "participation" => Ok(RankCriterion::Participation),
            other => Err(anyhow!(
                "unknown ranking criterion \"{other}\": valid fields are {}",
                Self::FIELD_NAMES.join(", ")
            )),
        }
    }

    pub fn field_name(self) -> &'static str {
        match self {
            RankCriterion::AverageRating => "averageRating",
            RankCriterion::AveragePoints => "averagePoints",
            RankCriterion::TotalGoals => "totalGoals",
            RankCriterion::TotalMatches => "totalMatches",
            RankCriterion::TotalStartedMatches => "totalStartedMatches",
            RankCriterion::TotalPlayedMatches => "totalPlayedMatches",
            RankCriterion::Quotation => "quotation",
            RankCriterion::Participation => "participation",
        }
    }

    fn value(self, row: &PlayerRow) -> f64 {
        match self {
            RankCriterion::AverageRating => row.average_rating,
            RankCriterion::AveragePoints => row.average_points as f64,
            RankCriterion::TotalGoals => row.total_goals as f64,
            RankCriterion::TotalMatches => row.total_matches as f64,
            RankCriterion::TotalStartedMatches => row.total_started_matches as f64,
            RankCriterion::TotalPlayedMatches => row.total_played_matches as f64,
            RankCriterion::Quotation => row.quotation,
            RankCriterion::Participation => row.participation,
        }
    }
}

/// Top rows per position, each group independently sorted and
/// capped. Built fresh per request and immutable afterwards; groups
/// are held in board order (G, D, M, A) but callers pick their own
/// output order through [`RankedTable::select`].
#[derive(Debug, Clone)]
pub struct RankedTable {
    groups: Vec<(Position, Vec<PlayerRow>)>,
}

impl RankedTable {
    /// Rows of one position group, in ranking order.
    pub fn group(&self, position: Position) -> &[PlayerRow] {
        self.groups
            .iter()
            .find(|(pos, _)| *pos == position)
            .map(|(_, rows)| rows.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenate the requested position groups, keeping each
    /// group's internal order. Cross-position order follows the
    /// request, not a canonical board order.
    pub fn select(&self, positions: &[Position]) -> Vec<PlayerRow> {
        let mut out = Vec::new();
        for position in positions {
            out.extend_from_slice(self.group(*position));
        }
        out
    }

    /// All ranked rows in board order.
    pub fn rows(&self) -> impl Iterator<Item = &PlayerRow> {
        self.groups.iter().flat_map(|(_, rows)| rows.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, rows)| rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Select the top `count` rows per position among sufficiently
/// active players, ordered by `(criterion DESC, averagePoints DESC,
/// id ASC)`, then enrich the survivors with cached pick rates in one
/// batched lookup. Groups with fewer eligible rows than `count` are
/// returned whole.
pub fn rank_players(
    rows: &[PlayerRow],
    count: usize,
    criterion: RankCriterion,
    store: &PickRateStore,
) -> Result<RankedTable> {
    if count == 0 {
        return Err(anyhow!("top count must be a positive integer"));
    }

    let mut groups: Vec<(Position, Vec<PlayerRow>)> = Position::BOARD_ORDER
        .iter()
        .map(|position| (*position, Vec::new()))
        .collect();

    for row in rows {
        if row.participation <= MIN_PARTICIPATION {
            continue;
        }
        if let Some((_, group)) = groups.iter_mut().find(|(pos, _)| *pos == row.position) {
            group.push(row.clone());
        }
    }

    for (_, group) in &mut groups {
        group.sort_by(|a, b| {
            criterion
                .value(b)
                .total_cmp(&criterion.value(a))
                .then_with(|| b.average_points.cmp(&a.average_points))
                .then_with(|| a.id.cmp(&b.id))
        });
        group.truncate(count);
    }

    let mut table = RankedTable { groups };
    apply_pick_rates(&mut table, store)?;
    Ok(table)
}

fn apply_pick_rates(table: &mut RankedTable, store: &PickRateStore) -> Result<()> {
    let ids: Vec<String> = table.rows().map(|row| row.id.clone()).collect();
    let rates: HashMap<String, f64> = store.get_many(&ids)?;
    for (_, group) in &mut table.groups {
        for row in group {
            row.mercato_pick_rate = rates.get(&row.id).copied().unwrap_or(0.0);
        }
    }
    Ok(())
}
