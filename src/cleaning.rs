use deunicode::deunicode;
use serde::Serialize;

use crate::pool_fetch::RawPlayerRecord;

/// Board position, mapped from the MPG numeric code. The single
/// letters are the wire codes the original service exposed
/// (`A` for forwards, French "attaquant").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Position {
    #[serde(rename = "G")]
    Goalkeeper,
    #[serde(rename = "D")]
    Defender,
    #[serde(rename = "M")]
    Midfielder,
    #[serde(rename = "A")]
    Forward,
}

impl Position {
    pub const BOARD_ORDER: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    pub fn from_letter(raw: &str) -> Option<Self> {
        match raw.trim() {
            "G" | "g" => Some(Position::Goalkeeper),
            "D" | "d" => Some(Position::Defender),
            "M" | "m" => Some(Position::Midfielder),
            "A" | "a" => Some(Position::Forward),
            _ => None,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Position::Goalkeeper => "G",
            Position::Defender => "D",
            Position::Midfielder => "M",
            Position::Forward => "A",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        }
    }
}

/// Canonical player row after cleaning. Serializes to the camelCase
/// record shape the original service returned (`pid`,
/// `playerFullName`, `mercatoPR`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRow {
    #[serde(rename = "pid")]
    pub id: String,
    #[serde(rename = "playerFullName")]
    pub full_name: String,
    pub position: Position,
    pub average_rating: f64,
    pub average_points: i64,
    pub total_goals: i64,
    pub total_matches: i64,
    pub total_started_matches: i64,
    pub total_played_matches: i64,
    pub quotation: f64,
    pub participation: f64,
    #[serde(rename = "mercatoPR")]
    pub mercato_pick_rate: f64,
}

/// Pure transform from the raw pool to canonical rows. Records that
/// cannot satisfy the row invariants are excluded, never defaulted:
/// unmapped position codes, zero total matches (participation would
/// divide by zero), and missing rating or points.
pub fn clean_pool(raw: Vec<RawPlayerRecord>) -> Vec<PlayerRow> {
    let mut rows = Vec::with_capacity(raw.len());
    for record in raw {
        let Some(row) = clean_record(record) else {
            continue;
        };
        rows.push(row);
    }
    rows
}

fn clean_record(record: RawPlayerRecord) -> Option<PlayerRow> {
    let position = Position::from_code(record.position)?;
    let stats = record.stats;
    let average_rating = stats.average_rating?;
    let average_points = stats.average_points?;
    if stats.total_matches == 0.0 {
        return None;
    }

    let participation = round2(stats.total_played_matches / stats.total_matches * 100.0);

    Some(PlayerRow {
        full_name: build_full_name(&record.last_name, record.first_name.as_deref()),
        id: record.id,
        position,
        average_rating: round2(average_rating),
        // Counter fields keep integer semantics: fractional parts
        // are discarded, not rounded.
        average_points: average_points as i64,
        total_goals: stats.total_goals as i64,
        total_matches: stats.total_matches as i64,
        total_started_matches: stats.total_started_matches as i64,
        total_played_matches: stats.total_played_matches as i64,
        quotation: record.quotation,
        participation,
        mercato_pick_rate: 0.0,
    })
}

/// `"{last} {first}"` with a missing first name trimmed away, folded
/// to unaccented ASCII so sorting and matching are locale-stable.
fn build_full_name(last_name: &str, first_name: Option<&str>) -> String {
    let mut name = last_name.trim().to_string();
    if let Some(first) = first_name.map(str::trim) {
        if !first.is_empty() {
            name.push(' ');
            name.push_str(first);
        }
    }
    deunicode(&name)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
