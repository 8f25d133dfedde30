use mpg_scout::cleaning::{PlayerRow, Position};
use mpg_scout::pick_rate_store::PickRateStore;
use mpg_scout::rankings::{RankCriterion, TOP_LIMIT, rank_players};
use mpg_scout::request::clamp_count;

fn row(id: &str, position: Position, average_points: i64, participation: f64) -> PlayerRow {
    PlayerRow {
        id: id.to_string(),
        full_name: format!("Player {id}"),
        position,
        average_rating: 6.5,
        average_points,
        total_goals: 0,
        total_matches: 34,
        total_started_matches: 30,
        total_played_matches: 30,
        quotation: 20.0,
        participation,
        mercato_pick_rate: 0.0,
    }
}

fn empty_store() -> PickRateStore {
    PickRateStore::open_in_memory().expect("in-memory store should open")
}

#[test]
fn participation_cutoff_is_hard() {
    let rows = vec![
        row("p1", Position::Forward, 80, 75.0),
        row("p2", Position::Forward, 90, 75.01),
        row("p3", Position::Forward, 70, 40.0),
    ];
    let table = rank_players(&rows, 10, RankCriterion::default(), &empty_store())
        .expect("ranking should succeed");
    let forwards = table.group(Position::Forward);
    // Exactly one row clears the > 75 bar; 75.0 itself does not.
    assert_eq!(forwards.len(), 1);
    assert_eq!(forwards[0].id, "p2");
}

#[test]
fn ties_on_points_break_by_id_ascending() {
    let rows = vec![
        row("p2", Position::Forward, 80, 90.0),
        row("p3", Position::Forward, 75, 90.0),
        row("p1", Position::Forward, 80, 90.0),
    ];
    let table = rank_players(&rows, 2, RankCriterion::AveragePoints, &empty_store())
        .expect("ranking should succeed");
    let forwards = table.group(Position::Forward);
    assert_eq!(forwards.len(), 2);
    assert_eq!(forwards[0].id, "p1");
    assert_eq!(forwards[1].id, "p2");
}

#[test]
fn criterion_ties_break_by_average_points_then_id() {
    let mut a = row("a", Position::Midfielder, 40, 90.0);
    let mut b = row("b", Position::Midfielder, 55, 90.0);
    let mut c = row("c", Position::Midfielder, 55, 90.0);
    a.total_goals = 7;
    b.total_goals = 7;
    c.total_goals = 7;

    let table = rank_players(
        &[a, b, c],
        3,
        RankCriterion::TotalGoals,
        &empty_store(),
    )
    .expect("ranking should succeed");
    let mids = table.group(Position::Midfielder);
    assert_eq!(mids[0].id, "b");
    assert_eq!(mids[1].id, "c");
    assert_eq!(mids[2].id, "a");
}

#[test]
fn short_groups_are_returned_whole() {
    let rows: Vec<PlayerRow> = (0..12)
        .map(|i| row(&format!("d{i:02}"), Position::Defender, 50 + i, 90.0))
        .collect();
    let table = rank_players(&rows, 30, RankCriterion::default(), &empty_store())
        .expect("ranking should succeed");
    assert_eq!(table.group(Position::Defender).len(), 12);
    assert!(table.group(Position::Forward).is_empty());
}

#[test]
fn zero_count_is_rejected() {
    let rows = vec![row("p1", Position::Forward, 80, 90.0)];
    let err = rank_players(&rows, 0, RankCriterion::default(), &empty_store())
        .expect_err("zero count should be rejected");
    assert!(err.to_string().contains("positive"));
}

#[test]
fn unknown_criterion_lists_valid_fields() {
    let err = RankCriterion::parse("nonexistentField").expect_err("should be rejected");
    let message = err.to_string();
    assert!(message.contains("unknown ranking criterion"));
    for name in RankCriterion::FIELD_NAMES {
        assert!(message.contains(name), "message should list {name}");
    }
}

#[test]
fn all_field_names_parse() {
    for name in RankCriterion::FIELD_NAMES {
        let criterion = RankCriterion::parse(name).expect("listed field should parse");
        assert_eq!(criterion.field_name(), *name);
    }
}

#[test]
fn selection_follows_request_order() {
    let rows = vec![
        row("g1", Position::Goalkeeper, 60, 90.0),
        row("m1", Position::Midfielder, 70, 90.0),
        row("m2", Position::Midfielder, 65, 90.0),
        row("f1", Position::Forward, 80, 90.0),
    ];
    let table = rank_players(&rows, 5, RankCriterion::default(), &empty_store())
        .expect("ranking should succeed");

    let picked = table.select(&[Position::Midfielder, Position::Goalkeeper]);
    let ids: Vec<&str> = picked.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["m1", "m2", "g1"]);
}

#[test]
fn ranked_rows_carry_cached_pick_rates() {
    let mut store = empty_store();
    store
        .put_all(&[("p1".to_string(), 12.5), ("zzz".to_string(), 99.0)])
        .expect("seed write should succeed");

    let rows = vec![
        row("p1", Position::Forward, 80, 90.0),
        row("p2", Position::Forward, 70, 90.0),
    ];
    let table = rank_players(&rows, 5, RankCriterion::default(), &store)
        .expect("ranking should succeed");
    let forwards = table.group(Position::Forward);
    assert_eq!(forwards[0].mercato_pick_rate, 12.5);
    // A cache miss is a 0, never an error.
    assert_eq!(forwards[1].mercato_pick_rate, 0.0);
}

#[test]
fn boundary_caps_count_at_top_limit() {
    assert_eq!(clamp_count(30), TOP_LIMIT);
    assert_eq!(clamp_count(TOP_LIMIT), TOP_LIMIT);
    assert_eq!(clamp_count(10), 10);
}
