use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use mpg_scout::cleaning::{PlayerRow, clean_pool};
use mpg_scout::pick_rate_store::PickRateStore;
use mpg_scout::pool_fetch::parse_pool_json;
use mpg_scout::rankings::{RankCriterion, rank_players};

fn synthetic_pool_json(players: usize) -> String {
    let mut records = Vec::with_capacity(players);
    for i in 0..players {
        let position = (i % 4) + 1;
        let played = 10 + (i % 25);
        records.push(format!(
            r#"{{"id": "mpg_championship_player_{i}", "firstName": "Prénom", "lastName": "Nom{i}", "position": {position}, "quotation": {quotation}, "stats": {{"averageRating": {rating:.3}, "averagePoints": {points}, "totalGoals": {goals}, "totalMatches": 34, "totalStartedMatches": {played}, "totalPlayedMatches": {played}}}}}"#,
            quotation = 5 + (i % 45),
            rating = 4.0 + (i % 40) as f64 / 10.0,
            points = i % 120,
            goals = i % 30,
        ));
    }
    format!(r#"{{"poolPlayers": [{}]}}"#, records.join(", "))
}

fn synthetic_rows(players: usize) -> Vec<PlayerRow> {
    let raw = synthetic_pool_json(players);
    let records = parse_pool_json(&raw).expect("synthetic pool should parse");
    clean_pool(records)
}

fn bench_clean_pool(c: &mut Criterion) {
    let raw = synthetic_pool_json(600);
    c.bench_function("clean_pool_600", |b| {
        b.iter(|| {
            let records = parse_pool_json(black_box(&raw)).unwrap();
            let rows = clean_pool(records);
            black_box(rows.len());
        })
    });
}

fn bench_rank_players(c: &mut Criterion) {
    let rows = synthetic_rows(600);
    let mut store = PickRateStore::open_in_memory().expect("in-memory store should open");
    let seed: Vec<(String, f64)> = rows
        .iter()
        .map(|row| (row.id.clone(), 12.5))
        .collect();
    store.put_all(&seed).expect("seed write should succeed");

    c.bench_function("rank_players_600", |b| {
        b.iter(|| {
            let table = rank_players(
                black_box(&rows),
                25,
                RankCriterion::AveragePoints,
                &store,
            )
            .unwrap();
            black_box(table.len());
        })
    });

    c.bench_function("rank_players_600_by_rating", |b| {
        b.iter(|| {
            let table = rank_players(
                black_box(&rows),
                10,
                RankCriterion::AverageRating,
                &store,
            )
            .unwrap();
            black_box(table.len());
        })
    });
}

criterion_group!(benches, bench_clean_pool, bench_rank_players);
criterion_main!(benches);
