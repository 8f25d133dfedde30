use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Result;
use chrono::Local;

use mpg_scout::pick_rate_store::PickRateStore;
use mpg_scout::refresh_job::{self, RefreshSummary};
use mpg_scout::request;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let db_path = match parse_db_path_arg(&args) {
        Some(path) => path,
        None => request::db_path_from_env()?,
    };
    let championship = request::championship_from_env();
    let season = request::season_from_env();

    let mut store = PickRateStore::open(&db_path)?;

    if args.iter().any(|arg| arg == "--daemon") {
        loop {
            run_once(&mut store, &db_path, championship, season);
            let wait = refresh_job::duration_until_next_midnight(Local::now().naive_local());
            println!("next refresh in {}s", wait.as_secs());
            thread::sleep(wait);
        }
    }

    run_once(&mut store, &db_path, championship, season);
    Ok(())
}

fn run_once(store: &mut PickRateStore, db_path: &Path, championship: u32, season: u32) {
    match refresh_job::refresh_pick_rates(store, championship, season) {
        Ok(summary) => print_summary(&summary, db_path),
        Err(err) => eprintln!("refresh failed: {err:#}"),
    }
}

fn print_summary(summary: &RefreshSummary, db_path: &Path) {
    println!("Mercato pick rate refresh complete");
    println!("DB: {}", db_path.display());
    println!(
        "Players: {} ranked, {} updated, {} skipped",
        summary.players_total, summary.players_updated, summary.players_skipped
    );
    if !summary.errors.is_empty() {
        println!("  errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(6) {
            println!("   - {err}");
        }
    }
}

fn parse_db_path_arg(args: &[String]) -> Option<PathBuf> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--db=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--db" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
