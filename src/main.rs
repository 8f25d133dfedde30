use std::process::ExitCode;

use anyhow::{Result, anyhow};

use mpg_scout::cleaning::Position;
use mpg_scout::present;
use mpg_scout::request::{self, RankRequest};

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    match run() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let request = parse_args(&args)?;
    let rows = request::top_players(&request)?;
    present::to_pretty_json(&rows)
}

fn parse_args(args: &[String]) -> Result<RankRequest> {
    let count_raw =
        flag_value(args, "--top-number").ok_or_else(|| anyhow!("--top-number is required"))?;
    let count = count_raw
        .parse::<i64>()
        .map_err(|_| anyhow!("--top-number must be an integer, got \"{count_raw}\""))?;
    if count <= 0 {
        return Err(anyhow!("--top-number must be a positive integer, got {count}"));
    }

    let criterion = flag_value(args, "--criterion");

    let mut positions = Vec::new();
    if let Some(raw) = flag_value(args, "--positions") {
        for code in raw.split(',') {
            let code = code.trim();
            if code.is_empty() {
                continue;
            }
            let position = Position::from_letter(code).ok_or_else(|| {
                anyhow!("unknown position code \"{code}\": valid codes are G, D, M, A")
            })?;
            positions.push(position);
        }
    }

    Ok(RankRequest {
        count: count as usize,
        criterion,
        positions,
    })
}

fn flag_value(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&format!("{name}=")) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
