use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;

use isl_stats::catalog::{self, StatScope};
use isl_stats::export;
use isl_stats::reconcile::{self, MatchStatus};
use isl_stats::squad_info;
use isl_stats::stats_dataset;

const DEFAULT_TEAMS_INFO: &str = "data/teams_info.json";
const DEFAULT_STATS_CSV: &str = "player_stats.csv";
const DEFAULT_OUTPUT: &str = "data/players_statistics.csv";

const STALE_SNAPSHOT_DAYS: i64 = 30;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let teams_path = parse_path_arg(&args, "--teams").unwrap_or_else(|| PathBuf::from(DEFAULT_TEAMS_INFO));
    let stats_path = parse_path_arg(&args, "--stats").unwrap_or_else(|| PathBuf::from(DEFAULT_STATS_CSV));
    let out_path = parse_path_arg(&args, "--out").unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let info = squad_info::load_teams_info(&teams_path)?;
    if let Some(age) = squad_info::snapshot_age_days(&info) {
        if age > STALE_SNAPSHOT_DAYS {
            println!("Warning: demographic snapshot is {age} days old");
        }
    }
    let demographics = squad_info::demographic_records(&info);
    let statistics = stats_dataset::load_statistic_records(&stats_path)?;

    println!(
        "Loaded {} players from {} clubs, {} statistic rows",
        demographics.len(),
        info.teams.len(),
        statistics.len()
    );

    let catalog = catalog::all(StatScope::Player);
    let result = reconcile::reconcile(&demographics, &statistics, catalog);

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let rows = export::write_merged_csv(&out_path, &result.merged, catalog)?;

    let mut exact = 0usize;
    let mut partial = 0usize;
    let mut surname = 0usize;
    let mut no_match = 0usize;
    let mut contested = 0usize;
    for event in &result.report {
        match event.status {
            MatchStatus::Exact => exact += 1,
            MatchStatus::Partial => partial += 1,
            MatchStatus::Surname => surname += 1,
            MatchStatus::NoMatch => no_match += 1,
            MatchStatus::ClaimedByOther => contested += 1,
        }
    }

    println!();
    println!("Matching summary");
    println!("Players merged: {rows} -> {}", out_path.display());
    println!("  exact: {exact}");
    println!("  partial: {partial}");
    println!("  surname: {surname}");
    println!("  no match: {no_match}");
    if contested > 0 {
        println!("  claimed by another record: {contested}");
    }

    if no_match > 0 {
        println!();
        println!("Players without statistics:");
        let missing: Vec<&str> = result
            .report
            .iter()
            .filter(|e| e.status == MatchStatus::NoMatch)
            .map(|e| e.demographic_key.as_str())
            .collect();
        for key in missing.iter().take(10) {
            println!("  - {key}");
        }
        if missing.len() > 10 {
            println!("  ... and {} more", missing.len() - 10);
        }
    }

    if !result.unmatched_statistics.is_empty() {
        println!();
        println!(
            "Statistic rows with no demographic record: {}",
            result.unmatched_statistics.len()
        );
        for stat in result.unmatched_statistics.iter().take(10) {
            println!("  - {} ({})", stat.player_name, stat.team);
        }
    }

    Ok(())
}

fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
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
