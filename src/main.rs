use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;

use isl_stats::catalog::{self, StatScope};
use isl_stats::export::{self, WideHeader};
use isl_stats::extract;
use isl_stats::squad_info;
use isl_stats::stats_fetch::{self, ScrapeRun};

const DEFAULT_TEAMS_INFO: &str = "data/teams_info.json";

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
    let Some(command) = args.first().map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    match command {
        "clubs" => {
            let out = parse_path_arg(&args, "--out").unwrap_or_else(|| PathBuf::from("club_stats.csv"));
            let run = stats_fetch::scrape_club_statistics()?;
            let rows = export::write_wide_csv(
                &out,
                &run.table,
                catalog::all(StatScope::Club),
                WideHeader::Club,
            )?;
            print_run_summary("club", &run, rows, &out);
        }
        "players" => {
            let teams_path =
                parse_path_arg(&args, "--teams").unwrap_or_else(|| PathBuf::from(DEFAULT_TEAMS_INFO));
            let out =
                parse_path_arg(&args, "--out").unwrap_or_else(|| PathBuf::from("player_stats.csv"));

            let info = squad_info::load_teams_info(&teams_path)?;
            let teams = squad_info::team_refs(&info);
            let run = stats_fetch::scrape_player_statistics(&teams)?;
            let rows = export::write_wide_csv(
                &out,
                &run.table,
                catalog::all(StatScope::Player),
                WideHeader::Player,
            )?;
            print_run_summary("player", &run, rows, &out);
        }
        "stat" => {
            let code = args
                .get(1)
                .filter(|a| !a.starts_with("--"))
                .context("usage: isl_stats stat CODE [--club ID]")?;
            run_single_stat(code, parse_club_arg(&args))?;
        }
        "list" => {
            println!("Club statistics ({}):", catalog::CLUB_STATS.len());
            for desc in catalog::CLUB_STATS {
                println!("  {:<22} {}", desc.id, desc.display_name);
            }
            println!("Player statistics ({}):", catalog::PLAYER_STATS.len());
            for desc in catalog::PLAYER_STATS {
                println!("  {:<22} {}", desc.id, desc.display_name);
            }
        }
        other => {
            // Bare statistic code is shorthand for `stat CODE`.
            if catalog::lookup_any(other).is_ok() {
                run_single_stat(other, parse_club_arg(&args))?;
            } else {
                print_usage();
                anyhow::bail!("unknown command or statistic: {other}");
            }
        }
    }

    Ok(())
}

fn run_single_stat(code: &str, club: Option<u32>) -> Result<()> {
    let (scope, desc) = catalog::lookup_any(code)?;
    let html = stats_fetch::fetch_statistic_page(scope, desc.id, club)?;
    let extraction = extract::extract(&html, desc)?;

    println!("{} ({})", desc.display_name, desc.id);
    for row in &extraction.rows {
        println!("{} = {}", row.entity.to_uppercase(), row.raw_value);
    }
    println!(
        "{} entries via {:?} strategy, confidence {:?}, {} rows dropped",
        extraction.rows.len(),
        extraction.strategy,
        extraction.confidence,
        extraction.dropped
    );
    Ok(())
}

fn print_run_summary(kind: &str, run: &ScrapeRun, rows: usize, out: &PathBuf) {
    println!("{kind} scrape complete at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("Statistics: {}/{}", run.succeeded, run.attempted);
    println!("Entities exported: {rows} -> {}", out.display());
    if run.dropped_rows > 0 {
        println!("Rows dropped by value coercion: {}", run.dropped_rows);
    }
    if !run.skipped.is_empty() {
        println!("Skipped: {}", run.skipped.len());
        for line in run.skipped.iter().take(8) {
            println!(" - {line}");
        }
    }
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

fn parse_club_arg(args: &[String]) -> Option<u32> {
    parse_path_arg(args, "--club").and_then(|p| p.to_string_lossy().parse().ok())
}

fn print_usage() {
    println!("Indonesia Super League statistics scraper");
    println!();
    println!("Usage:");
    println!("  isl_stats clubs [--out FILE]");
    println!("  isl_stats players [--teams FILE] [--out FILE]");
    println!("  isl_stats stat CODE [--club ID]");
    println!("  isl_stats list");
}
