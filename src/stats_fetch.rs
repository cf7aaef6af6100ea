use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::{info, warn};

use crate::aggregate::AggregationTable;
use crate::catalog::{self, StatDescriptor, StatScope};
use crate::extract;
use crate::http_client::http_client;
use crate::squad_info::TeamRef;

const CLUB_STATS_URL: &str = "https://ileague.id/top_actions/club/BRI_SUPER_LEAGUE_2025-26";
const PLAYER_STATS_URL: &str = "https://ileague.id/top_actions/player/BRI_SUPER_LEAGUE_2025-26";

#[derive(Debug)]
pub struct ScrapeRun {
    pub table: AggregationTable,
    /// Statistics that contributed at least one row.
    pub succeeded: usize,
    pub attempted: usize,
    /// Rows lost to value coercion across the whole run.
    pub dropped_rows: usize,
    /// One line per skipped fetch/extraction, for the operator summary.
    pub skipped: Vec<String>,
}

/// Fetch one statistic page. The site renders each ranking as a form POST
/// against the same season endpoint, optionally scoped to a club.
pub fn fetch_statistic_page(scope: StatScope, stat_id: &str, club: Option<u32>) -> Result<String> {
    let client = http_client()?;
    let url = match scope {
        StatScope::Club => CLUB_STATS_URL,
        StatScope::Player => PLAYER_STATS_URL,
    };

    let mut form: Vec<(&str, String)> = vec![("statistik", stat_id.to_string())];
    if let Some(club_id) = club {
        form.push(("klub", club_id.to_string()));
    }

    let response = client
        .post(url)
        .form(&form)
        .send()
        .with_context(|| format!("request {stat_id}"))?
        .error_for_status()
        .with_context(|| format!("request {stat_id}"))?;
    response.text().with_context(|| format!("read body for {stat_id}"))
}

/// Scrape every club-level statistic into one wide table. A statistic whose
/// page yields no usable table is skipped (its column stays absent); the
/// run only fails when nothing at all could be extracted, which means the
/// source layout likely changed and needs an operator.
pub fn scrape_club_statistics() -> Result<ScrapeRun> {
    let mut run = ScrapeRun {
        table: AggregationTable::new(),
        succeeded: 0,
        attempted: 0,
        dropped_rows: 0,
        skipped: Vec::new(),
    };

    let stats = catalog::all(StatScope::Club);
    for desc in stats {
        run.attempted += 1;
        match scrape_one(StatScope::Club, desc, None) {
            Ok(extraction) => {
                info!(
                    "{}: {} clubs via {:?} ({:?})",
                    desc.id,
                    extraction.rows.len(),
                    extraction.strategy,
                    extraction.confidence
                );
                run.dropped_rows += extraction.dropped;
                run.table.add_run(desc, &extraction.rows);
                run.succeeded += 1;
            }
            Err(err) => {
                warn!("{}: skipped: {err:#}", desc.id);
                run.skipped.push(format!("{}: {err:#}", desc.id));
            }
        }
        pause_between_fetches();
    }

    if run.succeeded == 0 {
        bail!("no club statistic produced usable rows; source layout likely changed");
    }
    Ok(run)
}

/// Scrape every individual statistic, club by club, into one player-keyed
/// wide table. Players carry the club they were first extracted under.
pub fn scrape_player_statistics(teams: &[TeamRef]) -> Result<ScrapeRun> {
    if teams.is_empty() {
        bail!("no clubs to scrape player statistics for");
    }

    let mut run = ScrapeRun {
        table: AggregationTable::new(),
        succeeded: 0,
        attempted: 0,
        dropped_rows: 0,
        skipped: Vec::new(),
    };

    let stats = catalog::all(StatScope::Player);
    for desc in stats {
        let mut rows_for_stat = 0usize;
        for team in teams {
            run.attempted += 1;
            match scrape_one(StatScope::Player, desc, Some(team.id)) {
                Ok(extraction) => {
                    rows_for_stat += extraction.rows.len();
                    run.dropped_rows += extraction.dropped;
                    run.table
                        .add_run_for_team(desc, Some(&team.name), &extraction.rows);
                }
                Err(err) => {
                    warn!("{} ({}): skipped: {err:#}", desc.id, team.name);
                    run.skipped.push(format!("{} ({}): {err:#}", desc.id, team.name));
                }
            }
            pause_between_fetches();
        }
        if rows_for_stat > 0 {
            run.succeeded += 1;
        }
        info!("{}: {} player rows across {} clubs", desc.id, rows_for_stat, teams.len());
    }

    if run.succeeded == 0 {
        bail!("no player statistic produced usable rows; source layout likely changed");
    }
    Ok(run)
}

fn scrape_one(
    scope: StatScope,
    desc: &'static StatDescriptor,
    club: Option<u32>,
) -> Result<extract::Extraction> {
    let html = fetch_statistic_page(scope, desc.id, club)?;
    let extraction = extract::extract(&html, desc)?;
    Ok(extraction)
}

fn pause_between_fetches() {
    let millis = std::env::var("SCRAPE_DELAY_MS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(1000);
    if millis > 0 {
        thread::sleep(Duration::from_millis(millis));
    }
}
