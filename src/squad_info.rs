use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::warn;
use serde::Deserialize;

use crate::reconcile::{DemographicRecord, Position};

/// Demographic source: one snapshot of every squad, collected separately
/// from the statistic pages. Field names are fixed by the snapshot format.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamsInfo {
    pub teams: Vec<TeamInfo>,
    #[serde(rename = "retrieveDate", default)]
    pub retrieve_date: String,
    #[serde(rename = "totalClub", default)]
    pub total_clubs: usize,
    #[serde(rename = "totalPlayers", default)]
    pub total_players: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamInfo {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub details_url: String,
    #[serde(default)]
    pub players: Vec<PlayerInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub negara: String,
    #[serde(default)]
    pub usia: u32,
    #[serde(default)]
    pub posisi: String,
    #[serde(rename = "pictureUrl", default)]
    pub picture_url: String,
    #[serde(default)]
    pub penampilan: u32,
    #[serde(rename = "detailsPlayerUrl", default)]
    pub details_player_url: String,
}

/// Club identity for per-club statistic fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
}

pub fn load_teams_info(path: &Path) -> Result<TeamsInfo> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read teams info {}", path.display()))?;
    let info: TeamsInfo = serde_json::from_str(&raw)
        .with_context(|| format!("parse teams info {}", path.display()))?;

    let counted: usize = info.teams.iter().map(|t| t.players.len()).sum();
    if info.total_players != 0 && counted != info.total_players {
        warn!(
            "teams info claims {} players but contains {}",
            info.total_players, counted
        );
    }
    Ok(info)
}

pub fn team_refs(info: &TeamsInfo) -> Vec<TeamRef> {
    info.teams
        .iter()
        .map(|t| TeamRef {
            id: t.id,
            name: t.name.clone(),
        })
        .collect()
}

/// Flatten the per-team player lists into the reconciler's input, keeping
/// team order then squad order.
pub fn demographic_records(info: &TeamsInfo) -> Vec<DemographicRecord> {
    let mut out = Vec::new();
    for team in &info.teams {
        for player in &team.players {
            out.push(DemographicRecord {
                name: player.name.clone(),
                full_name: player.full_name.clone(),
                team: team.name.clone(),
                country: player.negara.clone(),
                age: player.usia,
                position: Position::from_label(&player.posisi),
                picture_url: player.picture_url.clone(),
                appearances: player.penampilan,
            });
        }
    }
    out
}

/// Age of the snapshot in whole days, if `retrieveDate` is parseable.
/// The scrape that produced it writes a local ISO timestamp.
pub fn snapshot_age_days(info: &TeamsInfo) -> Option<i64> {
    let parsed = NaiveDateTime::parse_from_str(&info.retrieve_date, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&info.retrieve_date, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    Some((Local::now().naive_local() - parsed).num_days())
}
