use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::warn;

use crate::catalog::{StatScope, display_name_to_id};
use crate::reconcile::StatisticRecord;

/// Load the statistic source CSV: header `Player Name,Team,<display names>`,
/// one row per player. Metric columns are mapped to catalog identifiers by
/// display name; columns the catalog does not know are skipped once with a
/// warning. Blank and unparsable cells contribute no metric (the merge
/// defaults them to 0 later).
pub fn load_statistic_records(path: &Path) -> Result<Vec<StatisticRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open statistics csv {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("read csv header {}", path.display()))?
        .clone();

    let name_idx = position_of(&headers, "Player Name");
    let team_idx = position_of(&headers, "Team");
    let (Some(name_idx), Some(team_idx)) = (name_idx, team_idx) else {
        bail!(
            "{}: statistics csv must carry 'Player Name' and 'Team' columns",
            path.display()
        );
    };

    let mut metric_columns: Vec<(usize, &'static str)> = Vec::new();
    for (idx, column) in headers.iter().enumerate() {
        if idx == name_idx || idx == team_idx {
            continue;
        }
        match display_name_to_id(StatScope::Player, column.trim()) {
            Some(id) => metric_columns.push((idx, id)),
            None => warn!("{}: skipping unknown statistic column {column:?}", path.display()),
        }
    }

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("read csv row {} of {}", line + 2, path.display()))?;
        let player_name = row.get(name_idx).unwrap_or("").trim().to_string();
        if player_name.is_empty() {
            continue;
        }
        let team = row.get(team_idx).unwrap_or("").trim().to_string();

        let mut metrics = HashMap::new();
        for &(idx, id) in &metric_columns {
            let cell = row.get(idx).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(value) => {
                    metrics.insert(id.to_string(), value);
                }
                Err(_) => warn!(
                    "{}: row {}: unparsable {id} value {cell:?}",
                    path.display(),
                    line + 2
                ),
            }
        }

        records.push(StatisticRecord {
            player_name,
            team,
            metrics,
        });
    }

    Ok(records)
}

fn position_of(headers: &csv::StringRecord, wanted: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_and_maps_columns_to_ids() {
        let file = write_csv(
            "Player Name,Team,Goal,Assist,Mystery\n\
             Dedik Setiawan,Arema FC,5,2,9\n\
             ,Arema FC,1,1,1\n\
             Beckham Putra,Persib,3,,x\n",
        );
        let records = load_statistic_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].player_name, "Dedik Setiawan");
        assert_eq!(records[0].team, "Arema FC");
        assert_eq!(records[0].metrics.get("GOAL"), Some(&5.0));
        assert_eq!(records[0].metrics.get("ASSIST"), Some(&2.0));
        // Unknown column never becomes a metric.
        assert!(records[0].metrics.keys().all(|k| k != "Mystery"));

        // Blank cell means no metric, not zero.
        assert_eq!(records[1].player_name, "Beckham Putra");
        assert_eq!(records[1].metrics.get("ASSIST"), None);
    }

    #[test]
    fn missing_identity_columns_fail() {
        let file = write_csv("Name,Goal\nA,1\n");
        assert!(load_statistic_records(file.path()).is_err());
    }
}
