use std::path::Path;

use anyhow::{Context, Result};

use crate::aggregate::{AggregationTable, WideRow};
use crate::catalog::StatDescriptor;
use crate::reconcile::MergedRecord;

/// Entity columns of a wide export: club tables carry one identity column,
/// player tables carry name plus team attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WideHeader {
    Club,
    Player,
}

/// Write the accumulated wide table: identity columns, then one column per
/// statistic in catalog order. Cells that were absent render as 0, same as
/// genuine zeroes; the distinction lives in `AggregationTable::absent`.
pub fn write_wide_csv(
    path: &Path,
    table: &AggregationTable,
    catalog: &[StatDescriptor],
    header: WideHeader,
) -> Result<usize> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;

    let mut head: Vec<&str> = match header {
        WideHeader::Club => vec!["TEAM"],
        WideHeader::Player => vec!["Player Name", "Team"],
    };
    head.extend(catalog.iter().map(|d| d.display_name));
    writer.write_record(&head).context("write header")?;

    let rows = table.export(catalog);
    for row in &rows {
        writer
            .write_record(wide_record(row, header))
            .with_context(|| format!("write row for {}", row.entity))?;
    }
    writer.flush().context("flush csv")?;
    Ok(rows.len())
}

fn wide_record(row: &WideRow, header: WideHeader) -> Vec<String> {
    let mut record = vec![row.entity.clone()];
    if header == WideHeader::Player {
        record.push(row.team.clone().unwrap_or_default());
    }
    record.extend(row.values.iter().map(|v| fmt_value(v.unwrap_or(0.0))));
    record
}

/// Write the reconciled dataset: demographic columns, then every catalog
/// metric in catalog order, one row per demographic record.
pub fn write_merged_csv(
    path: &Path,
    merged: &[MergedRecord],
    catalog: &[StatDescriptor],
) -> Result<usize> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;

    let mut head = vec![
        "Name",
        "Player Name",
        "Team",
        "Country",
        "Age",
        "Position",
        "Picture Url",
        "Appearances",
    ];
    head.extend(catalog.iter().map(|d| d.display_name));
    writer.write_record(&head).context("write header")?;

    for record in merged {
        let d = &record.demographic;
        let mut row = vec![
            d.name.clone(),
            d.full_name.clone(),
            d.team.clone(),
            d.country.clone(),
            d.age.to_string(),
            d.position.label().to_string(),
            d.picture_url.clone(),
            d.appearances.to_string(),
        ];
        row.extend(record.metrics.iter().map(|v| fmt_value(*v)));
        writer
            .write_record(&row)
            .with_context(|| format!("write row for {}", d.name))?;
    }
    writer.flush().context("flush csv")?;
    Ok(merged.len())
}

/// Counts print as integers, everything else keeps its fraction.
fn fmt_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
