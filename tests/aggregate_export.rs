use std::fs;

use isl_stats::aggregate::AggregationTable;
use isl_stats::catalog::{StatDescriptor, ValueKind};
use isl_stats::export::{WideHeader, write_wide_csv};
use isl_stats::extract::ExtractedRow;

const GOALS: StatDescriptor = StatDescriptor {
    id: "GOAL",
    display_name: "Goal",
    value_kind: ValueKind::Integer,
    min_rows: 3,
};
const ASSISTS: StatDescriptor = StatDescriptor {
    id: "ASSIST",
    display_name: "Assist",
    value_kind: ValueKind::Integer,
    min_rows: 3,
};

fn row(entity: &str, value: f64) -> ExtractedRow {
    ExtractedRow {
        entity: entity.to_string(),
        raw_value: value.to_string(),
        value,
    }
}

#[test]
fn replaying_a_run_exports_identical_csv() {
    let dir = tempfile::tempdir().unwrap();
    let rows = [row("AREMA FC", 5.0), row("PERSIB BANDUNG", 3.0)];

    let mut table = AggregationTable::new();
    table.add_run(&GOALS, &rows);
    let first_path = dir.path().join("first.csv");
    write_wide_csv(&first_path, &table, &[GOALS], WideHeader::Club).unwrap();

    table.add_run(&GOALS, &rows);
    let second_path = dir.path().join("second.csv");
    write_wide_csv(&second_path, &table, &[GOALS], WideHeader::Club).unwrap();

    let first = fs::read_to_string(&first_path).unwrap();
    let second = fs::read_to_string(&second_path).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 3);
}

#[test]
fn club_export_renders_missing_cells_as_zero() {
    let mut table = AggregationTable::new();
    table.add_run(&GOALS, &[row("AREMA FC", 5.0), row("PERSIB BANDUNG", 3.0)]);
    table.add_run(&ASSISTS, &[row("AREMA FC", 2.0)]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clubs.csv");
    let written = write_wide_csv(&path, &table, &[GOALS, ASSISTS], WideHeader::Club).unwrap();
    assert_eq!(written, 2);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "TEAM,Goal,Assist");
    assert_eq!(lines[1], "AREMA FC,5,2");
    assert_eq!(lines[2], "PERSIB BANDUNG,3,0");

    // The zero in the export is a rendering default; the gap itself stays
    // visible through the absent-cell report.
    assert_eq!(
        table.absent(&[GOALS, ASSISTS]),
        vec![("PERSIB BANDUNG".to_string(), "ASSIST")]
    );
}

#[test]
fn player_export_carries_team_attribution() {
    let mut table = AggregationTable::new();
    table.add_run_for_team(&GOALS, Some("Arema FC"), &[row("Dedik Setiawan", 5.0)]);
    table.add_run_for_team(&GOALS, Some("Persib Bandung"), &[row("Beckham Putra", 4.0)]);
    table.add_run_for_team(&ASSISTS, Some("Arema FC"), &[row("Dedik Setiawan", 1.0)]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("players.csv");
    write_wide_csv(&path, &table, &[GOALS, ASSISTS], WideHeader::Player).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Player Name,Team,Goal,Assist");
    assert_eq!(lines[1], "Dedik Setiawan,Arema FC,5,1");
    assert_eq!(lines[2], "Beckham Putra,Persib Bandung,4,0");
}

#[test]
fn entities_keep_insertion_order_across_runs() {
    let mut table = AggregationTable::new();
    table.add_run(&GOALS, &[row("ZEBRA FC", 1.0), row("ALPHA FC", 2.0)]);
    table.add_run(&ASSISTS, &[row("MIDDLE FC", 3.0), row("ALPHA FC", 4.0)]);

    let rows = table.export(&[GOALS, ASSISTS]);
    let order: Vec<&str> = rows.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(order, vec!["ZEBRA FC", "ALPHA FC", "MIDDLE FC"]);
}
