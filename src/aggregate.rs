use std::collections::HashMap;

use crate::catalog::StatDescriptor;
use crate::extract::ExtractedRow;
use crate::reconcile::normalize_name;

/// In-memory wide table: one row per entity, one column per statistic,
/// filled in as extraction runs complete. Entity keys are normalized the
/// same way the reconciler normalizes names, so spelling variants across
/// statistic pages collapse to one row. Insertion order is preserved for
/// deterministic export; rows are never deleted within a run.
#[derive(Debug, Default, Clone)]
pub struct AggregationTable {
    order: Vec<String>,
    display: HashMap<String, String>,
    teams: HashMap<String, String>,
    cells: HashMap<String, HashMap<&'static str, f64>>,
}

/// One exported row: values follow the catalog order handed to `export`.
/// `None` is a cell that was absent from every run, as opposed to a 0.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub entity: String,
    pub team: Option<String>,
    pub values: Vec<Option<f64>>,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_run(&mut self, desc: &StatDescriptor, rows: &[ExtractedRow]) {
        self.add_run_for_team(desc, None, rows);
    }

    /// Player-level runs are fetched per club; the team is attribution for
    /// the entity's export row, first sighting wins.
    pub fn add_run_for_team(
        &mut self,
        desc: &StatDescriptor,
        team: Option<&str>,
        rows: &[ExtractedRow],
    ) {
        // Replaying a statistic replaces its column wholesale; it must not
        // leave stale cells from an earlier run of the same statistic.
        // Team-scoped runs are partial by construction (one club at a time
        // accumulating into the same column), so only whole-column runs wipe.
        if team.is_none() {
            for row_cells in self.cells.values_mut() {
                row_cells.remove(desc.id);
            }
        }

        for row in rows {
            let key = normalize_name(&row.entity);
            if key.is_empty() {
                continue;
            }
            if !self.cells.contains_key(&key) {
                self.order.push(key.clone());
                self.display.insert(key.clone(), row.entity.clone());
                self.cells.insert(key.clone(), HashMap::new());
            }
            if let Some(team) = team {
                self.teams.entry(key.clone()).or_insert_with(|| team.to_string());
            }
            if let Some(row_cells) = self.cells.get_mut(&key) {
                row_cells.insert(desc.id, row.value);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Export all accumulated columns as one wide table, entities in
    /// insertion order, columns in catalog order.
    pub fn export(&self, catalog: &[StatDescriptor]) -> Vec<WideRow> {
        self.order
            .iter()
            .map(|key| {
                let row_cells = &self.cells[key];
                WideRow {
                    entity: self.display[key].clone(),
                    team: self.teams.get(key).cloned(),
                    values: catalog.iter().map(|d| row_cells.get(d.id).copied()).collect(),
                }
            })
            .collect()
    }

    /// (entity, statistic id) cells that are missing, as opposed to holding
    /// a genuine zero. Reported separately so exports rendering 0 do not
    /// hide extraction gaps.
    pub fn absent(&self, catalog: &[StatDescriptor]) -> Vec<(String, &'static str)> {
        let mut out = Vec::new();
        for key in &self.order {
            let row_cells = &self.cells[key];
            for desc in catalog {
                if !row_cells.contains_key(desc.id) {
                    out.push((self.display[key].clone(), desc.id));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StatDescriptor, ValueKind};

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
    fn replay_overwrites_instead_of_accumulating() {
        let mut table = AggregationTable::new();
        table.add_run(&GOALS, &[row("Arema FC", 5.0), row("Persib", 3.0)]);
        table.add_run(&GOALS, &[row("Arema FC", 6.0)]);

        let rows = table.export(&[GOALS]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values[0], Some(6.0));
        // Persib's row survives, but its replayed-away column is absent.
        assert_eq!(rows[1].values[0], None);
    }

    #[test]
    fn spelling_variants_collapse_to_one_row() {
        let mut table = AggregationTable::new();
        table.add_run(&GOALS, &[row("AREMA  FC", 5.0)]);
        table.add_run(&ASSISTS, &[row("Arema FC", 2.0)]);

        let rows = table.export(&[GOALS, ASSISTS]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity, "AREMA  FC");
        assert_eq!(rows[0].values, vec![Some(5.0), Some(2.0)]);
    }

    #[test]
    fn absent_is_distinct_from_zero() {
        let mut table = AggregationTable::new();
        table.add_run(&GOALS, &[row("Arema FC", 0.0)]);
        table.add_run(&ASSISTS, &[row("Persib", 1.0)]);

        let absent = table.absent(&[GOALS, ASSISTS]);
        assert_eq!(
            absent,
            vec![
                ("Arema FC".to_string(), "ASSIST"),
                ("Persib".to_string(), "GOAL"),
            ]
        );

        let rows = table.export(&[GOALS, ASSISTS]);
        assert_eq!(rows[0].values, vec![Some(0.0), None]);
    }

    #[test]
    fn first_seen_team_is_kept() {
        let mut table = AggregationTable::new();
        table.add_run_for_team(&GOALS, Some("Arema FC"), &[row("Dedik Setiawan", 4.0)]);
        table.add_run_for_team(&ASSISTS, Some("Persib"), &[row("Dedik Setiawan", 1.0)]);

        let rows = table.export(&[GOALS, ASSISTS]);
        assert_eq!(rows[0].team.as_deref(), Some("Arema FC"));
    }
}
