use log::debug;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::catalog::{StatDescriptor, ValueKind};

const CONTAINER_SELECTOR: &str = "div.info-ranking.top-player.background-color-2";
const STYLED_TABLE_SELECTOR: &str = "table.background-color-2";

// First-cell labels that mark a header or summary row rather than an entity.
const NON_ENTITY_LABELS: &[&str] = &[
    "no", "no.", "rank", "peringkat", "club", "klub", "name", "nama", "player", "pemain", "team",
    "tim", "value", "nilai", "statistik", "posisi", "position",
];
const NON_ENTITY_WORDS: &[&str] = &["total", "average", "jumlah", "rata-rata"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Structural,
    StyledTable,
    Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// One (entity, value) pair read from a statistic table, with the entity
/// spelling as found in the markup.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRow {
    pub entity: String,
    pub raw_value: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub rows: Vec<ExtractedRow>,
    pub strategy: Strategy,
    pub confidence: Confidence,
    /// Rows discarded because their value cell failed coercion.
    pub dropped: usize,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no usable table for statistic {statistic}: {reason}")]
pub struct ExtractionFailure {
    pub statistic: String,
    pub reason: &'static str,
}

/// Run the strategy chain over a statistic page. Strategies are fallbacks in
/// strict priority order; the first one that yields any coerced row wins.
pub fn extract(html: &str, desc: &StatDescriptor) -> Result<Extraction, ExtractionFailure> {
    let doc = Html::parse_document(html);

    static STRATEGIES: [&dyn TableStrategy; 3] = [&Structural, &StyledTables, &AnyTable];
    for strategy in STRATEGIES {
        let Some(found) = strategy.attempt(&doc, desc) else {
            continue;
        };
        if found.rows.is_empty() {
            // A located table whose every row failed coercion counts as no
            // table at all.
            continue;
        }
        debug!(
            "{}: {:?} strategy extracted {} rows ({} dropped)",
            desc.id,
            strategy.kind(),
            found.rows.len(),
            found.dropped
        );
        return Ok(Extraction {
            rows: found.rows,
            strategy: strategy.kind(),
            confidence: strategy.confidence(),
            dropped: found.dropped,
        });
    }

    Err(ExtractionFailure {
        statistic: desc.id.to_string(),
        reason: "no_table_found",
    })
}

struct StrategyYield {
    rows: Vec<ExtractedRow>,
    dropped: usize,
}

trait TableStrategy: Sync {
    fn kind(&self) -> Strategy;
    fn confidence(&self) -> Confidence;
    fn attempt(&self, doc: &Html, desc: &StatDescriptor) -> Option<StrategyYield>;
}

/// The site's "current season ranking" widget: a known container class
/// holding a nested ranking table. Anchored, so any row count is accepted.
struct Structural;

impl TableStrategy for Structural {
    fn kind(&self) -> Strategy {
        Strategy::Structural
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }

    fn attempt(&self, doc: &Html, desc: &StatDescriptor) -> Option<StrategyYield> {
        let container_sel = Selector::parse(CONTAINER_SELECTOR).unwrap();
        let table_sel = Selector::parse(STYLED_TABLE_SELECTOR).unwrap();

        let container = doc.select(&container_sel).next()?;
        let table = container.select(&table_sel).next()?;
        Some(read_rows(table, desc.value_kind))
    }
}

/// Any table styled with the ranking class, anywhere in the document. The
/// anchor is gone, so demand a plausible row count before trusting it.
struct StyledTables;

impl TableStrategy for StyledTables {
    fn kind(&self) -> Strategy {
        Strategy::StyledTable
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }

    fn attempt(&self, doc: &Html, desc: &StatDescriptor) -> Option<StrategyYield> {
        let table_sel = Selector::parse(STYLED_TABLE_SELECTOR).unwrap();
        doc.select(&table_sel)
            .map(|table| read_rows(table, desc.value_kind))
            .find(|found| found.rows.len() >= desc.min_rows)
    }
}

/// Last resort: score every table by how much it looks like a statistic
/// ranking and take the best one.
struct AnyTable;

impl TableStrategy for AnyTable {
    fn kind(&self) -> Strategy {
        Strategy::Heuristic
    }

    fn confidence(&self) -> Confidence {
        Confidence::Low
    }

    fn attempt(&self, doc: &Html, desc: &StatDescriptor) -> Option<StrategyYield> {
        let table_sel = Selector::parse("table").unwrap();
        let tr_sel = Selector::parse("tr").unwrap();
        let cell_sel = Selector::parse("td, th").unwrap();

        let mut best: Option<StrategyYield> = None;
        for table in doc.select(&table_sel) {
            let two_columns = table
                .select(&tr_sel)
                .any(|tr| tr.select(&cell_sel).count() >= 2);
            if !two_columns {
                continue;
            }
            let found = read_rows(table, desc.value_kind);
            if found.rows.len() < desc.min_rows {
                continue;
            }
            // Strictly-greater keeps the first table on ties (document order).
            if best.as_ref().is_none_or(|b| found.rows.len() > b.rows.len()) {
                best = Some(found);
            }
        }
        best
    }
}

/// Shared row reader: every strategy cleans rows the same way. Rows without
/// any entity-looking cell are headers and vanish silently; rows whose value
/// cell fails coercion are counted in `dropped`.
fn read_rows(table: ElementRef<'_>, kind: ValueKind) -> StrategyYield {
    let tr_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td, th").unwrap();

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for tr in table.select(&tr_sel) {
        let mut cells = Vec::new();
        let mut all_header_cells = true;
        for cell in tr.select(&cell_sel) {
            if cell.value().name() != "th" {
                all_header_cells = false;
            }
            cells.push(cell_text(cell));
        }
        if cells.len() < 2 || all_header_cells {
            continue;
        }

        let Some(entity_idx) = cells.iter().position(|c| looks_like_entity(c)) else {
            continue;
        };

        // Value: last cell after the entity cell that coerces under the
        // descriptor's kind. Ranking tables put the number after the name,
        // and a leading rank column must never be read as the value.
        let value_cell = cells
            .iter()
            .enumerate()
            .rev()
            .filter(|(i, _)| *i > entity_idx)
            .find_map(|(_, c)| parse_value(c, kind).map(|v| (c.clone(), v)));

        match value_cell {
            Some((raw_value, value)) => rows.push(ExtractedRow {
                entity: cells[entity_idx].clone(),
                raw_value,
                value,
            }),
            None => dropped += 1,
        }
    }

    StrategyYield { rows, dropped }
}

fn cell_text(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    collapse_ws(&raw)
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A proper name rather than a rank number, header label, or summary row.
fn looks_like_entity(text: &str) -> bool {
    if text.len() < 3 || !text.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    if text.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let lower = text.to_lowercase();
    if NON_ENTITY_LABELS.contains(&lower.as_str()) {
        return false;
    }
    !NON_ENTITY_WORDS.iter().any(|w| lower.contains(w))
}

/// Coerce a value cell per the statistic's kind. `None` means the row is
/// dropped, not that the call fails.
fn parse_value(raw: &str, kind: ValueKind) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    match kind {
        ValueKind::Percentage => {
            let stripped = text.strip_suffix('%').unwrap_or(text).trim();
            let value: f64 = stripped.parse().ok()?;
            (0.0..=100.0).contains(&value).then_some(value)
        }
        ValueKind::Integer => {
            if text.contains('%') {
                return None;
            }
            parse_integer(text).map(|v| v as f64)
        }
        ValueKind::Decimal => {
            if text.contains('%') {
                return None;
            }
            text.parse().ok()
        }
    }
}

/// Integer with thousands-separator tolerance: commas always separate groups;
/// dots only when every dot-group has exactly three digits ("1.234" is 1234,
/// "87.5" is not an integer).
fn parse_integer(text: &str) -> Option<i64> {
    let cleaned = text.replace([',', ' '], "");
    if cleaned.is_empty() {
        return None;
    }
    if let Some((head, tail)) = cleaned.split_once('.') {
        if head.is_empty() || head.len() > 3 || !head.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let mut digits = head.to_string();
        for group in tail.split('.') {
            if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            digits.push_str(group);
        }
        return digits.parse().ok();
    }
    cleaned.parse().ok()
}
