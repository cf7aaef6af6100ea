use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use isl_stats::catalog::{self, StatScope};
use isl_stats::extract::extract;
use isl_stats::reconcile::{
    DemographicRecord, Position, StatisticRecord, normalize_name, reconcile,
};

static CLUB_RANKING_HTML: &str = include_str!("../tests/fixtures/club_ranking.html");
static PLAIN_TABLES_HTML: &str = include_str!("../tests/fixtures/plain_tables.html");

fn bench_structural_extract(c: &mut Criterion) {
    let desc = catalog::lookup(StatScope::Club, "AKURASIUMPAN").unwrap();
    c.bench_function("structural_extract", |b| {
        b.iter(|| {
            let out = extract(black_box(CLUB_RANKING_HTML), desc).unwrap();
            black_box(out.rows.len());
        })
    });
}

fn bench_heuristic_extract(c: &mut Criterion) {
    let desc = catalog::lookup(StatScope::Club, "TOTALTEMBAKAN").unwrap();
    c.bench_function("heuristic_extract", |b| {
        b.iter(|| {
            let out = extract(black_box(PLAIN_TABLES_HTML), desc).unwrap();
            black_box(out.rows.len());
        })
    });
}

fn bench_normalize_name(c: &mut Criterion) {
    c.bench_function("normalize_name", |b| {
        b.iter(|| black_box(normalize_name(black_box("  Julián  Andrés GUEVARA "))))
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let teams = ["Arema FC", "Persib Bandung", "Persija Jakarta", "PSM Makassar"];
    let demographics: Vec<DemographicRecord> = (0..120)
        .map(|idx| DemographicRecord {
            name: format!("Pemain {idx}"),
            full_name: format!("Pemain Nomor {idx}"),
            team: teams[idx % teams.len()].to_string(),
            country: "INDONESIA".to_string(),
            age: 20 + (idx as u32) % 15,
            position: Position::Midfielder,
            picture_url: String::new(),
            appearances: 10,
        })
        .collect();
    let statistics: Vec<StatisticRecord> = (0..120)
        .map(|idx| {
            let mut metrics = std::collections::HashMap::new();
            metrics.insert("GOAL".to_string(), (idx % 7) as f64);
            StatisticRecord {
                player_name: format!("Pemain Nomor {idx}"),
                team: teams[idx % teams.len()].to_string(),
                metrics,
            }
        })
        .collect();
    let catalog = catalog::all(StatScope::Player);

    c.bench_function("reconcile_120", |b| {
        b.iter(|| {
            let out = reconcile(black_box(&demographics), black_box(&statistics), catalog);
            black_box(out.merged.len());
        })
    });
}

criterion_group!(
    perf,
    bench_structural_extract,
    bench_heuristic_extract,
    bench_normalize_name,
    bench_reconcile
);
criterion_main!(perf);
