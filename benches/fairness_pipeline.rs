/// Fairness pipeline benchmarks
///
/// Measures CSV preparation, the full audit, and the significance tests on
/// synthetic datasets at and above the size of the COMPAS two-year export.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fairaudit::audit::run_audit;
use fairaudit::config::{AuditConfig, ColumnSpec};
use fairaudit::dataset::{Dataset, Record};
use fairaudit::fairness::statistics::mann_whitney_u;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::time::Duration;

const GROUPS: &[&str] = &[
    "African-American",
    "Caucasian",
    "Hispanic",
    "Other",
    "Asian",
    "Native American",
];

fn synthetic_records(n: usize) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|_| {
            let group = GROUPS[rng.gen_range(0..GROUPS.len())];
            let score = f64::from(rng.gen_range(1u32..=10));
            Record::new(group, rng.gen_bool(score / 12.0), score, 7.0)
        })
        .collect()
}

fn synthetic_csv(n: usize) -> String {
    let mut csv = String::from("id,race,decile_score,two_year_recid\n");
    for (i, r) in synthetic_records(n).iter().enumerate() {
        let _ = writeln!(csv, "{},{},{},{}", i, r.group, r.score, u8::from(r.outcome));
    }
    csv
}

fn bench_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_csv");
    group.measurement_time(Duration::from_secs(5));

    for size in [1_000usize, 7_214, 50_000].iter() {
        let csv = synthetic_csv(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &csv, |b, csv| {
            b.iter(|| {
                Dataset::from_csv_bytes(
                    black_box(csv.as_bytes()),
                    &ColumnSpec::default(),
                    7.0,
                    "bench",
                )
            });
        });
    }

    group.finish();
}

fn bench_run_audit(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_audit");
    group.measurement_time(Duration::from_secs(5));
    let config = AuditConfig::default();

    for size in [1_000usize, 7_214, 50_000].iter() {
        let dataset = Dataset::from_records(synthetic_records(*size));
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| run_audit(black_box(dataset), &config));
        });
    }

    group.finish();
}

fn bench_mann_whitney(c: &mut Criterion) {
    let mut group = c.benchmark_group("mann_whitney_u");
    let mut rng = StdRng::seed_from_u64(11);
    let x: Vec<f64> = (0..3_600).map(|_| f64::from(rng.gen_range(1u32..=10))).collect();
    let y: Vec<f64> = (0..2_500).map(|_| f64::from(rng.gen_range(1u32..=10))).collect();

    group.bench_function("compas_sized_groups", |b| {
        b.iter(|| mann_whitney_u(black_box(&x), black_box(&y)));
    });

    group.finish();
}

criterion_group!(benches, bench_prepare, bench_run_audit, bench_mann_whitney);
criterion_main!(benches);
