//! NIS and aggregation benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::{Matrix2, Vector2};

use trackdiag_rs::ingest::ingest_reader;
use trackdiag_rs::views::ResidualView;
use trackdiag_rs::{evaluate, InnovationRecord, NisEvaluator, PerTrackSeries};

/// Deterministic records spread over `tracks` tracks, one in ten singular.
fn create_test_records(n: usize, tracks: i64) -> Vec<InnovationRecord> {
    (0..n)
        .map(|i| {
            let track_id = i as i64 % tracks;
            let step = (n - i) as i64 / tracks;
            let x = (i % 7) as f64 - 3.0;
            let y = (i % 5) as f64 - 2.0;
            let s = if i % 10 == 0 {
                [[1.0, 2.0], [1.0, 2.0]]
            } else {
                [[2.0 + x.abs(), 0.3], [0.3, 1.0 + y.abs()]]
            };
            InnovationRecord::new(step, track_id, [x, y], s)
        })
        .collect()
}

fn create_test_csv(n: usize) -> String {
    let mut text = String::from("step,track_id,innov_x,innov_y,S00,S01,S10,S11\n");
    for record in create_test_records(n, 20) {
        let v = record.innovation;
        let s = record.innovation_covariance;
        text.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            record.step,
            record.track_id,
            v[0],
            v[1],
            s[(0, 0)],
            s[(0, 1)],
            s[(1, 0)],
            s[(1, 1)]
        ));
    }
    text
}

fn benchmark_evaluate(c: &mut Criterion) {
    let v = Vector2::new(0.7, -1.3);
    let s = Matrix2::new(2.0, 0.4, 0.4, 1.5);

    c.bench_function("nis_evaluate", |b| {
        b.iter(|| evaluate(black_box(&v), black_box(&s)))
    });
}

fn benchmark_evaluate_general_inverse(c: &mut Criterion) {
    let v = Vector2::new(0.7, -1.3);
    let s = Matrix2::new(2.0, 0.4, 0.4, 1.5);

    c.bench_function("nis_general_inverse", |b| {
        b.iter(|| {
            black_box(&s)
                .try_inverse()
                .map(|inv| black_box(&v).dot(&(inv * v)))
        })
    });
}

fn benchmark_residual_view_10k(c: &mut Criterion) {
    let records = create_test_records(10_000, 50);
    let evaluator = NisEvaluator::default();

    c.bench_function("residual_view_10k", |b| {
        b.iter(|| ResidualView::build(black_box(records.clone()), &evaluator))
    });
}

fn benchmark_aggregate_10k(c: &mut Criterion) {
    let samples: Vec<(i64, i64, f64)> = create_test_records(10_000, 50)
        .into_iter()
        .map(|r| (r.track_id, r.step, r.innovation.norm()))
        .collect();

    c.bench_function("aggregate_10k", |b| {
        b.iter(|| PerTrackSeries::from_samples(black_box(samples.clone())))
    });
}

fn benchmark_ingest_csv_10k(c: &mut Criterion) {
    let text = create_test_csv(10_000);

    c.bench_function("ingest_csv_10k", |b| {
        b.iter(|| {
            let records: Vec<InnovationRecord> =
                ingest_reader(black_box(text.as_bytes())).expect("valid csv");
            records
        })
    });
}

criterion_group!(
    benches,
    benchmark_evaluate,
    benchmark_evaluate_general_inverse,
    benchmark_residual_view_10k,
    benchmark_aggregate_10k,
    benchmark_ingest_csv_10k,
);
criterion_main!(benches);
