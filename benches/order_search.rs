//! Benchmark for the exhaustive order search.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridcast::core::TimeSeries;
use gridcast::selection::{OrderGrid, OrderSearch};

fn seasonal_series(n: usize) -> TimeSeries {
    let origin = Utc.with_ymd_and_hms(1950, 1, 1, 0, 0, 0).unwrap();
    let values: Vec<f64> = (0..n)
        .map(|i| {
            10.0 + 0.02 * i as f64
                + 3.0 * (2.0 * std::f64::consts::PI * i as f64 / 4.0).sin()
                + 0.2 * (i as f64 * 0.7).cos()
        })
        .collect();
    TimeSeries::regular(origin, Duration::days(91), values).unwrap()
}

fn bench_order_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_search");
    group.sample_size(10);

    for &limit in &[2usize, 3] {
        let series = seasonal_series(100);
        let search = OrderSearch::new(1, 1, 4);

        group.bench_with_input(
            BenchmarkId::new("rank", limit * limit * limit * limit),
            &limit,
            |b, &limit| {
                b.iter(|| {
                    let ranking =
                        search.rank(black_box(&series), OrderGrid::uniform(limit));
                    black_box(ranking)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_order_search);
criterion_main!(benches);
