//! Benchmarks for grouping and aggregation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tinytable::{GroupByConfig, Statistic, Table, Value};

/// Table with an integer key, a string key and three numeric columns
fn make_table(rows: usize, groups: i64) -> Table {
    let rows_i64 = rows as i64;
    Table::from_columns(vec![
        ("k", (0..rows_i64).map(|i| Value::Int(i % groups)).collect::<Vec<_>>()),
        (
            "cat",
            (0..rows_i64).map(|i| Value::from(format!("cat_{}", i % 7))).collect(),
        ),
        ("a", (0..rows_i64).map(Value::Int).collect()),
        ("b", (0..rows_i64).map(|i| Value::Float(i as f64 * 0.5)).collect()),
        ("c", (0..rows_i64).map(|i| Value::Int((i * 31) % 1000)).collect()),
    ])
    .unwrap()
}

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");
    for rows in [1_000usize, 10_000, 100_000] {
        let table = make_table(rows, 100);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("single_key", rows), &table, |b, table| {
            b.iter(|| black_box(tinytable::group(table, &["k"]).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("two_keys", rows), &table, |b, table| {
            b.iter(|| black_box(tinytable::group(table, &["k", "cat"]).unwrap()))
        });
    }
    group.finish();
}

fn bench_aggregate_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_all");
    let table = make_table(100_000, 100);
    // "cat" is not numeric, so numeric statistics only run over a, b, c
    let numeric = table
        .with_change(&tinytable::Change::DropColumn("cat".into()))
        .unwrap();

    for statistic in [Statistic::Sum, Statistic::Mean, Statistic::Stdev, Statistic::Mode] {
        group.bench_function(BenchmarkId::new("serial", statistic), |b| {
            let config = GroupByConfig::new().with_parallel_threshold(usize::MAX);
            let view = numeric.group_by_with(["k"], config).unwrap();
            b.iter(|| black_box(view.aggregate_all(statistic).unwrap()))
        });
        group.bench_function(BenchmarkId::new("parallel", statistic), |b| {
            let config = GroupByConfig::new().with_parallel_threshold(0);
            let view = numeric.group_by_with(["k"], config).unwrap();
            b.iter(|| black_box(view.aggregate_all(statistic).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_partition, bench_aggregate_all);
criterion_main!(benches);
