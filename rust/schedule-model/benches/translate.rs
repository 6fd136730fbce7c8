//! Benchmarks for the schedule translation hot path.
//!
//! The dashboard re-runs parse, build, and describe on every keystroke of
//! the builder, so these stay allocation-light.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use schedule_model::{ScheduleSpec, describe_expression};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for expression in ["0 * * * *", "0 9 * * 1-5", "30 14 28 * *", "not a cron"] {
        group.bench_with_input(
            BenchmarkId::from_parameter(expression),
            expression,
            |b, expression| {
                b.iter(|| ScheduleSpec::parse(black_box(expression)));
            },
        );
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let spec = ScheduleSpec::parse("15 8 * * 1,3,5");
    c.bench_function("build_weekly", |b| {
        b.iter(|| black_box(&spec).to_expression());
    });
}

fn bench_edit_round(c: &mut Criterion) {
    c.bench_function("parse_build_describe", |b| {
        b.iter(|| {
            let spec = ScheduleSpec::parse(black_box("0 9 * * 1-5"));
            let expression = spec.to_expression();
            describe_expression(&expression)
        });
    });
}

criterion_group!(benches, bench_parse, bench_build, bench_edit_round);
criterion_main!(benches);
