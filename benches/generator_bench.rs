use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sql_seeder::generator::{GeneratorConfig, InsertBatcher, ScriptGenerator};
use std::hint::black_box;

fn config_for(employees: usize) -> GeneratorConfig {
    GeneratorConfig {
        employees,
        projects: employees / 2,
        attendance_from: "2024-01-01".to_string(),
        attendance_to: "2024-01-07".to_string(),
        ..Default::default()
    }
}

fn bench_full_script(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_script");
    group.sample_size(10);

    for employees in [100, 500, 2000] {
        group.bench_with_input(
            BenchmarkId::new("employees", employees),
            &employees,
            |b, &employees| {
                b.iter(|| {
                    let mut out = Vec::new();
                    let stats = ScriptGenerator::new(config_for(employees))
                        .unwrap()
                        .generate(&mut out)
                        .unwrap();
                    black_box((out.len(), stats.total_rows()))
                })
            },
        );
    }

    group.finish();
}

fn bench_batcher(c: &mut Criterion) {
    let tuple = "(1, 'Employee Name', 42, 'Developer')".to_string();
    let rows = 100_000usize;

    let mut group = c.benchmark_group("insert_batcher");
    group.throughput(Throughput::Elements(rows as u64));

    for batch_size in [100, 1000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("push", batch_size),
            &batch_size,
            |b, &batch_size| {
                b.iter(|| {
                    let mut out = Vec::new();
                    let mut batcher =
                        InsertBatcher::new("employees", &["a", "b", "c", "d"], batch_size);
                    for _ in 0..rows {
                        batcher.push(&mut out, tuple.clone()).unwrap();
                    }
                    batcher.finish(&mut out).unwrap();
                    black_box(out.len())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_full_script, bench_batcher);

criterion_main!(benches);
