use bowl::Container;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn bench_shared_hit(c: &mut Criterion) {
    let container = Container::new();
    container.share("value", &[], |_| Ok(42u64)).unwrap();

    // Prime the cache
    let _ = container.get::<u64>("value").unwrap();

    c.bench_function("shared_hit_u64", |b| {
        b.iter(|| {
            let v = container.get::<u64>(black_box("value")).unwrap();
            black_box(v);
        })
    });
}

fn bench_shared_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("shared_cold_expensive", |b| {
        b.iter_batched(
            || {
                let container = Container::new();
                container
                    .share("expensive", &[], |_| {
                        Ok(ExpensiveToCreate {
                            data: (0..1000).collect(),
                        })
                    })
                    .unwrap();
                container
            },
            |container| {
                let v = container.get::<ExpensiveToCreate>("expensive").unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_factory_with_extensions(c: &mut Criterion) {
    let mut group = c.benchmark_group("factory_extensions");

    for count in [0usize, 1, 4, 16] {
        let container = Container::new();
        container.factory("n", &[], |_| Ok(0u64)).unwrap();
        for _ in 0..count {
            container
                .extend::<u64, _>("n", |n, _| Arc::new(*n + 1))
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(count), &container, |b, container| {
            b.iter(|| black_box(container.get::<u64>("n").unwrap()))
        });
    }

    group.finish();
}

fn bench_tagged_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("tagged_iteration");

    for size in [1usize, 10, 100] {
        let container = Container::new();
        for i in 0..size {
            container
                .share(&format!("service{i}"), &["group"], move |_| Ok(i))
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &container, |b, container| {
            b.iter(|| {
                let view = container.tagged("group").unwrap();
                for instance in view.iter() {
                    black_box(instance.unwrap());
                }
            })
        });
    }

    group.finish();
}

fn bench_dependency_chain(c: &mut Criterion) {
    let container = Container::new();
    container.factory("a", &[], |_| Ok(1u64)).unwrap();
    container.factory("b", &[], |c| Ok(*c.get::<u64>("a")? + 1)).unwrap();
    container.factory("c", &[], |c| Ok(*c.get::<u64>("b")? + 1)).unwrap();

    c.bench_function("factory_chain_depth_3", |b| {
        b.iter(|| black_box(container.get::<u64>("c").unwrap()))
    });
}

criterion_group!(
    benches,
    bench_shared_hit,
    bench_shared_cold,
    bench_factory_with_extensions,
    bench_tagged_iteration,
    bench_dependency_chain
);
criterion_main!(benches);
