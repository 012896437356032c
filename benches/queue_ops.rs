//! Benchmark for QueueEngine hot-path operations

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use queue_desk::broadcast::EventBroadcaster;
use queue_desk::engine::{QueueConfig, QueueEngine};

fn engine() -> QueueEngine {
    QueueEngine::new(QueueConfig::default(), EventBroadcaster::new(1024))
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_join");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("join_1000_tickets", |b| {
        b.iter(|| {
            let engine = engine();
            for i in 0..1000 {
                let label = format!("Client {}", i);
                let _ = engine.join(
                    black_box("docs"),
                    black_box("Document Request"),
                    Some(&label),
                );
            }
        });
    });

    group.finish();
}

fn bench_service_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_service_cycle");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("call_complete_1000", |b| {
        b.iter_batched(
            || {
                let engine = engine();
                for _ in 0..1000 {
                    engine
                        .join("docs", "Document Request", None)
                        .unwrap();
                }
                engine
            },
            |engine| {
                while let Ok(ticket) = engine.call_next() {
                    engine.complete(black_box(ticket.number)).unwrap();
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_status_poll(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_status_poll");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("status_of_deep_queue", |b| {
        let engine = engine();
        for _ in 0..1000 {
            engine.join("docs", "Document Request", None).unwrap();
        }

        b.iter(|| {
            // Poll the tail ticket, the worst case for position lookup.
            black_box(engine.status_of(black_box(1000)).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_join, bench_service_cycle, bench_status_poll);
criterion_main!(benches);
