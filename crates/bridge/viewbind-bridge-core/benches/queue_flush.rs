//! Readiness queue and deferred-mutation throughput.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use viewbind_api_core::PropertyValue;
use viewbind_bridge::runtime::InstanceRef;
use viewbind_bridge::{BindingOptions, NumberBinding, ReadinessQueue};
use viewbind_test_fixtures::{Journal, MockInstance};

fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_flush");
    for &ops in &[16usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("closures", ops), &ops, |b, &ops| {
            b.iter_batched(
                || {
                    let queue = ReadinessQueue::with_capacity(ops);
                    for i in 0..ops {
                        queue.enqueue(move || {
                            black_box(i);
                            Ok(())
                        });
                    }
                    queue
                },
                |queue| black_box(queue.flush()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_deferred_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("deferred_mutations");
    for &writes in &[16usize, 256] {
        group.bench_with_input(BenchmarkId::new("number", writes), &writes, |b, &writes| {
            b.iter_batched(
                || {
                    let mock = MockInstance::empty("bench", Journal::default());
                    mock.insert("value", PropertyValue::Number(0.0));
                    let instance: InstanceRef = mock;
                    let queue = ReadinessQueue::new();
                    let binding =
                        NumberBinding::new(BindingOptions::new().with_scheduler(queue.clone()));
                    binding.set_path(Some("value"));
                    for i in 0..writes {
                        binding.set_value(i as f32);
                    }
                    binding.set_instance(Some(&instance));
                    (instance, binding, queue)
                },
                |(_instance, binding, queue)| {
                    queue.flush();
                    black_box(binding.value())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flush, bench_deferred_mutations);
criterion_main!(benches);
