//! Single-producer/single-consumer throughput benchmark for the broadcast
//! ring buffer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ringcast::{ConsumerCallback, Disruptor, DisruptorConfig};

struct CountingConsumer {
    count: Arc<AtomicU64>,
}

impl ConsumerCallback<u64> for CountingConsumer {
    fn consume(&mut self, batch: &[u64]) -> anyhow::Result<()> {
        self.count.fetch_add(batch.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn close(&mut self) {}
}

fn bench_produce_consume(c: &mut Criterion) {
    let mut group = c.benchmark_group("produce_consume");

    for capacity in [64usize, 1024, 8192] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
            b.iter(|| {
                let disruptor: Disruptor<u64> = Disruptor::new(DisruptorConfig::new(capacity)).unwrap();
                let count = Arc::new(AtomicU64::new(0));
                disruptor
                    .register_consumer("bench", Box::new(CountingConsumer { count: count.clone() }))
                    .unwrap();

                let batch: Vec<u64> = (0..10_000).collect();
                disruptor.produce(&batch).unwrap();
                disruptor.close();

                criterion::black_box(count.load(Ordering::Relaxed));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_produce_consume);
criterion_main!(benches);
