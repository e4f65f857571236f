//! # Settlement Engine Benchmarks
//!
//! | Scenario | What it measures |
//! |----------|------------------|
//! | linear_chain | new-block + sparse finality on a single chain |
//! | forked_chain | fork re-attribution and pruning with random side branches |
//! | duplicate_redelivery | cost of absorbing re-delivered events |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_18_tx_lifecycle::{
    InMemoryChain, LifecycleConfig, RecordingObserver, SettlementEngine, TxLifecycleApi,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use shared_types::IncomingEvent;
use std::sync::Arc;
use std::time::Duration;

type Engine = SettlementEngine<InMemoryChain, RecordingObserver>;

fn engine_for(chain: InMemoryChain) -> Engine {
    SettlementEngine::new(
        LifecycleConfig::default(),
        Arc::new(chain),
        Arc::new(RecordingObserver::new()),
    )
}

/// One transaction per block on a single chain, finality every `every` blocks.
fn linear_script(blocks: usize, every: usize) -> (InMemoryChain, Vec<IncomingEvent>) {
    let chain = InMemoryChain::new();
    let mut events = vec![IncomingEvent::new_block("b0", None)];
    for height in 1..=blocks {
        let tx = format!("tx-{height}");
        let hash = format!("b{height}");
        let parent = format!("b{}", height - 1);
        chain.insert_block(&hash, &[tx.as_str()]);
        events.push(IncomingEvent::new_transaction(tx.as_str()));
        events.push(IncomingEvent::new_block(hash.as_str(), Some(parent.as_str())));
        if height % every == 0 {
            events.push(IncomingEvent::finalized(hash.as_str()));
        }
    }
    (chain, events)
}

/// Canonical chain with a random side block at each height that steals
/// some of the canonical transactions first.
fn forked_script(blocks: usize, seed: u64) -> (InMemoryChain, Vec<IncomingEvent>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let chain = InMemoryChain::new();
    let mut events = vec![IncomingEvent::new_block("b0", None)];

    for height in 1..=blocks {
        let txs: Vec<String> = (0..4).map(|i| format!("tx-{height}-{i}")).collect();
        let tx_refs: Vec<&str> = txs.iter().map(String::as_str).collect();
        for tx in &tx_refs {
            events.push(IncomingEvent::new_transaction(*tx));
        }

        let parent = format!("b{}", height - 1);
        let side = format!("s{height}");
        let stolen: Vec<&str> = tx_refs
            .iter()
            .copied()
            .filter(|_| rng.gen_bool(0.5))
            .collect();
        chain.insert_block(&side, &stolen);
        events.push(IncomingEvent::new_block(side.as_str(), Some(parent.as_str())));

        let hash = format!("b{height}");
        chain.insert_block(&hash, &tx_refs);
        events.push(IncomingEvent::new_block(hash.as_str(), Some(parent.as_str())));

        if height % 8 == 0 {
            events.push(IncomingEvent::finalized(hash.as_str()));
        }
    }
    (chain, events)
}

fn run(engine: &mut Engine, events: &[IncomingEvent]) -> usize {
    let mut done = 0;
    for event in events {
        if let Ok(outcome) = engine.handle_event(event.clone()) {
            done += outcome.done;
        }
    }
    done
}

fn bench_linear_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-linear-chain");
    group.measurement_time(Duration::from_secs(5));

    for blocks in [64usize, 256, 1024] {
        group.throughput(Throughput::Elements(blocks as u64));
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &blocks, |b, &blocks| {
            b.iter_batched(
                || {
                    let (chain, events) = linear_script(blocks, 16);
                    (engine_for(chain), events)
                },
                |(mut engine, events)| black_box(run(&mut engine, &events)),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_forked_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-forked-chain");
    group.measurement_time(Duration::from_secs(5));

    for blocks in [64usize, 256] {
        group.throughput(Throughput::Elements(blocks as u64));
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &blocks, |b, &blocks| {
            b.iter_batched(
                || {
                    let (chain, events) = forked_script(blocks, 0x5eed);
                    (engine_for(chain), events)
                },
                |(mut engine, events)| black_box(run(&mut engine, &events)),
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_duplicate_redelivery(c: &mut Criterion) {
    let (chain, events) = linear_script(256, 16);
    let mut engine = engine_for(chain);
    run(&mut engine, &events);

    c.bench_function("qc-18-duplicate-redelivery", |b| {
        b.iter(|| black_box(run(&mut engine, &events)))
    });
}

criterion_group!(
    benches,
    bench_linear_chain,
    bench_forked_chain,
    bench_duplicate_redelivery
);
criterion_main!(benches);
