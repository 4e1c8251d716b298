use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use dendrite::{AggregationEngine, SimulationConfig, WalkScheduling};
use std::time::Duration;

fn bench_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");
    let samples: usize = std::env::var("DENDRITE_BENCH_SAMPLES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(20);
    group.sample_size(samples);
    group.measurement_time(Duration::from_secs(10));
    // Walkers per ring; six rings per run.
    let rings: Vec<usize> = std::env::var("DENDRITE_BENCH_WALKERS")
        .ok()
        .map(|s| {
            s.split(',')
                .filter_map(|t| t.trim().parse::<usize>().ok())
                .collect::<Vec<_>>()
        })
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| vec![1000_usize, 5000]);
    for &per_ring in &rings {
        for scheduling in [WalkScheduling::Sequential, WalkScheduling::Parallel] {
            group.bench_function(format!("walkers{}_{:?}", per_ring * 6, scheduling), |b| {
                b.iter_batched(
                    || {
                        let config = SimulationConfig {
                            walkers_per_ring: per_ring,
                            walk_scheduling: scheduling,
                            rng_seed: Some(0xD1A),
                            ..SimulationConfig::default()
                        };
                        AggregationEngine::new(config).expect("bench config is valid")
                    },
                    |mut engine| {
                        engine.tick();
                        engine
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_ticks);
criterion_main!(benches);
