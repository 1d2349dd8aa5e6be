use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use flock_core::{Scenario, ScenarioConfig};
use std::hint::black_box;
use std::time::Duration;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

fn bench_scenario_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario_evolve");
    group.sample_size(env_or("FLOCK_BENCH_SAMPLES", 20usize).max(10));
    group.warm_up_time(Duration::from_secs(env_or("FLOCK_BENCH_WARMUP_SECS", 2)));
    group.measurement_time(Duration::from_secs(env_or("FLOCK_BENCH_MEASURE_SECS", 5)));

    let ticks: usize = env_or("FLOCK_BENCH_TICKS", 16usize).max(1);
    let populations: Vec<usize> = std::env::var("FLOCK_BENCH_POPULATIONS")
        .ok()
        .map(|s| {
            s.split(',')
                .filter_map(|t| t.trim().parse::<usize>().ok())
                .collect::<Vec<_>>()
        })
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| vec![100, 400, 1000]);

    for &population in &populations {
        group.bench_function(format!("ticks{ticks}_population{population}"), |b| {
            b.iter_batched(
                || {
                    let config = ScenarioConfig {
                        population,
                        seed: 0xB01D,
                        ..ScenarioConfig::default()
                    };
                    Scenario::new(config).expect("scenario")
                },
                |mut scenario| {
                    for _ in 0..ticks {
                        scenario.evolve().expect("tick");
                    }
                    black_box(scenario.time())
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scenario_ticks);
criterion_main!(benches);
