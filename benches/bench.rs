use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hashing::hash::HashFunctions;
use hashing::table::{ChainingTable, CollisionTable, OpenAddressingTable};
use hashing::{Distribution, KeyGenerator, Observation, ProbeStrategy, RunConfig, Simulation};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CAPACITY: usize = 10007;

fn keys(distribution: Distribution, count: usize) -> Vec<i64> {
    let generator = KeyGenerator::for_run(distribution, CAPACITY);
    let mut rng = StdRng::seed_from_u64(7);
    (0..count as u64)
        .map(|i| generator.next_key(i, &mut rng))
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let hashes = HashFunctions::with_capacity(CAPACITY).unwrap();
    let mut group = c.benchmark_group("insert uniform keys");
    for load in [0.5, 0.75, 0.9] {
        let keys = keys(Distribution::Uniform, (CAPACITY as f64 * load) as usize);

        group.bench_with_input(BenchmarkId::new("Chaining", load), &keys, |b, keys| {
            b.iter(|| {
                let mut table = ChainingTable::new(hashes).unwrap();
                for &key in keys {
                    table.insert(key).unwrap();
                }
            })
        });

        for strategy in ProbeStrategy::ALL {
            group.bench_with_input(BenchmarkId::new(strategy.label(), load), &keys, |b, keys| {
                b.iter(|| {
                    let mut table = OpenAddressingTable::new(hashes, strategy).unwrap();
                    for &key in keys {
                        let _ = table.insert(key);
                    }
                })
            });
        }
    }
    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    c.bench_function("full skewed run 15000 keys", |b| {
        b.iter(|| {
            let config = RunConfig::new(Distribution::Skewed, "Large", CAPACITY, 15000);
            let mut records: Vec<Observation> = Vec::new();
            Simulation::new(config)
                .unwrap()
                .run(&mut StdRng::seed_from_u64(1), &mut records)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_insert, bench_simulation);
criterion_main!(benches);
