use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use agora::input::PriceSnapshotBuilder;
use agora::portfolio::Allocation;
use agora::sim::SimulationBuilder;
use agora::universe::Universe;

fn full_game_loop() {
    let universe = Universe::default();
    let mut snapshot = PriceSnapshotBuilder::new(0);
    for (i, name) in universe.names().enumerate() {
        snapshot.add_price(name, 100.0 + 50.0 * i as f64);
    }

    let mut sim = SimulationBuilder::new()
        .with_universe(universe)
        .with_initial_snapshot(snapshot.build())
        .with_human_allocation(
            Allocation::validate(vec![200.0, -100.0, 50.0, 50.0, -100.0]).unwrap(),
        )
        .build(StdRng::seed_from_u64(1))
        .unwrap();

    for _ in 0..250 {
        // Random regimes can floor a price and later blow values up, the loop only times ticks
        if sim.tick().is_err() {
            break;
        }
    }
}

fn benchmarks(c: &mut Criterion) {
    c.bench_function("game loop 250 periods", |b| b.iter(full_game_loop));
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
