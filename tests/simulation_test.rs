mod common;

use rand::rngs::StdRng;
use rand::SeedableRng;

use agora::error::SimulationError;
use agora::portfolio::{Allocation, ValueConvention};
use agora::sim::process::{Regime, RegimeSelection};
use agora::sim::{Simulation, SimulationBuilder};
use agora::source::{
    fetch_initial_snapshot, FixedQuoteSource, PriceOrigin, MOCK_PRICE_HIGH, MOCK_PRICE_LOW,
};
use agora::universe::Universe;

fn two_stock_run(convention: ValueConvention) -> Simulation<StdRng> {
    SimulationBuilder::new()
        .with_universe(common::two_stock_universe())
        .with_initial_snapshot(common::snapshot(0, &[("A", 100.0), ("B", 200.0)]))
        .with_human_allocation(Allocation::validate(vec![200.0, -100.0]).unwrap())
        .with_convention(convention)
        .build(StdRng::seed_from_u64(8))
        .unwrap()
}

#[test]
fn test_that_leveraged_short_scenario_returns_25_points() {
    let mut sim = two_stock_run(ValueConvention::Additive);
    let outcome = sim
        .apply_snapshot(common::snapshot(1, &[("A", 110.0), ("B", 190.0)]))
        .unwrap();

    assert!((outcome.human_value - 25.0).abs() < 1e-9);
    assert_eq!(sim.get_human().get_values()[0], 0.0);
}

#[test]
fn test_that_leveraged_short_scenario_compounds_to_125() {
    let mut sim = two_stock_run(ValueConvention::Compounding);
    sim.apply_snapshot(common::snapshot(1, &[("A", 110.0), ("B", 190.0)]))
        .unwrap();

    assert!((sim.get_human().current_value() - 125.0).abs() < 1e-9);
    assert_eq!(sim.get_human().get_values()[0], 100.0);
}

#[test]
fn test_that_every_period_keeps_the_opening_instruments() {
    let universe = Universe::default();
    let mut source = FixedQuoteSource::new();
    source
        .add_price("NVDA", 120.0)
        .add_price("META", 480.0)
        .add_price("MSFT", 410.0)
        .add_price("GOOGL", 160.0)
        .add_price("AMD", 150.0);
    let mut rng = StdRng::seed_from_u64(2024);
    let initial = fetch_initial_snapshot(&universe, &source, &mut rng);

    let mut sim = SimulationBuilder::new()
        .with_universe(universe.clone())
        .with_initial_snapshot(initial.snapshot)
        .with_human_allocation(Allocation::validate(vec![100.0, 100.0, -100.0, 100.0, 100.0]).unwrap())
        .with_regime_selection(RegimeSelection::Random)
        .build(rng)
        .unwrap();

    for _ in 0..100 {
        let outcome = sim.tick().unwrap();
        assert!(outcome.snapshot.covers(&universe));
        assert!(outcome.human_value.is_finite());
    }
    for name in universe.names() {
        assert_eq!(sim.get_history().series(name).len(), 101);
    }
}

#[test]
fn test_that_bots_hold_long_only_allocations_summing_to_100() {
    let sim = two_stock_run(ValueConvention::Additive);
    assert_eq!(sim.get_bots().len(), 9);
    for bot in sim.get_bots() {
        let weights = bot.get_allocation().get_weights();
        assert!(weights.iter().all(|w| *w >= 0.0));
        assert!((weights.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }
}

#[test]
fn test_that_zero_price_stops_the_run() {
    let mut sim = two_stock_run(ValueConvention::Additive);
    sim.apply_snapshot(common::snapshot(1, &[("A", 0.0), ("B", 190.0)]))
        .unwrap();

    let res = sim.apply_snapshot(common::snapshot(2, &[("A", 10.0), ("B", 190.0)]));
    assert_eq!(
        res.err(),
        Some(SimulationError::DegeneratePrice {
            instrument: "A".to_string(),
            price: 0.0
        })
    );
    assert_eq!(sim.current_period(), 1);
}

#[test]
fn test_that_same_seed_replays_the_same_run() {
    let build = || {
        SimulationBuilder::new()
            .with_universe(common::two_stock_universe())
            .with_initial_snapshot(common::snapshot(0, &[("A", 100.0), ("B", 200.0)]))
            .with_human_allocation(Allocation::validate(vec![50.0, 50.0]).unwrap())
            .with_regime_selection(RegimeSelection::Fixed(Regime::Neutral))
            .build(StdRng::seed_from_u64(77))
            .unwrap()
    };
    let mut first = build();
    let mut second = build();
    for _ in 0..10 {
        first.tick().unwrap();
        second.tick().unwrap();
    }
    assert_eq!(first.summary(), second.summary());
}

#[test]
fn test_that_ranking_reports_human_position() {
    let mut sim = SimulationBuilder::new()
        .with_universe(common::two_stock_universe())
        .with_initial_snapshot(common::snapshot(0, &[("A", 100.0), ("B", 100.0)]))
        .with_human_allocation(Allocation::validate(vec![300.0, 0.0]).unwrap())
        .with_bot_allocations(vec![
            Allocation::validate(vec![100.0, 0.0]).unwrap(),
            Allocation::validate(vec![0.0, 100.0]).unwrap(),
        ])
        .build(StdRng::seed_from_u64(0))
        .unwrap();
    sim.apply_snapshot(common::snapshot(1, &[("A", 110.0), ("B", 120.0)]))
        .unwrap();

    // User +30, AI 1 +10, AI 2 +20
    let summary = sim.summary();
    assert_eq!(summary.rank, 1);
    assert_eq!(summary.participants, 3);
    assert!((summary.best_bot.unwrap() - 20.0).abs() < 1e-9);
    assert!((summary.worst_bot.unwrap() - 10.0).abs() < 1e-9);
}

#[test]
fn test_that_failed_fetch_is_replaced_by_mock_price() {
    let universe = common::two_stock_universe();
    let mut source = FixedQuoteSource::new();
    source.add_price("AAA", 150.0);

    let mut rng = StdRng::seed_from_u64(5);
    let initial = fetch_initial_snapshot(&universe, &source, &mut rng);

    assert!(initial.snapshot.covers(&universe));
    assert_eq!(initial.snapshot.get_price("A"), Some(150.0));
    let mocked = initial.snapshot.get_price("B").unwrap();
    assert!((MOCK_PRICE_LOW..MOCK_PRICE_HIGH).contains(&mocked));
    assert_eq!(initial.origins[1], ("B".to_string(), PriceOrigin::Mock));
}
