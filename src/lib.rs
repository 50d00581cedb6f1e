//! # What is Agora?
//!
//! Agora is a console trading game. The player sees opening prices for a handful of stocks,
//! allocates a portfolio that may use up to 5x leverage and short positions, and then watches the
//! portfolio compete against nine bots with random long-only allocations over a number of
//! simulated periods.
//!
//! # Implementation
//!
//! The game logic is kept apart from the prompts so that it can run, and be tested, without a
//! player:
//! - [source](crate::source) fetches opening prices, substituting mock prices for anything the
//! quote source cannot answer so that every run starts with a complete
//! [PriceSnapshot](crate::input::PriceSnapshot).
//! - [PriceProcess](crate::sim::process::PriceProcess) produces each following period from the
//! last one. A period is driven by one [Regime](crate::sim::process::Regime): a neutral random
//! walk, an upward shock or a downward shock. Prices are floored at one cent.
//! - [AllocationBuilder](crate::portfolio::AllocationBuilder) enforces the 500% gross exposure cap
//! on the human allocation, bots draw theirs from a symmetric Dirichlet.
//! - [period_return](crate::perf::period_return) turns price moves into a return for each
//! allocation and [ValueConvention](crate::portfolio::ValueConvention) decides whether returns
//! add up or compound.
//! - [Simulation](crate::sim::Simulation) holds the state of a single run and advances it one
//! period at a time.
//!
//! The [Game](crate::game::Game) driver wires these to the [Console](crate::console::Console) and
//! a [ChartSink](crate::chart::ChartSink).
//!
//! ``
//! cargo run --bin trading_game -- --seed 42 --convention compounding
//! ``
pub mod chart;
pub mod config;
pub mod console;
pub mod error;
pub mod game;
pub mod input;
pub mod perf;
pub mod portfolio;
pub mod sim;
pub mod source;
pub mod universe;
