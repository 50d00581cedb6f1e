use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::portfolio::ValueConvention;
use crate::sim::process::{Regime, RegimeSelection};
use crate::sim::SimulationBuilder;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RegimeArg {
    /// Pick neutral, upward or downward uniformly each period
    Random,
    Neutral,
    Upward,
    Downward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConventionArg {
    /// Values start at 0 and add up period returns
    Additive,
    /// Values start at 100 and compound period returns
    Compounding,
}

/// Settings for a game session. Every field has a default so the bare binary plays the classic
/// game: live prices, random regimes, additive values, nine bots.
#[derive(Parser, Debug, Clone)]
#[command(name = "trading_game", author, version, about = "Beat nine random bots with a leveraged portfolio", long_about = None)]
pub struct GameConfig {
    /// Number of periods including the opening prices. Prompted for when absent
    #[arg(long, value_parser = clap::value_parser!(u64).range(2..))]
    pub periods: Option<u64>,

    /// How the price regime is chosen each period
    #[arg(long, value_enum, default_value_t = RegimeArg::Random)]
    pub regime: RegimeArg,

    /// How period returns move portfolio values
    #[arg(long, value_enum, default_value_t = ConventionArg::Additive)]
    pub convention: ConventionArg,

    /// Seed for reproducible prices and bot allocations
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip live quotes and use mock opening prices
    #[arg(long)]
    pub offline: bool,

    /// Directory for the price and portfolio value CSV files
    #[arg(long, default_value = "charts")]
    pub output_dir: PathBuf,

    /// Do not write chart files
    #[arg(long)]
    pub no_charts: bool,

    /// Number of bot portfolios to play against
    #[arg(long, default_value_t = SimulationBuilder::DEFAULT_BOTS)]
    pub bots: usize,
}

impl GameConfig {
    pub fn regime_selection(&self) -> RegimeSelection {
        match self.regime {
            RegimeArg::Random => RegimeSelection::Random,
            RegimeArg::Neutral => RegimeSelection::Fixed(Regime::Neutral),
            RegimeArg::Upward => RegimeSelection::Fixed(Regime::UpwardShock),
            RegimeArg::Downward => RegimeSelection::Fixed(Regime::DownwardShock),
        }
    }

    pub fn value_convention(&self) -> ValueConvention {
        match self.convention {
            ConventionArg::Additive => ValueConvention::Additive,
            ConventionArg::Compounding => ValueConvention::Compounding,
        }
    }

    pub fn fixed_periods(&self) -> Option<usize> {
        self.periods.map(|p| p as usize)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::parse_from(["trading_game"])
    }
}
