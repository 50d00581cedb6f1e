use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::input::{PriceSnapshot, PriceSnapshotBuilder};

/// Parameters of `next = alpha + beta * last + noise` with `noise ~ Normal(0, noise_stdev)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegimeParams {
    pub alpha: f64,
    pub beta: f64,
    pub noise_stdev: f64,
}

/// Rule that moves every price for one period. A single regime applies to all instruments in a
/// period, each instrument gets its own noise draw.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum Regime {
    Neutral,
    UpwardShock,
    DownwardShock,
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Neutral, Regime::UpwardShock, Regime::DownwardShock];
    const NOISE_STDEV: f64 = 5.0;

    pub fn params(&self) -> RegimeParams {
        let beta = match self {
            Regime::Neutral => 1.0,
            Regime::UpwardShock => 5.0,
            Regime::DownwardShock => -10.0,
        };
        RegimeParams {
            alpha: 0.0,
            beta,
            noise_stdev: Self::NOISE_STDEV,
        }
    }

    /// Unclamped forecast given a standard normal draw.
    pub fn forecast(&self, last: f64, standard_draw: f64) -> f64 {
        let params = self.params();
        params.alpha + params.beta * last + params.noise_stdev * standard_draw
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum RegimeSelection {
    /// Uniform choice among [Regime::ALL] each period.
    Random,
    Fixed(Regime),
}

impl RegimeSelection {
    pub fn pick(&self, rng: &mut impl Rng) -> Regime {
        match self {
            RegimeSelection::Random => Regime::ALL[rng.gen_range(0..Regime::ALL.len())],
            RegimeSelection::Fixed(regime) => *regime,
        }
    }
}

pub struct PriceProcess;

impl PriceProcess {
    /// Simulated prices never go below one cent so that the next period's return has a positive
    /// denominator.
    pub const PRICE_FLOOR: f64 = 0.01;

    /// Produces the snapshot for the period after `previous`, keeping its instruments and order.
    pub fn next_snapshot(
        previous: &PriceSnapshot,
        regime: Regime,
        rng: &mut impl Rng,
    ) -> PriceSnapshot {
        let mut builder = PriceSnapshotBuilder::new(previous.get_period() + 1);
        for (name, last) in previous.get_prices() {
            let draw: f64 = rng.sample(StandardNormal);
            let forecast = regime.forecast(*last, draw);
            let price = forecast.max(Self::PRICE_FLOOR);
            if price != forecast {
                log::debug!("Clamped {} forecast {:.4} to {}", name, forecast, price);
            }
            builder.add_price(name.as_str(), price);
        }
        builder.build()
    }
}
