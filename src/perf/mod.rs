use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::input::PriceSnapshot;
use crate::universe::Universe;

/// Simple return of a leveraged allocation over one period, in percentage points:
/// `sum(weight[i] * (end[i] / start[i] - 1))` over the universe order.
pub fn period_return(
    weights: &[f64],
    universe: &Universe,
    start: &PriceSnapshot,
    end: &PriceSnapshot,
) -> Result<f64, SimulationError> {
    if weights.len() != universe.len() {
        return Err(SimulationError::AllocationLength {
            expected: universe.len(),
            actual: weights.len(),
        });
    }

    let mut total = 0.0;
    for (weight, name) in weights.iter().zip(universe.names()) {
        let start_price =
            start
                .get_price(name)
                .ok_or_else(|| SimulationError::InstrumentMismatch {
                    instrument: name.to_string(),
                    period: start.get_period(),
                })?;
        let end_price = end
            .get_price(name)
            .ok_or_else(|| SimulationError::InstrumentMismatch {
                instrument: name.to_string(),
                period: end.get_period(),
            })?;

        if !(start_price.is_finite() && start_price > 0.0) {
            return Err(SimulationError::DegeneratePrice {
                instrument: name.to_string(),
                price: start_price,
            });
        }
        total += weight * (end_price / start_price - 1.0);
    }
    Ok(total)
}

/// End of run standings. Rank is 1-based over the human and every bot sorted by value, highest
/// first. Ties are not broken, the human takes the first position holding their value.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RunSummary {
    pub human_value: f64,
    pub rank: usize,
    pub participants: usize,
    pub best_bot: Option<f64>,
    pub worst_bot: Option<f64>,
    pub bot_values: Vec<f64>,
}

impl RunSummary {
    pub fn from_values(human_value: f64, bot_values: &[f64]) -> Self {
        let mut all: Vec<f64> = bot_values.to_vec();
        all.push(human_value);
        all.sort_by(|a, b| b.total_cmp(a));

        let rank = all
            .iter()
            .position(|v| *v == human_value)
            .map(|pos| pos + 1)
            .unwrap_or(all.len());

        let best_bot = bot_values.iter().copied().reduce(f64::max);
        let worst_bot = bot_values.iter().copied().reduce(f64::min);

        Self {
            human_value,
            rank,
            participants: all.len(),
            best_bot,
            worst_bot,
            bot_values: bot_values.to_vec(),
        }
    }
}
