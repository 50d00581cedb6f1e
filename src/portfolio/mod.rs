use rand::Rng;
use rand_distr::{Dirichlet, Distribution};
use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, SimulationError};

/// Percentage weights, one per instrument in universe order. Negative weights are shorts and the
/// gross exposure can exceed 100 through leverage.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Allocation {
    weights: Vec<f64>,
}

impl Allocation {
    /// Maximum sum of absolute weights: 500% with 5x leverage.
    pub const LEVERAGE_CAP: f64 = 500.0;
    /// Slack on the cap so decimal entries summing to exactly 500 are not lost to f64 rounding.
    pub const CAP_TOLERANCE: f64 = 1e-9;

    pub fn get_weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn gross_exposure(&self) -> f64 {
        self.weights.iter().map(|w| w.abs()).sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Checks a complete set of weights against the cap in one go.
    pub fn validate(weights: Vec<f64>) -> Result<Self, AllocationError> {
        let mut builder = AllocationBuilder::new(weights.len());
        for weight in weights {
            builder.push(weight)?;
        }
        builder.build()
    }
}

/// Collects a human allocation one entry at a time. A rejected entry leaves the accepted entries
/// and the running gross total untouched.
#[derive(Clone, Debug)]
pub struct AllocationBuilder {
    expected: usize,
    weights: Vec<f64>,
    gross: f64,
}

impl AllocationBuilder {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            weights: Vec::with_capacity(expected),
            gross: 0.0,
        }
    }

    /// Parses console text, then pushes it. Returns the accepted weight.
    pub fn push_entry(&mut self, raw: &str) -> Result<f64, AllocationError> {
        let trimmed = raw.trim().trim_end_matches('%').trim();
        let weight = trimmed
            .parse::<f64>()
            .map_err(|_| AllocationError::NotNumeric {
                input: raw.trim().to_string(),
            })?;
        self.push(weight)?;
        Ok(weight)
    }

    pub fn push(&mut self, weight: f64) -> Result<(), AllocationError> {
        if self.is_complete() {
            return Err(AllocationError::Complete);
        }
        if !weight.is_finite() {
            return Err(AllocationError::NonFinite);
        }
        let total = self.gross + weight.abs();
        if total > Allocation::LEVERAGE_CAP + Allocation::CAP_TOLERANCE {
            return Err(AllocationError::LeverageExceeded {
                total,
                cap: Allocation::LEVERAGE_CAP,
            });
        }
        self.gross = total;
        self.weights.push(weight);
        Ok(())
    }

    /// Gross exposure still available under the cap.
    pub fn remaining(&self) -> f64 {
        (Allocation::LEVERAGE_CAP - self.gross).max(0.0)
    }

    pub fn next_index(&self) -> usize {
        self.weights.len()
    }

    pub fn is_complete(&self) -> bool {
        self.weights.len() >= self.expected
    }

    pub fn build(self) -> Result<Allocation, AllocationError> {
        if !self.is_complete() {
            return Err(AllocationError::Incomplete {
                expected: self.expected,
                actual: self.weights.len(),
            });
        }
        Ok(Allocation {
            weights: self.weights,
        })
    }
}

/// Concentration of the symmetric Dirichlet used for bot weights, every simplex point equally likely.
pub const BOT_CONCENTRATION: f64 = 1.0;

/// Long-only weights summing to 100, drawn once per bot at the start of a run.
pub fn random_bot_allocation(size: usize, rng: &mut impl Rng) -> Allocation {
    if size == 0 {
        return Allocation {
            weights: Vec::new(),
        };
    }

    let draws = match Dirichlet::new_with_size(BOT_CONCENTRATION, size) {
        Ok(dist) => dist.sample(rng),
        // Dirichlet needs two or more categories, a single instrument takes everything
        Err(_) => vec![1.0; size],
    };
    let total: f64 = draws.iter().sum();
    Allocation {
        weights: draws.iter().map(|w| w / total * 100.0).collect(),
    }
}

/// How a period return, in percentage points, moves a participant's value.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ValueConvention {
    /// Starts at 0 and accumulates returns: the value is a cumulative percentage return.
    Additive,
    /// Starts at 100 and compounds: the value is an index.
    Compounding,
}

impl ValueConvention {
    pub fn starting_value(&self) -> f64 {
        match self {
            ValueConvention::Additive => 0.0,
            ValueConvention::Compounding => 100.0,
        }
    }

    pub fn apply(&self, value: f64, period_return: f64) -> f64 {
        match self {
            ValueConvention::Additive => value + period_return,
            ValueConvention::Compounding => value * (1.0 + period_return / 100.0),
        }
    }
}

/// One entrant in the game: the human or a bot. Holds the allocation fixed for the run and the
/// value after every period, period 0 included.
#[derive(Clone, Debug, Serialize)]
pub struct Participant {
    name: String,
    allocation: Allocation,
    values: Vec<f64>,
}

impl Participant {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_allocation(&self) -> &Allocation {
        &self.allocation
    }

    pub fn get_values(&self) -> &[f64] {
        &self.values
    }

    pub fn current_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }

    /// Value this participant would hold after a period with the given return. Does not record.
    pub fn next_value(
        &self,
        convention: ValueConvention,
        period_return: f64,
    ) -> Result<f64, SimulationError> {
        let value = convention.apply(self.current_value(), period_return);
        if !value.is_finite() {
            return Err(SimulationError::NonFiniteValue {
                participant: self.name.clone(),
            });
        }
        Ok(value)
    }

    pub fn record(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn new(name: impl Into<String>, allocation: Allocation, starting_value: f64) -> Self {
        Self {
            name: name.into(),
            allocation,
            values: vec![starting_value],
        }
    }
}
