use rand::Rng;

use crate::error::SimulationError;
use crate::input::{PriceHistory, PriceSnapshot};
use crate::portfolio::{random_bot_allocation, Allocation, Participant, ValueConvention};
use crate::universe::Universe;

use super::process::RegimeSelection;
use super::Simulation;

pub struct SimulationBuilder {
    universe: Option<Universe>,
    initial_snapshot: Option<PriceSnapshot>,
    human_allocation: Option<Allocation>,
    bot_allocations: Option<Vec<Allocation>>,
    bot_count: usize,
    regime_selection: RegimeSelection,
    convention: ValueConvention,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    pub const DEFAULT_BOTS: usize = 9;

    pub fn with_universe(&mut self, universe: Universe) -> &mut Self {
        self.universe = Some(universe);
        self
    }

    pub fn with_initial_snapshot(&mut self, snapshot: PriceSnapshot) -> &mut Self {
        self.initial_snapshot = Some(snapshot);
        self
    }

    pub fn with_human_allocation(&mut self, allocation: Allocation) -> &mut Self {
        self.human_allocation = Some(allocation);
        self
    }

    /// Fixed bot allocations. When not given, `bot_count` allocations are drawn at build.
    pub fn with_bot_allocations(&mut self, allocations: Vec<Allocation>) -> &mut Self {
        self.bot_allocations = Some(allocations);
        self
    }

    pub fn with_bot_count(&mut self, count: usize) -> &mut Self {
        self.bot_count = count;
        self
    }

    pub fn with_regime_selection(&mut self, selection: RegimeSelection) -> &mut Self {
        self.regime_selection = selection;
        self
    }

    pub fn with_convention(&mut self, convention: ValueConvention) -> &mut Self {
        self.convention = convention;
        self
    }

    //Period 0 is recorded here: the initial snapshot goes into history and every participant
    //starts at the convention's starting value, so the first tick produces period 1.
    pub fn build<R: Rng>(&mut self, mut rng: R) -> Result<Simulation<R>, SimulationError> {
        let universe = self
            .universe
            .take()
            .ok_or(SimulationError::Incomplete {
                missing: "universe",
            })?;
        let initial = self
            .initial_snapshot
            .take()
            .ok_or(SimulationError::Incomplete {
                missing: "initial snapshot",
            })?;
        let human_allocation =
            self.human_allocation
                .take()
                .ok_or(SimulationError::Incomplete {
                    missing: "human allocation",
                })?;

        if !initial.covers(&universe) {
            return Err(SimulationError::UnexpectedInstruments {
                period: initial.get_period(),
            });
        }

        let bot_allocations = match self.bot_allocations.take() {
            Some(allocations) => allocations,
            None => (0..self.bot_count)
                .map(|_| random_bot_allocation(universe.len(), &mut rng))
                .collect(),
        };
        for allocation in std::iter::once(&human_allocation).chain(bot_allocations.iter()) {
            if allocation.len() != universe.len() {
                return Err(SimulationError::AllocationLength {
                    expected: universe.len(),
                    actual: allocation.len(),
                });
            }
        }

        let start = self.convention.starting_value();
        let human = Participant::new("User", human_allocation, start);
        let bots = bot_allocations
            .into_iter()
            .enumerate()
            .map(|(i, allocation)| Participant::new(format!("AI {}", i + 1), allocation, start))
            .collect();

        let mut history = PriceHistory::new();
        history.append_snapshot(&initial, &universe);

        Ok(Simulation {
            universe,
            last_snapshot: initial,
            history,
            human,
            bots,
            regime_selection: self.regime_selection,
            convention: self.convention,
            rng,
        })
    }

    pub fn new() -> Self {
        Self {
            universe: None,
            initial_snapshot: None,
            human_allocation: None,
            bot_allocations: None,
            bot_count: Self::DEFAULT_BOTS,
            regime_selection: RegimeSelection::Random,
            convention: ValueConvention::Additive,
        }
    }
}
