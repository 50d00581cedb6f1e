//! Explicit simulation state for one run of the game.
//!
//! A [Simulation] owns everything that changes over a run: the last snapshot, the price history,
//! the human and bot participants, and the random source. Each call to [Simulation::tick] moves
//! the run forward one period in a fixed order: generate prices, update the human, update every
//! bot, append to history. Nothing is shared between runs so several simulations can exist side
//! by side and a seeded RNG gives a reproducible run.
pub mod builder;
pub mod process;

use rand::Rng;

use crate::error::SimulationError;
use crate::input::{PriceHistory, PriceSnapshot, PriceSnapshotBuilder};
use crate::perf::{period_return, RunSummary};
use crate::portfolio::{Participant, ValueConvention};
use crate::universe::Universe;

use process::{PriceProcess, Regime, RegimeSelection};

pub use builder::SimulationBuilder;

/// What happened in one period.
#[derive(Clone, Debug)]
pub struct PeriodOutcome {
    pub period: usize,
    /// None when the snapshot was supplied by the caller rather than generated.
    pub regime: Option<Regime>,
    pub snapshot: PriceSnapshot,
    pub human_value: f64,
}

pub struct Simulation<R: Rng> {
    universe: Universe,
    last_snapshot: PriceSnapshot,
    history: PriceHistory,
    human: Participant,
    bots: Vec<Participant>,
    regime_selection: RegimeSelection,
    convention: ValueConvention,
    rng: R,
}

impl<R: Rng> Simulation<R> {
    /// Generates the next period's prices with the configured regime selection and applies them.
    pub fn tick(&mut self) -> Result<PeriodOutcome, SimulationError> {
        let regime = self.regime_selection.pick(&mut self.rng);
        log::debug!(
            "Period {} regime {:?}",
            self.last_snapshot.get_period() + 1,
            regime
        );
        let next = PriceProcess::next_snapshot(&self.last_snapshot, regime, &mut self.rng);
        let mut outcome = self.apply_snapshot(next)?;
        outcome.regime = Some(regime);
        Ok(outcome)
    }

    /// Applies a caller-supplied snapshot as the next period, bypassing the price process. The
    /// snapshot must cover exactly the run's instruments. State is only changed when every
    /// participant could be updated.
    pub fn apply_snapshot(
        &mut self,
        next: PriceSnapshot,
    ) -> Result<PeriodOutcome, SimulationError> {
        let period = self.last_snapshot.get_period() + 1;
        if !next.covers(&self.universe) {
            return Err(SimulationError::UnexpectedInstruments { period });
        }
        // Periods are numbered by the simulation, not the caller
        let next = if next.get_period() == period {
            next
        } else {
            let mut builder = PriceSnapshotBuilder::new(period);
            for (name, price) in next.get_prices() {
                builder.add_price(name.as_str(), *price);
            }
            builder.build()
        };

        let human_ret = period_return(
            self.human.get_allocation().get_weights(),
            &self.universe,
            &self.last_snapshot,
            &next,
        )?;
        let human_value = self.human.next_value(self.convention, human_ret)?;

        let mut bot_values = Vec::with_capacity(self.bots.len());
        for bot in &self.bots {
            let ret = period_return(
                bot.get_allocation().get_weights(),
                &self.universe,
                &self.last_snapshot,
                &next,
            )?;
            bot_values.push(bot.next_value(self.convention, ret)?);
        }

        self.human.record(human_value);
        for (bot, value) in self.bots.iter_mut().zip(bot_values) {
            bot.record(value);
        }
        self.history.append_snapshot(&next, &self.universe);
        self.last_snapshot = next.clone();

        Ok(PeriodOutcome {
            period,
            regime: None,
            snapshot: next,
            human_value,
        })
    }

    pub fn summary(&self) -> RunSummary {
        let bot_values: Vec<f64> = self.bots.iter().map(|b| b.current_value()).collect();
        RunSummary::from_values(self.human.current_value(), &bot_values)
    }

    pub fn get_universe(&self) -> &Universe {
        &self.universe
    }

    pub fn get_history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn get_human(&self) -> &Participant {
        &self.human
    }

    pub fn get_bots(&self) -> &[Participant] {
        &self.bots
    }

    /// Every participant, human first, in the order used for charts.
    pub fn participants(&self) -> Vec<&Participant> {
        let mut res = Vec::with_capacity(self.bots.len() + 1);
        res.push(&self.human);
        res.extend(self.bots.iter());
        res
    }

    /// Index of the most recent period, 0 before the first tick.
    pub fn current_period(&self) -> usize {
        self.last_snapshot.get_period()
    }
}
