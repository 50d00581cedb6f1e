use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chart::{ChartSink, CsvChartWriter};
use crate::config::GameConfig;
use crate::console::Console;
use crate::perf::RunSummary;
use crate::sim::SimulationBuilder;
use crate::source::{fetch_initial_snapshot, QuoteSource};
use crate::universe::Universe;

/// Interactive driver. Holds the collaborators and calls into the simulation between prompts; all
/// game logic lives in [crate::sim].
pub struct Game<R: BufRead, W: Write, Q: QuoteSource> {
    config: GameConfig,
    universe: Universe,
    console: Console<R, W>,
    source: Q,
    chart: Option<Box<dyn ChartSink>>,
    rng: StdRng,
}

impl<R: BufRead, W: Write, Q: QuoteSource> Game<R, W, Q> {
    /// Plays rounds until the player declines a replay.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.play_round()?;
            if !self.console.confirm_replay()? {
                self.console.say("Thank you for playing!")?;
                return Ok(());
            }
        }
    }

    pub fn play_round(&mut self) -> Result<RunSummary> {
        self.console.show_welcome()?;
        self.console.show_instruments(&self.universe)?;

        let periods = match self.config.fixed_periods() {
            Some(periods) => periods,
            None => self.console.prompt_periods()?,
        };

        self.console.say("\nFetching live stock prices...")?;
        let initial = fetch_initial_snapshot(&self.universe, &self.source, &mut self.rng);
        self.console.show_mocked(&initial.mocked())?;
        self.console
            .show_prices(&initial.snapshot, &self.universe)?;

        let allocation = self.console.prompt_allocation(&self.universe)?;
        self.console.show_allocation(&self.universe, &allocation)?;

        let mut sim = SimulationBuilder::new()
            .with_universe(self.universe.clone())
            .with_initial_snapshot(initial.snapshot)
            .with_human_allocation(allocation)
            .with_bot_count(self.config.bots)
            .with_regime_selection(self.config.regime_selection())
            .with_convention(self.config.value_convention())
            .build(StdRng::seed_from_u64(self.rng.gen()))?;

        for period in 1..periods {
            let outcome = sim
                .tick()
                .with_context(|| format!("Simulation stopped in period {}", period))?;
            self.console
                .show_prices(&outcome.snapshot, sim.get_universe())?;
            if period + 1 < periods {
                self.console
                    .wait_for_enter("\nPress Enter to continue to the next period...")?;
            }
        }

        let summary = sim.summary();
        log::info!(
            "Run finished after {} periods, user value {:.2} ranked {}/{}",
            periods,
            summary.human_value,
            summary.rank,
            summary.participants
        );
        self.console.show_results(&summary)?;

        if let Some(chart) = self.chart.as_mut() {
            if let Err(e) = chart.render(sim.get_history(), &sim.participants()) {
                log::warn!("Chart rendering failed: {:#}", e);
                self.console.say("Charts could not be written.")?;
            }
        }
        Ok(summary)
    }

    pub fn with_universe(mut self, universe: Universe) -> Self {
        self.universe = universe;
        self
    }

    pub fn with_chart(mut self, chart: Option<Box<dyn ChartSink>>) -> Self {
        self.chart = chart;
        self
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    pub fn new(config: GameConfig, console: Console<R, W>, source: Q) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let chart: Option<Box<dyn ChartSink>> = if config.no_charts {
            None
        } else {
            Some(Box::new(CsvChartWriter::new(config.output_dir.clone())))
        };
        Self {
            config,
            universe: Universe::default(),
            console,
            source,
            chart,
            rng,
        }
    }
}
