use std::io::{self, BufRead, Write};

use crate::error::AllocationError;
use crate::input::PriceSnapshot;
use crate::perf::RunSummary;
use crate::portfolio::{Allocation, AllocationBuilder};
use crate::universe::Universe;

/// Prompts and messages for the human player over any line-based input and output. Invalid input
/// is handled here with a re-prompt, only a closed input stream is returned as an error.
pub struct Console<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn read_line(&mut self) -> io::Result<String> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for the player",
            ));
        }
        Ok(buf.trim().to_string())
    }

    fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.read_line()
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    pub fn wait_for_enter(&mut self, text: &str) -> io::Result<()> {
        self.prompt(text).map(|_| ())
    }

    pub fn show_welcome(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nWelcome to the Trading Game!")?;
        writeln!(
            self.output,
            "
    Rules:
    1. Allocate your portfolio among the stocks with leverage up to 5x.
    2. You can allocate up to 500% across all stocks, or short stocks with negative allocations.
    3. Stock prices are fetched live for the first round. Subsequent rounds simulate prices.
    4. Your goal is to maximize returns compared to the AI players.
"
        )?;
        self.wait_for_enter("Press Enter when you're ready to start!")
    }

    pub fn show_instruments(&mut self, universe: &Universe) -> io::Result<()> {
        let names: Vec<&str> = universe.names().collect();
        writeln!(self.output, "The stocks being traded are: {}", names.join(", "))
    }

    pub fn prompt_periods(&mut self) -> io::Result<usize> {
        loop {
            let line = self.prompt(
                "\nEnter the number of periods (at least 2) you'd like the game to run (e.g., 5, 10): ",
            )?;
            match line.parse::<i64>() {
                Ok(periods) if periods >= 2 => return Ok(periods as usize),
                Ok(_) => self.say("Please enter a positive number greater than 1.")?,
                Err(_) => self.say("Invalid input. Please enter a valid number.")?,
            }
        }
    }

    pub fn show_mocked(&mut self, names: &[&str]) -> io::Result<()> {
        for name in names {
            writeln!(
                self.output,
                "Could not fetch a live price for {}, using mock data instead.",
                name
            )?;
        }
        Ok(())
    }

    pub fn show_prices(&mut self, snapshot: &PriceSnapshot, universe: &Universe) -> io::Result<()> {
        writeln!(
            self.output,
            "\n--- Stock Prices for Period {} ---",
            snapshot.get_period()
        )?;
        for name in universe.names() {
            if let Some(price) = snapshot.get_price(name) {
                writeln!(self.output, "{}: ${:.2}", name, price)?;
            }
        }
        Ok(())
    }

    /// Collects one entry per instrument. A rejected entry is asked for again on its own, entries
    /// already accepted are kept.
    pub fn prompt_allocation(&mut self, universe: &Universe) -> io::Result<Allocation> {
        writeln!(
            self.output,
            "\nAllocate your portfolio. You can use leverage up to 5x or short stocks."
        )?;
        writeln!(
            self.output,
            "The absolute values of your allocations may add up to at most {}%. Negative values are short positions.",
            Allocation::LEVERAGE_CAP
        )?;

        let names: Vec<&str> = universe.names().collect();
        let mut builder = AllocationBuilder::new(names.len());
        while !builder.is_complete() {
            let name = names[builder.next_index()];
            let text = format!(
                "Enter % allocation to {} ({:.2}% of leverage left, negative to short): ",
                name,
                builder.remaining()
            );
            let line = self.prompt(&text)?;
            match builder.push_entry(&line) {
                Ok(_) => {}
                Err(e @ AllocationError::LeverageExceeded { .. }) => {
                    writeln!(self.output, "{}. Please try again.", e)?
                }
                Err(e) => writeln!(
                    self.output,
                    "Invalid input: {}. Please enter numeric values only.",
                    e
                )?,
            }
        }
        builder
            .build()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn show_allocation(&mut self, universe: &Universe, allocation: &Allocation) -> io::Result<()> {
        writeln!(self.output, "\nYour portfolio allocation:")?;
        for (name, weight) in universe.names().zip(allocation.get_weights()) {
            writeln!(self.output, "{}: {}%", name, weight)?;
        }
        Ok(())
    }

    pub fn show_results(&mut self, summary: &RunSummary) -> io::Result<()> {
        writeln!(self.output, "\n--- Final Results ---")?;
        writeln!(
            self.output,
            "Your Final Portfolio Value: {:.2}",
            summary.human_value
        )?;
        writeln!(
            self.output,
            "Your Ranking: {}/{}",
            summary.rank, summary.participants
        )?;
        if let (Some(best), Some(worst)) = (summary.best_bot, summary.worst_bot) {
            writeln!(self.output, "Best AI Portfolio Value: {:.2}", best)?;
            writeln!(self.output, "Worst AI Portfolio Value: {:.2}", worst)?;
        }
        writeln!(self.output, "\nAI Portfolio Values:")?;
        for (i, value) in summary.bot_values.iter().enumerate() {
            writeln!(self.output, "AI {}: {:.2}", i + 1, value)?;
        }
        Ok(())
    }

    /// Only `yes` replays. A closed input counts as no.
    pub fn confirm_replay(&mut self) -> io::Result<bool> {
        match self.prompt("Would you like to play again? If so, type 'yes'\n") {
            Ok(answer) => Ok(answer.eq_ignore_ascii_case("yes")),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}
