use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::input::PriceHistory;
use crate::portfolio::Participant;

/// Receives the finished run for display. Nothing it produces feeds back into the game.
pub trait ChartSink {
    fn render(&mut self, history: &PriceHistory, participants: &[&Participant]) -> Result<()>;
}

/// Writes the price evolution and portfolio value evolution as two CSV files, ready for any
/// plotting tool.
pub struct CsvChartWriter {
    dir: PathBuf,
}

impl CsvChartWriter {
    pub const PRICES_FILE: &'static str = "prices.csv";
    pub const VALUES_FILE: &'static str = "portfolio_values.csv";

    pub fn get_dir(&self) -> &Path {
        &self.dir
    }

    fn write_prices(&self, history: &PriceHistory) -> Result<PathBuf> {
        let path = self.dir.join(Self::PRICES_FILE);
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("Could not create {}", path.display()))?;
        for record in history.get_records() {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(path)
    }

    // One row per period, one column per participant
    fn write_values(&self, participants: &[&Participant]) -> Result<PathBuf> {
        let path = self.dir.join(Self::VALUES_FILE);
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("Could not create {}", path.display()))?;

        let mut header = vec!["period".to_string()];
        header.extend(participants.iter().map(|p| p.get_name().to_string()));
        wtr.write_record(&header)?;

        let periods = participants
            .iter()
            .map(|p| p.get_values().len())
            .max()
            .unwrap_or(0);
        for period in 0..periods {
            let mut row = vec![period.to_string()];
            for participant in participants {
                let cell = participant
                    .get_values()
                    .get(period)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                row.push(cell);
            }
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(path)
    }

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ChartSink for CsvChartWriter {
    fn render(&mut self, history: &PriceHistory, participants: &[&Participant]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Could not create {}", self.dir.display()))?;
        let prices = self.write_prices(history)?;
        let values = self.write_values(participants)?;
        log::info!(
            "Wrote charts to {} and {}",
            prices.display(),
            values.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{ChartSink, CsvChartWriter};
    use crate::input::{PriceHistory, PriceSnapshotBuilder};
    use crate::portfolio::{Allocation, Participant};
    use crate::universe::Universe;

    #[test]
    fn test_that_both_files_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let universe = Universe::from_names(vec!["ABC", "BCD"]);

        let mut history = PriceHistory::new();
        let mut builder = PriceSnapshotBuilder::new(0);
        builder.add_price("ABC", 100.0).add_price("BCD", 50.0);
        history.append_snapshot(&builder.build(), &universe);

        let mut user = Participant::new("User", Allocation::validate(vec![100.0, 0.0]).unwrap(), 0.0);
        user.record(5.0);
        let bot = Participant::new("AI 1", Allocation::validate(vec![50.0, 50.0]).unwrap(), 0.0);

        let mut writer = CsvChartWriter::new(dir.path().join("charts"));
        writer.render(&history, &[&user, &bot]).unwrap();

        let prices = fs::read_to_string(writer.get_dir().join(CsvChartWriter::PRICES_FILE)).unwrap();
        assert!(prices.starts_with("instrument,period,price"));
        assert!(prices.contains("BCD,0,50.0"));

        let values = fs::read_to_string(writer.get_dir().join(CsvChartWriter::VALUES_FILE)).unwrap();
        let lines: Vec<&str> = values.lines().collect();
        assert_eq!(lines[0], "period,User,AI 1");
        assert_eq!(lines[1], "0,0,0");
        assert_eq!(lines[2], "1,5,");
    }
}
