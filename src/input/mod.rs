use serde::{Deserialize, Serialize};

use crate::universe::Universe;

/// Prices for every instrument at one period. Prices are held in the order they were added, which
/// is the universe order for snapshots produced by this crate.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PriceSnapshot {
    period: usize,
    prices: Vec<(String, f64)>,
}

impl PriceSnapshot {
    pub fn get_period(&self) -> usize {
        self.period
    }

    pub fn get_price(&self, instrument: &str) -> Option<f64> {
        self.prices
            .iter()
            .find(|(name, _)| name == instrument)
            .map(|(_, price)| *price)
    }

    pub fn get_prices(&self) -> &Vec<(String, f64)> {
        &self.prices
    }

    /// True when the snapshot holds exactly the instruments of the universe, no more, no less.
    pub fn covers(&self, universe: &Universe) -> bool {
        self.prices.len() == universe.len()
            && universe.names().all(|name| self.get_price(name).is_some())
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

pub struct PriceSnapshotBuilder {
    period: usize,
    prices: Vec<(String, f64)>,
}

impl PriceSnapshotBuilder {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            prices: Vec::new(),
        }
    }

    /// Adding the same instrument twice overwrites the earlier price.
    pub fn add_price(&mut self, instrument: impl Into<String>, price: f64) -> &mut Self {
        let instrument = instrument.into();
        if let Some(existing) = self.prices.iter_mut().find(|(name, _)| *name == instrument) {
            existing.1 = price;
        } else {
            self.prices.push((instrument, price));
        }
        self
    }

    pub fn build(&mut self) -> PriceSnapshot {
        PriceSnapshot {
            period: self.period,
            prices: std::mem::take(&mut self.prices),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PriceRecord {
    pub instrument: String,
    pub period: usize,
    pub price: f64,
}

/// Append-only log of every price seen during a run, handed to the chart collaborator at the end.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PriceHistory {
    records: Vec<PriceRecord>,
}

impl PriceHistory {
    /// Appends one record per instrument, in universe order.
    pub fn append_snapshot(&mut self, snapshot: &PriceSnapshot, universe: &Universe) {
        for name in universe.names() {
            if let Some(price) = snapshot.get_price(name) {
                self.records.push(PriceRecord {
                    instrument: name.to_string(),
                    period: snapshot.get_period(),
                    price,
                });
            }
        }
    }

    pub fn get_records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// (period, price) pairs for one instrument in the order they were appended.
    pub fn series(&self, instrument: &str) -> Vec<(usize, f64)> {
        self.records
            .iter()
            .filter(|r| r.instrument == instrument)
            .map(|r| (r.period, r.price))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PriceHistory, PriceSnapshotBuilder};
    use crate::universe::Universe;

    #[test]
    fn test_that_snapshot_covers_only_matching_universe() {
        let universe = Universe::from_names(vec!["ABC", "BCD"]);

        let mut builder = PriceSnapshotBuilder::new(0);
        builder.add_price("ABC", 100.0).add_price("BCD", 10.0);
        let snapshot = builder.build();
        assert!(snapshot.covers(&universe));

        let mut builder = PriceSnapshotBuilder::new(0);
        builder.add_price("ABC", 100.0);
        assert!(!builder.build().covers(&universe));

        let mut builder = PriceSnapshotBuilder::new(0);
        builder
            .add_price("ABC", 100.0)
            .add_price("BCD", 10.0)
            .add_price("CDE", 1.0);
        assert!(!builder.build().covers(&universe));
    }

    #[test]
    fn test_that_repeated_price_overwrites() {
        let mut builder = PriceSnapshotBuilder::new(3);
        builder.add_price("ABC", 100.0).add_price("ABC", 101.0);
        let snapshot = builder.build();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get_price("ABC"), Some(101.0));
        assert_eq!(snapshot.get_period(), 3);
    }

    #[test]
    fn test_that_history_appends_in_universe_order() {
        let universe = Universe::from_names(vec!["ABC", "BCD"]);
        let mut history = PriceHistory::new();

        let mut builder = PriceSnapshotBuilder::new(0);
        builder.add_price("BCD", 10.0).add_price("ABC", 100.0);
        history.append_snapshot(&builder.build(), &universe);

        let mut builder = PriceSnapshotBuilder::new(1);
        builder.add_price("ABC", 101.0).add_price("BCD", 11.0);
        history.append_snapshot(&builder.build(), &universe);

        assert_eq!(history.len(), 4);
        assert_eq!(history.get_records()[0].instrument, "ABC");
        assert_eq!(history.series("BCD"), vec![(0, 10.0), (1, 11.0)]);
    }
}
