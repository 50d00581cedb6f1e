use serde::{Deserialize, Serialize};

/// A tradable name and the symbol used to look it up in the quote source.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Instrument {
    pub name: String,
    pub symbol: String,
}

/// The instruments traded in a run. Order is fixed when the universe is built and every
/// allocation, snapshot and history record is aligned to it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Universe {
    instruments: Vec<Instrument>,
}

impl Universe {
    pub fn get_instruments(&self) -> &Vec<Instrument> {
        &self.instruments
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instruments.iter().map(|i| i.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.instruments.iter().position(|i| i.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Builds a universe from (name, symbol) pairs. Names must be unique, later duplicates are
    /// dropped.
    pub fn new(instruments: Vec<(&str, &str)>) -> Self {
        let mut res: Vec<Instrument> = Vec::with_capacity(instruments.len());
        for (name, symbol) in instruments {
            if res.iter().any(|i| i.name == name) {
                log::warn!("Dropping duplicate instrument {}", name);
                continue;
            }
            res.push(Instrument {
                name: name.to_string(),
                symbol: symbol.to_string(),
            });
        }
        Self { instruments: res }
    }

    /// Universe where each name doubles as its symbol, used where no quote source is involved.
    pub fn from_names(names: Vec<&str>) -> Self {
        Self::new(names.into_iter().map(|n| (n, n)).collect())
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new(vec![
            ("Nvidia", "NVDA"),
            ("Meta", "META"),
            ("Microsoft", "MSFT"),
            ("Alphabet", "GOOGL"),
            ("AMD", "AMD"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::Universe;

    #[test]
    fn test_that_default_universe_keeps_insertion_order() {
        let universe = Universe::default();
        let names: Vec<&str> = universe.names().collect();
        assert_eq!(names, vec!["Nvidia", "Meta", "Microsoft", "Alphabet", "AMD"]);
        assert_eq!(universe.get_instruments()[3].symbol, "GOOGL");
    }

    #[test]
    fn test_that_duplicate_names_are_dropped() {
        let universe = Universe::new(vec![("A", "AAA"), ("B", "BBB"), ("A", "ZZZ")]);
        assert_eq!(universe.len(), 2);
        assert_eq!(universe.get_instruments()[0].symbol, "AAA");
        assert_eq!(universe.position("B"), Some(1));
        assert!(!universe.contains("C"));
    }
}
