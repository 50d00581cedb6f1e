use derive_more::{Display, Error};

/// Failures inside the simulation loop. Any of these ends the current run.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum SimulationError {
    #[display("start price {price} for {instrument} is not positive, cannot compute return")]
    DegeneratePrice { instrument: String, price: f64 },
    #[display("snapshot for period {period} has no price for {instrument}")]
    InstrumentMismatch { instrument: String, period: usize },
    #[display("snapshot for period {period} does not match the instruments of the run")]
    UnexpectedInstruments { period: usize },
    #[display("allocation has {actual} entries but the run has {expected} instruments")]
    AllocationLength { expected: usize, actual: usize },
    #[display("value of {participant} is no longer finite")]
    NonFiniteValue { participant: String },
    #[display("simulation cannot be built without {missing}")]
    Incomplete { missing: &'static str },
}

/// Rejections raised while collecting a human allocation. None of these mutate the allocation
/// being built, the caller re-prompts for the same entry.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum AllocationError {
    #[display("'{input}' is not a number")]
    NotNumeric { input: String },
    #[display("allocation must be a finite number")]
    NonFinite,
    #[display("total allocation {total} exceeds the allowed leverage of {cap}%")]
    LeverageExceeded { total: f64, cap: f64 },
    #[display("allocation already has an entry for every instrument")]
    Complete,
    #[display("allocation has {actual} of {expected} entries")]
    Incomplete { expected: usize, actual: usize },
}

/// Failures of the live quote collaborator. These are recovered by substituting mock prices.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum SourceError {
    #[display("request for {symbol} failed: {reason}")]
    Request { symbol: String, reason: String },
    #[display("no price returned for {symbol}")]
    MissingPrice { symbol: String },
    #[display("price {price} returned for {symbol} is not usable")]
    InvalidPrice { symbol: String, price: f64 },
    #[display("quote source is offline")]
    Offline,
}
