use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::input::{PriceSnapshot, PriceSnapshotBuilder};
use crate::universe::Universe;

/// Anything that can return the most recent close for an external symbol.
pub trait QuoteSource {
    fn latest_close(&self, symbol: &str) -> Result<f64, SourceError>;
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum PriceOrigin {
    Live,
    Mock,
}

/// Period 0 prices plus where each one came from.
#[derive(Clone, Debug)]
pub struct InitialPrices {
    pub snapshot: PriceSnapshot,
    pub origins: Vec<(String, PriceOrigin)>,
}

impl InitialPrices {
    pub fn mocked(&self) -> Vec<&str> {
        self.origins
            .iter()
            .filter(|(_, origin)| *origin == PriceOrigin::Mock)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

pub const MOCK_PRICE_LOW: f64 = 100.0;
pub const MOCK_PRICE_HIGH: f64 = 500.0;

/// Queries the source once per instrument. Any instrument the source cannot price gets a mock
/// price drawn uniformly between `MOCK_PRICE_LOW` and `MOCK_PRICE_HIGH` so the snapshot always
/// covers the whole universe.
pub fn fetch_initial_snapshot(
    universe: &Universe,
    source: &impl QuoteSource,
    rng: &mut impl Rng,
) -> InitialPrices {
    let mock_dist = Uniform::new(MOCK_PRICE_LOW, MOCK_PRICE_HIGH);

    let mut builder = PriceSnapshotBuilder::new(0);
    let mut origins = Vec::with_capacity(universe.len());
    for instrument in universe.get_instruments() {
        let fetched = source.latest_close(&instrument.symbol).and_then(|price| {
            if price.is_finite() && price > 0.0 {
                Ok(price)
            } else {
                Err(SourceError::InvalidPrice {
                    symbol: instrument.symbol.clone(),
                    price,
                })
            }
        });

        match fetched {
            Ok(price) => {
                builder.add_price(instrument.name.as_str(), price);
                origins.push((instrument.name.clone(), PriceOrigin::Live));
            }
            Err(e) => {
                let price = mock_dist.sample(rng);
                log::warn!(
                    "Error fetching {} ({}): {}, using mock price {:.2}",
                    instrument.name,
                    instrument.symbol,
                    e,
                    price
                );
                builder.add_price(instrument.name.as_str(), price);
                origins.push((instrument.name.clone(), PriceOrigin::Mock));
            }
        }
    }

    InitialPrices {
        snapshot: builder.build(),
        origins,
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    indicators: Option<ChartIndicators>,
}

impl ChartResult {
    // Last non-empty close of the day series, the market price when the series is empty.
    fn last_close(&self) -> Option<f64> {
        let from_series = self
            .indicators
            .as_ref()
            .and_then(|i| i.quote.first())
            .and_then(|q| q.close.as_ref())
            .and_then(|closes| closes.iter().rev().flatten().next().copied());
        from_series.or(self.meta.regular_market_price)
    }
}

/// Pulls the latest daily close from the Yahoo Finance chart endpoint.
pub struct YahooQuoteSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooQuoteSource {
    const DEFAULT_URL: &'static str = "https://query1.finance.yahoo.com/v8/finance/chart";
    const USER_AGENT: &'static str = "Mozilla/5.0 (X11; Linux x86_64) agora-trading-game";

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SourceError::Request {
                symbol: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn new() -> Result<Self, SourceError> {
        Self::with_base_url(Self::DEFAULT_URL)
    }
}

impl QuoteSource for YahooQuoteSource {
    fn latest_close(&self, symbol: &str) -> Result<f64, SourceError> {
        let url = format!("{}/{}", self.base_url, symbol);
        let request_error = |e: reqwest::Error| SourceError::Request {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        };

        let resp = self
            .client
            .get(url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(request_error)?;
        let body: ChartResponse = resp.json().map_err(request_error)?;

        body.chart
            .result
            .as_ref()
            .and_then(|results| results.first())
            .and_then(|result| result.last_close())
            .ok_or_else(|| SourceError::MissingPrice {
                symbol: symbol.to_string(),
            })
    }
}

/// Source that never answers, every instrument falls back to a mock price.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineQuoteSource;

impl QuoteSource for OfflineQuoteSource {
    fn latest_close(&self, _symbol: &str) -> Result<f64, SourceError> {
        Err(SourceError::Offline)
    }
}

/// Source backed by a fixed symbol to price map. Unknown symbols fail.
#[derive(Clone, Debug, Default)]
pub struct FixedQuoteSource {
    prices: HashMap<String, f64>,
}

impl FixedQuoteSource {
    pub fn add_price(&mut self, symbol: impl Into<String>, price: f64) -> &mut Self {
        self.prices.insert(symbol.into(), price);
        self
    }

    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }
}

impl QuoteSource for FixedQuoteSource {
    fn latest_close(&self, symbol: &str) -> Result<f64, SourceError> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| SourceError::MissingPrice {
                symbol: symbol.to_string(),
            })
    }
}
