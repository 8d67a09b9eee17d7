#![allow(dead_code)]

use chartlab::domain::candle::Candle;
use chartlab::domain::error::ChartlabError;
use chartlab::domain::position::{LedgerTrade, Side};
use chartlab::ports::data_port::DataPort;

pub const DAY: i64 = 86_400;

/// In-memory data source for pipeline tests; optionally fails on demand.
pub struct MockDataPort {
    pub candles: Vec<Candle>,
    pub trades: Vec<LedgerTrade>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            candles: Vec::new(),
            trades: Vec::new(),
            error: None,
        }
    }

    pub fn with_candles(mut self, candles: Vec<Candle>) -> Self {
        self.candles = candles;
        self
    }

    pub fn with_trades(mut self, trades: Vec<LedgerTrade>) -> Self {
        self.trades = trades;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_candles(&self) -> Result<Vec<Candle>, ChartlabError> {
        if let Some(reason) = &self.error {
            return Err(ChartlabError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.candles.clone())
    }

    fn fetch_trades(&self) -> Result<Vec<LedgerTrade>, ChartlabError> {
        if let Some(reason) = &self.error {
            return Err(ChartlabError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.trades.clone())
    }
}

pub fn make_candle(ts: i64, close: f64) -> Candle {
    Candle {
        ts,
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_candle(i as i64 * DAY, close))
        .collect()
}

pub fn make_trade(ts: i64, side: Side, quantity: f64, price: f64, fees: f64) -> LedgerTrade {
    LedgerTrade {
        side,
        quantity,
        price,
        ts,
        fees,
    }
}

/// Dip then rally then dip: forces one EMA crossover and one crossunder
/// with fast=2 / slow=4.
pub fn v_shape_closes() -> Vec<f64> {
    vec![
        100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 95.0, 100.0, 105.0, 110.0, 115.0, 110.0, 100.0, 90.0,
        80.0, 70.0,
    ]
}
