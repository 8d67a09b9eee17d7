//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Purely compositional over [`ema`]; inherits its seeded-at-first-value
//! convention, so every index carries a defined value.
//! Default parameters: fast=12, slow=26, signal=9.

use crate::domain::error::ChartlabError;
use crate::domain::indicator::ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

/// Three same-length series, positionally aligned to the input closes.
#[derive(Debug, Clone)]
pub struct MacdOutput {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdOutput, ChartlabError> {
    for period in [fast, slow, signal_period] {
        if period == 0 {
            return Err(ChartlabError::InvalidPeriod { period });
        }
    }
    if fast >= slow {
        return Err(ChartlabError::FastSlowOrder { fast, slow });
    }

    let fast_ema = ema(closes, fast)?;
    let slow_ema = ema(closes, slow)?;

    let macd_line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal_period)?;
    let hist: Vec<f64> = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    Ok(MacdOutput {
        macd: macd_line,
        signal: signal_line,
        hist,
    })
}

pub fn macd_default(closes: &[f64]) -> Result<MacdOutput, ChartlabError> {
    macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
