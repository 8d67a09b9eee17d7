//! Supertrend indicator: ATR bands with a flip state machine.
//!
//! Bands are seeded at the first index with a defined ATR as
//! hl2 ± multiplier * ATR, direction up, trend = lower band. On each later
//! bar the direction is re-evaluated against the band the trend last sat
//! on, then the band on the active side ratchets monotonically:
//! up keeps upper = min(candidate, previous), down keeps
//! lower = max(candidate, previous); the other band is replaced outright.
//! The ratchet is what stops the active band retreating against the trend.

use crate::domain::candle::Candle;
use crate::domain::error::ChartlabError;
use crate::domain::indicator_helpers::calc_atr;

pub const DEFAULT_PERIOD: usize = 10;
pub const DEFAULT_MULTIPLIER: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    /// +1 for up, -1 for down.
    pub fn value(self) -> i8 {
        match self {
            TrendDirection::Up => 1,
            TrendDirection::Down => -1,
        }
    }
}

/// Two same-length sequences positionally aligned to the input bars:
/// the active band level and the trend direction.
#[derive(Debug, Clone)]
pub struct SupertrendOutput {
    pub trend: Vec<f64>,
    pub direction: Vec<TrendDirection>,
}

pub fn supertrend(
    bars: &[Candle],
    period: usize,
    multiplier: f64,
) -> Result<SupertrendOutput, ChartlabError> {
    if period == 0 {
        return Err(ChartlabError::InvalidPeriod { period });
    }

    let atr = calc_atr(bars, period);
    let mut trend = vec![f64::NAN; bars.len()];
    let mut direction = vec![TrendDirection::Up; bars.len()];
    let mut upper_band = f64::NAN;
    let mut lower_band = f64::NAN;

    for (i, bar) in bars.iter().enumerate() {
        let atr_value = atr[i];
        if atr_value.is_nan() {
            continue;
        }

        let hl2 = bar.hl2();
        let upper_candidate = hl2 + multiplier * atr_value;
        let lower_candidate = hl2 - multiplier * atr_value;

        if i + 1 == period {
            upper_band = upper_candidate;
            lower_band = lower_candidate;
            direction[i] = TrendDirection::Up;
            trend[i] = lower_band;
            continue;
        }

        // The previous trend level sat on exactly one of the two bands;
        // which one decides how the flip test reads this bar's close.
        direction[i] = if trend[i - 1] == upper_band {
            if bar.close > upper_band {
                TrendDirection::Up
            } else {
                TrendDirection::Down
            }
        } else if bar.close < lower_band {
            TrendDirection::Down
        } else {
            TrendDirection::Up
        };

        match direction[i] {
            TrendDirection::Up => {
                upper_band = upper_candidate.min(upper_band);
                lower_band = lower_candidate;
                trend[i] = lower_band;
            }
            TrendDirection::Down => {
                upper_band = upper_candidate;
                lower_band = lower_candidate.max(lower_band);
                trend[i] = upper_band;
            }
        }
    }

    Ok(SupertrendOutput { trend, direction })
}

pub fn supertrend_default(bars: &[Candle]) -> Result<SupertrendOutput, ChartlabError> {
    supertrend(bars, DEFAULT_PERIOD, DEFAULT_MULTIPLIER)
}
