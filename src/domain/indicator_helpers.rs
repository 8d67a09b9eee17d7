//! Shared helper functions for indicator calculations.

use crate::domain::candle::Candle;

/// Average True Range via Wilder smoothing, positionally aligned to `bars`.
///
/// True range at index 0 is high-low. NaN until index period-1, where the
/// seed is a simple mean of the first `period` true ranges; thereafter
/// atr = (prev_atr * (period-1) + tr) / period.
pub fn calc_atr(bars: &[Candle], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; bars.len()];
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        let tr = if i == 0 {
            bar.high - bar.low
        } else {
            bar.true_range(bars[i - 1].close)
        };

        if i < period {
            sum += tr;
            if i == period - 1 {
                result[i] = sum / period as f64;
            }
            continue;
        }

        result[i] = (result[i - 1] * (period as f64 - 1.0) + tr) / period as f64;
    }

    result
}
