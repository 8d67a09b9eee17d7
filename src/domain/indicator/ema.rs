//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1); seeded at the first sample (EMA[0] = C[0]), then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). There is no warm-up suppression:
//! every index carries a defined (early on, biased) value. MACD depends on
//! numerical parity with this seeding convention.
//!
//! NaN inputs propagate NaN at their own index and leave the running state
//! untouched; the last valid value carries forward.

use crate::domain::error::ChartlabError;

pub fn ema(series: &[f64], period: usize) -> Result<Vec<f64>, ChartlabError> {
    if period == 0 {
        return Err(ChartlabError::InvalidPeriod { period });
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(series.len());
    let mut previous: Option<f64> = None;

    for &value in series {
        if value.is_nan() {
            result.push(f64::NAN);
            continue;
        }
        let next = match previous {
            None => value,
            Some(prev) => value * k + prev * (1.0 - k),
        };
        previous = Some(next);
        result.push(next);
    }

    Ok(result)
}
