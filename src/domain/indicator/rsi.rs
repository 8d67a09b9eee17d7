//! RSI (Relative Strength Index) indicator.
//!
//! Uses Wilder's smoothing for average gain/loss:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warm-up: indices < n are NaN (n price changes are needed for the first
//! average).

use crate::domain::error::ChartlabError;

pub const DEFAULT_PERIOD: usize = 14;

pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<f64>, ChartlabError> {
    if period == 0 {
        return Err(ChartlabError::InvalidPeriod { period });
    }

    let mut result = vec![f64::NAN; closes.len()];
    let mut gain = 0.0;
    let mut loss = 0.0;

    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];

        if i <= period {
            if change >= 0.0 {
                gain += change;
            } else {
                loss -= change;
            }
            if i == period {
                gain /= period as f64;
                loss /= period as f64;
                result[i] = rsi_from_averages(gain, loss);
            }
            continue;
        }

        gain = (gain * (period as f64 - 1.0) + change.max(0.0)) / period as f64;
        loss = (loss * (period as f64 - 1.0) + (-change).max(0.0)) / period as f64;
        result[i] = rsi_from_averages(gain, loss);
    }

    Ok(result)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_zero_period_fails() {
        let err = rsi(&[100.0, 101.0], 0).unwrap_err();
        assert!(matches!(err, ChartlabError::InvalidPeriod { period: 0 }));
    }

    #[test]
    fn rsi_empty_series() {
        let result = rsi(&[], 14).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn rsi_single_close() {
        let result = rsi(&[100.0], 14).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0].is_nan());
    }

    #[test]
    fn rsi_warmup_is_nan() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + (i % 5) as f64 * 2.0).collect();
        let result = rsi(&closes, 14).unwrap();

        assert_eq!(result.len(), 15);
        for (i, v) in result.iter().take(14).enumerate() {
            assert!(v.is_nan(), "index {} should be NaN", i);
        }
        assert!(!result[14].is_nan(), "index 14 should be defined");
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (0..16).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&closes, 14).unwrap();

        assert!((result[14] - 100.0).abs() < f64::EPSILON);
        assert!((result[15] - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let result = rsi(&closes, 14).unwrap();

        assert!((result[14] - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_in_range() {
        let closes: Vec<f64> = (1..=40)
            .map(|i| 100.0 + ((i % 7) as f64 - 3.0) * 2.0)
            .collect();
        let result = rsi(&closes, 14).unwrap();

        for v in result.iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(v), "RSI {} out of range", v);
        }
    }

    #[test]
    fn rsi_first_value_from_simple_averages() {
        // Changes over period 3: +2, -1, +4 → avg_gain = 2, avg_loss = 1/3
        let closes = [10.0, 12.0, 11.0, 15.0];
        let result = rsi(&closes, 3).unwrap();

        let avg_gain = (2.0 + 0.0 + 4.0) / 3.0;
        let avg_loss = (0.0 + 1.0 + 0.0) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((result[3] - expected).abs() < 1e-9);
    }

    #[test]
    fn rsi_wilder_smoothing_after_seed() {
        let closes = [10.0, 12.0, 11.0, 15.0, 14.0];
        let result = rsi(&closes, 3).unwrap();

        let seed_gain = 2.0;
        let seed_loss = 1.0 / 3.0;
        let gain = (seed_gain * 2.0 + 0.0) / 3.0;
        let loss = (seed_loss * 2.0 + 1.0) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + gain / loss);
        assert!((result[4] - expected).abs() < 1e-9);
    }

    #[test]
    fn rsi_flat_series_is_100() {
        // No losses at all, so the zero-loss convention applies.
        let result = rsi(&[100.0; 6], 3).unwrap();
        assert!((result[3] - 100.0).abs() < f64::EPSILON);
        assert!((result[5] - 100.0).abs() < f64::EPSILON);
    }
}
