//! EMA-cross / RSI-filtered strategy simulator.
//!
//! Single-symbol, single-position long-only simulation over a candle
//! sequence: enter on a fast/slow EMA crossover with RSI above the oversold
//! threshold, exit on a crossunder or an overbought RSI, one unit per
//! trade, no pyramiding. Equity starts at 1.0 and compounds per trade;
//! Sharpe annualizes over 252 periods.

use serde::Serialize;

use crate::domain::candle::Candle;
use crate::domain::error::ChartlabError;
use crate::domain::indicator::{ema, rsi};

const PERIODS_PER_YEAR: f64 = 252.0;
const SECONDS_PER_YEAR: f64 = 60.0 * 60.0 * 24.0 * 365.0;

#[derive(Debug, Clone)]
pub struct BacktestParams {
    pub fast: usize,
    pub slow: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub commission: f64,
    pub slippage: f64,
}

impl Default for BacktestParams {
    fn default() -> Self {
        BacktestParams {
            fast: 12,
            slow: 26,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            commission: 0.0,
            slippage: 0.0,
        }
    }
}

/// One round trip produced by the simulator: exactly one entry and one exit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedTrade {
    pub entry_ts: i64,
    pub exit_ts: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub pnl: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestSummary {
    pub trades: Vec<SimulatedTrade>,
    pub winrate: f64,
    pub cagr: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    pub profit_factor: f64,
    pub total_return: f64,
}

impl BacktestSummary {
    fn empty() -> Self {
        BacktestSummary {
            trades: Vec::new(),
            winrate: 0.0,
            cagr: 0.0,
            sharpe: 0.0,
            max_drawdown: 0.0,
            profit_factor: 0.0,
            total_return: 0.0,
        }
    }
}

pub fn run_backtest(
    candles: &[Candle],
    params: &BacktestParams,
) -> Result<BacktestSummary, ChartlabError> {
    for period in [params.fast, params.slow, params.rsi_period] {
        if period == 0 {
            return Err(ChartlabError::InvalidPeriod { period });
        }
    }
    if params.fast >= params.slow {
        return Err(ChartlabError::FastSlowOrder {
            fast: params.fast,
            slow: params.slow,
        });
    }

    if candles.is_empty() {
        return Ok(BacktestSummary::empty());
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let ema_fast = ema(&closes, params.fast)?;
    let ema_slow = ema(&closes, params.slow)?;
    let rsi_series = rsi(&closes, params.rsi_period)?;

    let mut trades: Vec<SimulatedTrade> = Vec::new();
    let mut position_qty = 0.0;
    let mut entry_price = 0.0;
    let mut entry_ts = 0i64;
    let mut equity = 1.0;
    let mut peak_equity = 1.0_f64;
    let mut max_drawdown = 0.0_f64;
    let mut returns = Vec::with_capacity(candles.len());

    for (i, bar) in candles.iter().enumerate() {
        let fast = ema_fast[i];
        let slow = ema_slow[i];
        let rsi_value = rsi_series[i];

        // Warm-up bars record a flat return and carry no signal.
        if fast.is_nan() || slow.is_nan() || rsi_value.is_nan() {
            returns.push(0.0);
            continue;
        }

        let crossover = i > 0 && fast > slow && ema_fast[i - 1] <= ema_slow[i - 1];
        let crossunder = i > 0 && fast < slow && ema_fast[i - 1] >= ema_slow[i - 1];

        if position_qty == 0.0 && crossover && rsi_value > params.rsi_oversold {
            position_qty = 1.0;
            entry_price = bar.close * (1.0 + params.slippage) + params.commission;
            entry_ts = bar.ts;
        } else if position_qty != 0.0 && (crossunder || rsi_value > params.rsi_overbought) {
            let exit_price = bar.close * (1.0 - params.slippage) - params.commission;
            let pnl = (exit_price - entry_price) * position_qty;
            equity *= 1.0 + pnl / entry_price;
            trades.push(SimulatedTrade {
                entry_ts,
                exit_ts: bar.ts,
                entry_price,
                exit_price,
                quantity: position_qty,
                pnl,
            });
            position_qty = 0.0;
            entry_price = 0.0;
        }

        peak_equity = peak_equity.max(equity);
        max_drawdown = max_drawdown.max((peak_equity - equity) / peak_equity);
        returns.push(equity - 1.0);
    }

    let wins = trades.iter().filter(|t| t.pnl > 0.0).count();
    let losses = trades.iter().filter(|t| t.pnl < 0.0).count();
    let total_return = equity - 1.0;
    let winrate = if trades.is_empty() {
        0.0
    } else {
        wins as f64 / trades.len() as f64
    };

    let profit_factor = if losses == 0 {
        f64::INFINITY
    } else {
        let gross_win: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
        let gross_loss: f64 = trades.iter().filter(|t| t.pnl < 0.0).map(|t| t.pnl).sum();
        (gross_win / gross_loss).abs()
    };

    let n = returns.len().max(1) as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let sharpe = if std_dev == 0.0 {
        0.0
    } else {
        (mean * PERIODS_PER_YEAR) / (std_dev * PERIODS_PER_YEAR.sqrt())
    };

    let years = (candles[candles.len() - 1].ts - candles[0].ts) as f64 / SECONDS_PER_YEAR;
    let cagr = if years <= 0.0 {
        total_return
    } else {
        (1.0 + total_return).powf(1.0 / years) - 1.0
    };

    Ok(BacktestSummary {
        trades,
        winrate,
        cagr,
        sharpe,
        max_drawdown,
        profit_factor,
        total_return,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;

    fn make_candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                ts: i as i64 * DAY,
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    fn fast_params() -> BacktestParams {
        BacktestParams {
            fast: 2,
            slow: 4,
            rsi_period: 2,
            rsi_overbought: 101.0,
            rsi_oversold: -1.0,
            commission: 0.0,
            slippage: 0.0,
        }
    }

    /// Dip then rally then dip: forces a crossover followed by a crossunder.
    fn v_shape() -> Vec<Candle> {
        make_candles(&[
            100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 95.0, 100.0, 105.0, 110.0, 115.0, 110.0, 100.0,
            90.0, 80.0, 70.0,
        ])
    }

    #[test]
    fn backtest_zero_period_fails() {
        let params = BacktestParams {
            rsi_period: 0,
            ..fast_params()
        };
        let err = run_backtest(&v_shape(), &params).unwrap_err();
        assert!(matches!(err, ChartlabError::InvalidPeriod { period: 0 }));
    }

    #[test]
    fn backtest_fast_must_be_below_slow() {
        let params = BacktestParams {
            fast: 4,
            slow: 4,
            ..fast_params()
        };
        let err = run_backtest(&v_shape(), &params).unwrap_err();
        assert!(matches!(err, ChartlabError::FastSlowOrder { fast: 4, slow: 4 }));
    }

    #[test]
    fn backtest_empty_candles_is_zero_summary() {
        let summary = run_backtest(&[], &fast_params()).unwrap();
        assert!(summary.trades.is_empty());
        assert_eq!(summary.winrate, 0.0);
        assert_eq!(summary.cagr, 0.0);
        assert_eq!(summary.sharpe, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
        assert_eq!(summary.profit_factor, 0.0);
        assert_eq!(summary.total_return, 0.0);
    }

    #[test]
    fn backtest_flat_series_has_no_trades() {
        let summary = run_backtest(&make_candles(&[100.0; 40]), &fast_params()).unwrap();
        assert!(summary.trades.is_empty());
        assert_eq!(summary.total_return, 0.0);
        assert_eq!(summary.sharpe, 0.0);
    }

    #[test]
    fn backtest_v_shape_produces_round_trip() {
        let summary = run_backtest(&v_shape(), &fast_params()).unwrap();

        assert_eq!(summary.trades.len(), 1);
        let trade = &summary.trades[0];
        assert!(trade.exit_ts > trade.entry_ts);
        assert!((trade.quantity - 1.0).abs() < f64::EPSILON);
        assert!(trade.pnl > 0.0, "rally trade should win: {}", trade.pnl);
        assert!((summary.winrate - 1.0).abs() < f64::EPSILON);
        assert!(summary.profit_factor.is_infinite());
        assert!(summary.total_return > 0.0);
    }

    #[test]
    fn backtest_equity_compounds_per_trade() {
        let summary = run_backtest(&v_shape(), &fast_params()).unwrap();
        let trade = &summary.trades[0];
        let expected = (1.0 + trade.pnl / trade.entry_price) - 1.0;
        assert!((summary.total_return - expected).abs() < 1e-12);
    }

    #[test]
    fn backtest_commission_and_slippage_widen_entry_and_exit() {
        let params = BacktestParams {
            commission: 0.5,
            slippage: 0.01,
            ..fast_params()
        };
        let no_cost = run_backtest(&v_shape(), &fast_params()).unwrap();
        let with_cost = run_backtest(&v_shape(), &params).unwrap();

        assert_eq!(no_cost.trades.len(), with_cost.trades.len());
        let (a, b) = (&no_cost.trades[0], &with_cost.trades[0]);
        assert!(b.entry_price > a.entry_price);
        assert!(b.exit_price < a.exit_price);
        assert!(b.pnl < a.pnl);
    }

    #[test]
    fn backtest_oversold_filter_blocks_entry() {
        // Threshold above 100 makes rsi > oversold impossible.
        let params = BacktestParams {
            rsi_oversold: 150.0,
            ..fast_params()
        };
        let summary = run_backtest(&v_shape(), &params).unwrap();
        assert!(summary.trades.is_empty());
    }

    #[test]
    fn backtest_overbought_exit_fires_without_crossunder() {
        // Exit as soon as RSI exceeds 60, long before the EMA crossunder.
        let params = BacktestParams {
            rsi_overbought: 60.0,
            ..fast_params()
        };
        let baseline = run_backtest(&v_shape(), &fast_params()).unwrap();
        let early_exit = run_backtest(&v_shape(), &params).unwrap();

        assert_eq!(early_exit.trades.len(), 1);
        assert!(early_exit.trades[0].exit_ts < baseline.trades[0].exit_ts);
    }

    #[test]
    fn backtest_max_drawdown_nonnegative_and_bounded() {
        let summary = run_backtest(&v_shape(), &fast_params()).unwrap();
        assert!(summary.max_drawdown >= 0.0);
        assert!(summary.max_drawdown <= 1.0);
    }

    #[test]
    fn backtest_cagr_equals_total_return_for_zero_span() {
        // All candles share one timestamp: elapsed years is zero.
        let mut candles = v_shape();
        for c in &mut candles {
            c.ts = 0;
        }
        let summary = run_backtest(&candles, &fast_params()).unwrap();
        assert!((summary.cagr - summary.total_return).abs() < 1e-12);
    }

    #[test]
    fn backtest_returns_series_annualizes_sharpe() {
        let summary = run_backtest(&v_shape(), &fast_params()).unwrap();
        // One winning trade and no losers: mean return positive.
        assert!(summary.sharpe > 0.0);
    }
}
