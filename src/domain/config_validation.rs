//! Configuration validation.
//!
//! Validates the [backtest] section before a simulation runs, so parameter
//! errors surface as client-facing config errors rather than deep in the
//! engine.

use crate::domain::error::ChartlabError;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), ChartlabError> {
    validate_periods(config)?;
    validate_rsi_thresholds(config)?;
    validate_costs(config)?;
    Ok(())
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), ChartlabError> {
    let fast = config.get_int("backtest", "fast", 12);
    let slow = config.get_int("backtest", "slow", 26);
    let rsi_period = config.get_int("backtest", "rsi_period", 14);

    for (key, value) in [("fast", fast), ("slow", slow), ("rsi_period", rsi_period)] {
        if value <= 0 {
            return Err(ChartlabError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("{} must be positive", key),
            });
        }
    }

    if fast >= slow {
        return Err(ChartlabError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "fast".to_string(),
            reason: "fast must be less than slow".to_string(),
        });
    }
    Ok(())
}

fn validate_rsi_thresholds(config: &dyn ConfigPort) -> Result<(), ChartlabError> {
    let overbought = config.get_double("backtest", "rsi_overbought", 70.0);
    let oversold = config.get_double("backtest", "rsi_oversold", 30.0);

    for (key, value) in [("rsi_overbought", overbought), ("rsi_oversold", oversold)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(ChartlabError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("{} must be between 0 and 100", key),
            });
        }
    }
    Ok(())
}

fn validate_costs(config: &dyn ConfigPort) -> Result<(), ChartlabError> {
    for key in ["commission", "slippage"] {
        let value = config.get_double("backtest", key, 0.0);
        if value < 0.0 {
            return Err(ChartlabError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("{} must be non-negative", key),
            });
        }
    }
    Ok(())
}
