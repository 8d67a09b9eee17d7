//! Core domain types and logic.

pub mod backtest;
pub mod candle;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod indicator_helpers;
pub mod position;
