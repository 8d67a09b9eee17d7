//! Technical indicator implementations.
//!
//! Every indicator maps a candle or price sequence to one or more `Vec<f64>`
//! of the same length, positionally aligned to its input. Warm-up indices
//! where not enough history exists carry `f64::NAN`; callers check for the
//! sentinel rather than for an error.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod supertrend;
pub mod vwap;

pub use ema::ema;
pub use macd::{macd, macd_default, MacdOutput};
pub use rsi::rsi;
pub use supertrend::{supertrend, supertrend_default, SupertrendOutput, TrendDirection};
pub use vwap::vwap_anchored;
