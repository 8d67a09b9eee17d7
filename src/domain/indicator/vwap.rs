//! Anchored VWAP (volume-weighted average price) indicator.
//!
//! From the anchor index onward: cumulative typical price × volume over
//! cumulative volume. Indices before the anchor are NaN, as is any index
//! where the cumulative volume is still zero.

use crate::domain::candle::Candle;
use crate::domain::error::ChartlabError;

pub fn vwap_anchored(bars: &[Candle], anchor_index: usize) -> Result<Vec<f64>, ChartlabError> {
    if anchor_index >= bars.len() {
        return Err(ChartlabError::AnchorOutOfRange {
            index: anchor_index,
            len: bars.len(),
        });
    }

    let mut result = vec![f64::NAN; bars.len()];
    let mut cumulative_volume = 0.0;
    let mut cumulative_tp_volume = 0.0;

    for (i, bar) in bars.iter().enumerate().skip(anchor_index) {
        cumulative_volume += bar.volume;
        cumulative_tp_volume += bar.typical_price() * bar.volume;
        result[i] = if cumulative_volume == 0.0 {
            f64::NAN
        } else {
            cumulative_tp_volume / cumulative_volume
        };
    }

    Ok(result)
}
