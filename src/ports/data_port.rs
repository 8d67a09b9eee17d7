//! Data access port trait.
//!
//! The engine never fetches data itself; a collaborator materializes a
//! complete, time-ordered sequence per call and hands it over.

use crate::domain::candle::Candle;
use crate::domain::error::ChartlabError;
use crate::domain::position::LedgerTrade;

pub trait DataPort {
    /// A complete candle sequence, sorted ascending by `ts`.
    fn fetch_candles(&self) -> Result<Vec<Candle>, ChartlabError>;

    /// A complete trade ledger, sorted ascending by `ts`.
    fn fetch_trades(&self) -> Result<Vec<LedgerTrade>, ChartlabError>;
}
