//! CSV file data adapter.
//!
//! Candle files: `ts,open,high,low,close,volume` with `ts` either epoch
//! seconds or a YYYY-MM-DD date (midnight UTC). Ledger files:
//! `ts,side,quantity,price,fees` with side `buy`/`sell`. Rows are sorted
//! ascending by `ts` after load so downstream consumers get the ordering
//! they assume.

use crate::domain::candle::Candle;
use crate::domain::error::ChartlabError;
use crate::domain::position::{LedgerTrade, Side};
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> Result<String, ChartlabError> {
        fs::read_to_string(&self.path).map_err(|e| ChartlabError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })
    }
}

fn parse_ts(value: &str) -> Result<i64, ChartlabError> {
    if let Ok(ts) = value.parse::<i64>() {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc().timestamp())
        .map_err(|_| ChartlabError::Data {
            reason: format!("invalid ts {:?}: expected epoch seconds or YYYY-MM-DD", value),
        })
}

fn field<'a>(record: &'a csv::StringRecord, index: usize, name: &str) -> Result<&'a str, ChartlabError> {
    record.get(index).ok_or_else(|| ChartlabError::Data {
        reason: format!("missing {} column", name),
    })
}

fn parse_f64(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, ChartlabError> {
    field(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| ChartlabError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_candles(&self) -> Result<Vec<Candle>, ChartlabError> {
        let content = self.read()?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ChartlabError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            candles.push(Candle {
                ts: parse_ts(field(&record, 0, "ts")?.trim())?,
                open: parse_f64(&record, 1, "open")?,
                high: parse_f64(&record, 2, "high")?,
                low: parse_f64(&record, 3, "low")?,
                close: parse_f64(&record, 4, "close")?,
                volume: parse_f64(&record, 5, "volume")?,
            });
        }

        candles.sort_by_key(|c| c.ts);
        Ok(candles)
    }

    fn fetch_trades(&self) -> Result<Vec<LedgerTrade>, ChartlabError> {
        let content = self.read()?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut trades = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ChartlabError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let side = match field(&record, 1, "side")?.trim().to_lowercase().as_str() {
                "buy" => Side::Buy,
                "sell" => Side::Sell,
                other => {
                    return Err(ChartlabError::Data {
                        reason: format!("invalid side {:?}: expected buy or sell", other),
                    })
                }
            };

            trades.push(LedgerTrade {
                ts: parse_ts(field(&record, 0, "ts")?.trim())?,
                side,
                quantity: parse_f64(&record, 2, "quantity")?,
                price: parse_f64(&record, 3, "price")?,
                fees: parse_f64(&record, 4, "fees")?,
            });
        }

        trades.sort_by_key(|t| t.ts);
        Ok(trades)
    }
}
