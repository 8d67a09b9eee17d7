//! Cost-basis recalculation over a chronological trade ledger.
//!
//! Replays the full ledger on every call; nothing is mutated
//! incrementally. Opposite-direction trades first close the overlapping
//! quantity at the running average cost (amortizing the trade's fee over
//! the closed portion), then any remainder opens or extends a position in
//! the trade's own direction, so a single oversized sell can flip a long
//! into a short.

use serde::{Deserialize, Serialize};

/// Positions whose |quantity| falls below this are snapped to exactly zero
/// to shed floating-point residue.
const QTY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// A real executed trade, externally supplied in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerTrade {
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
    pub ts: i64,
    pub fees: f64,
}

/// Derived position state. `quantity == 0` implies `average_price == 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSnapshot {
    pub quantity: f64,
    pub average_price: f64,
    pub updated_at: i64,
}

/// Recompute quantity and weighted average price from scratch.
///
/// Trades must already be sorted ascending by `ts`; ordering is the
/// caller's responsibility. `updated_at` is the timestamp of the last
/// trade processed (0 for an empty ledger).
pub fn recalc_position(trades: &[LedgerTrade]) -> PositionSnapshot {
    let mut qty = 0.0_f64;
    let mut cost = 0.0_f64;
    let mut updated_at = 0i64;

    for trade in trades {
        let direction = match trade.side {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        };
        let mut remaining = trade.quantity;
        let mut remaining_fee = trade.fees;

        if qty != 0.0 && qty.signum() != direction {
            let closing = remaining.min(qty.abs());
            // Remove the closed share of cost at the current average.
            cost -= cost * (closing / qty.abs());
            qty -= qty.signum() * closing;
            remaining_fee -= trade.fees * (closing / trade.quantity);
            remaining -= closing;
        }

        if remaining > 0.0 {
            qty += direction * remaining;
            cost += direction * (trade.price * remaining + remaining_fee);
        }

        if qty.abs() < QTY_EPSILON {
            qty = 0.0;
            cost = 0.0;
        }
        updated_at = trade.ts;
    }

    let average_price = if qty != 0.0 { (cost / qty).abs() } else { 0.0 };

    PositionSnapshot {
        quantity: qty,
        average_price,
        updated_at,
    }
}
