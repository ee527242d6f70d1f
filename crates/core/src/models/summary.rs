use serde::{Deserialize, Serialize};

use super::position::PositionKind;

/// Gain figures for a single open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionGain {
    pub symbol: String,
    pub name: String,
    pub kind: PositionKind,
    pub quantity: u64,

    /// `price * quantity`
    pub market_value: f64,

    pub book_value: f64,

    /// `market_value - book_value`
    pub unrealized_gain: f64,

    /// `unrealized_gain / book_value * 100`, or 0 when book value is 0
    pub return_pct: f64,
}

/// Gain over the whole ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainSummary {
    /// Currency label from settings
    pub currency: String,

    pub total_market_value: f64,
    pub total_book_value: f64,

    /// Sum of per-position unrealized gains
    pub total_gain: f64,

    /// `total_gain / total_book_value * 100`, or 0 when book value is 0
    pub total_return_pct: f64,

    /// Per-position breakdown, in ledger order
    pub positions: Vec<PositionGain>,
}
