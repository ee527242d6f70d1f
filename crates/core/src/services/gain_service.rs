use crate::models::ledger::Ledger;
use crate::models::position::Position;
use crate::models::summary::{GainSummary, PositionGain};

/// Computes gain figures over a ledger: read-only, O(n) in positions.
pub struct GainService;

impl GainService {
    pub fn new() -> Self {
        Self
    }

    /// Sum of `price * quantity - book_value` over all open positions.
    pub fn total_gain(&self, ledger: &Ledger) -> f64 {
        ledger.iter().map(Position::unrealized_gain).sum()
    }

    /// Per-position gains and ledger totals.
    pub fn summary(&self, ledger: &Ledger, currency: &str) -> GainSummary {
        let positions: Vec<PositionGain> = ledger.iter().map(Self::position_gain).collect();

        let total_market_value: f64 = positions.iter().map(|p| p.market_value).sum();
        let total_book_value: f64 = positions.iter().map(|p| p.book_value).sum();
        let total_gain: f64 = positions.iter().map(|p| p.unrealized_gain).sum();

        GainSummary {
            currency: currency.to_string(),
            total_market_value,
            total_book_value,
            total_gain,
            total_return_pct: return_pct(total_gain, total_book_value),
            positions,
        }
    }

    fn position_gain(position: &Position) -> PositionGain {
        let unrealized_gain = position.unrealized_gain();
        PositionGain {
            symbol: position.symbol.clone(),
            name: position.name.clone(),
            kind: position.kind,
            quantity: position.quantity,
            market_value: position.market_value(),
            book_value: position.book_value,
            unrealized_gain,
            return_pct: return_pct(unrealized_gain, position.book_value),
        }
    }
}

impl Default for GainService {
    fn default() -> Self {
        Self::new()
    }
}

fn return_pct(gain: f64, book_value: f64) -> f64 {
    if book_value > 0.0 {
        (gain / book_value) * 100.0
    } else {
        0.0
    }
}
