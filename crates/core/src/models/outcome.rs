use serde::{Deserialize, Serialize};

use super::position::Position;

/// Result of a successful sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleOutcome {
    /// Uppercased symbol of the position sold from
    pub symbol: String,

    /// Units sold
    pub quantity_sold: u64,

    /// Price per unit used for the sale (the position's current price)
    pub price: f64,

    /// Sale proceeds: `quantity_sold * price`
    pub proceeds: f64,

    /// Cost basis released by the sale: `old_book_value - new_book_value`
    pub book_value_sold: f64,

    /// `proceeds - book_value_sold`
    pub realized_gain: f64,

    /// The position after the sale, or `None` if it was fully sold and removed
    pub remaining: Option<Position>,
}

impl SaleOutcome {
    /// True if the sale closed the position.
    #[must_use]
    pub fn removed(&self) -> bool {
        self.remaining.is_none()
    }
}
