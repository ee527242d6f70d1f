use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// The kind of a held investment.
/// Both kinds currently behave identically in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionKind {
    /// Individual equity (IBM, AAPL, ...)
    Stock,
    /// Mutual fund units
    MutualFund,
}

impl std::fmt::Display for PositionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionKind::Stock => write!(f, "Stock"),
            PositionKind::MutualFund => write!(f, "Mutual Fund"),
        }
    }
}

impl FromStr for PositionKind {
    type Err = CoreError;

    /// Accepts the labels a text shell is likely to offer, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "stock" => Ok(PositionKind::Stock),
            "mutualfund" | "fund" => Ok(PositionKind::MutualFund),
            "" => Err(CoreError::Validation("Investment kind is required".into())),
            _ => Err(CoreError::Validation(format!(
                "Unknown investment kind '{}': expected Stock or Mutual Fund",
                s.trim()
            ))),
        }
    }
}

/// One held investment.
///
/// `symbol` is stored uppercased, which makes every ledger lookup
/// case-insensitive without re-normalizing the stored side.
///
/// `book_value` is the historical cost basis. It is set by purchases and
/// reduced proportionally by partial sales; price updates never touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub kind: PositionKind,

    /// Ticker symbol, uppercased (e.g., "IBM", "VFIAX")
    pub symbol: String,

    /// Human-readable name (e.g., "IBM Corp")
    pub name: String,

    /// Units held, always > 0 while the position is in a ledger
    pub quantity: u64,

    /// Current per-unit market price
    pub price: f64,

    /// Cumulative cost basis
    pub book_value: f64,
}

impl Position {
    /// Build a fresh position from a first purchase: `book_value = price * quantity`.
    pub fn new(
        kind: PositionKind,
        symbol: impl Into<String>,
        name: impl Into<String>,
        quantity: u64,
        price: f64,
    ) -> Self {
        Self {
            kind,
            symbol: symbol.into().trim().to_uppercase(),
            name: name.into().trim().to_string(),
            quantity,
            price,
            book_value: price * quantity as f64,
        }
    }

    pub fn stock(symbol: impl Into<String>, name: impl Into<String>, quantity: u64, price: f64) -> Self {
        Self::new(PositionKind::Stock, symbol, name, quantity, price)
    }

    pub fn mutual_fund(
        symbol: impl Into<String>,
        name: impl Into<String>,
        quantity: u64,
        price: f64,
    ) -> Self {
        Self::new(PositionKind::MutualFund, symbol, name, quantity, price)
    }

    /// Current market value: `price * quantity`.
    #[must_use]
    pub fn market_value(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Gain on the held quantity at the current price, never booked.
    #[must_use]
    pub fn unrealized_gain(&self) -> f64 {
        self.market_value() - self.book_value
    }

    /// Case-insensitive symbol comparison.
    #[must_use]
    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.symbol == symbol.trim().to_uppercase()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({}): quantity {}, price {:.2}, book value {:.2}",
            self.kind, self.symbol, self.name, self.quantity, self.price, self.book_value
        )
    }
}
