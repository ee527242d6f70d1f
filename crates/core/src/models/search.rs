use serde::{Deserialize, Serialize};

use super::position::Position;
use super::settings::SymbolMatch;

/// Inclusive price bounds. Either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl PriceRange {
    pub fn between(low: f64, high: f64) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    pub fn at_least(low: f64) -> Self {
        Self {
            low: Some(low),
            high: None,
        }
    }

    pub fn at_most(high: f64) -> Self {
        Self {
            low: None,
            high: Some(high),
        }
    }

    pub fn exactly(price: f64) -> Self {
        Self::between(price, price)
    }

    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        self.low.map_or(true, |low| price >= low) && self.high.map_or(true, |high| price <= high)
    }
}

/// A conjunction of optional filters over positions.
///
/// An empty query matches every position. Built from raw text by
/// `services::input::parse_search_query`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Symbol to match (compared uppercased)
    pub symbol: Option<String>,

    /// How `symbol` is compared
    #[serde(default)]
    pub symbol_match: SymbolMatch,

    /// Every keyword must appear in the name, case-insensitive
    #[serde(default)]
    pub name_keywords: Vec<String>,

    pub price_range: Option<PriceRange>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into().trim().to_uppercase());
        self
    }

    pub fn symbol_match(mut self, mode: SymbolMatch) -> Self {
        self.symbol_match = mode;
        self
    }

    /// Split `keywords` on whitespace; each word must occur in the name.
    pub fn name_keywords(mut self, keywords: &str) -> Self {
        self.name_keywords = keywords
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        self
    }

    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.name_keywords.is_empty() && self.price_range.is_none()
    }

    /// True when `position` satisfies every filter that is set.
    #[must_use]
    pub fn matches(&self, position: &Position) -> bool {
        let symbol_ok = match &self.symbol {
            None => true,
            Some(symbol) => match self.symbol_match {
                SymbolMatch::Exact => position.symbol == *symbol,
                SymbolMatch::Substring => position.symbol.contains(symbol.as_str()),
            },
        };
        if !symbol_ok {
            return false;
        }

        if !self.name_keywords.is_empty() {
            let name = position.name.to_lowercase();
            if !self.name_keywords.iter().all(|k| name.contains(k.as_str())) {
                return false;
            }
        }

        self.price_range
            .map_or(true, |range| range.contains(position.price))
    }
}
