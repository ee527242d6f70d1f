//! Validation and parsing of raw text fields.
//!
//! Every ledger command arrives as strings from a text shell. All blank
//! checks run before any numeric parsing, so a request with a blank field
//! always reports `Validation` even if another field is also malformed.

use crate::errors::CoreError;
use crate::models::position::PositionKind;
use crate::models::search::{PriceRange, SearchQuery};
use crate::models::settings::SymbolMatch;

/// A buy request whose fields have all been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyOrder {
    pub kind: PositionKind,
    /// Uppercased
    pub symbol: String,
    pub name: String,
    pub quantity: u64,
    pub price: f64,
}

impl BuyOrder {
    pub fn parse(
        kind: PositionKind,
        symbol: &str,
        name: &str,
        quantity: &str,
        price: &str,
    ) -> Result<Self, CoreError> {
        let symbol = require("symbol", symbol)?;
        let name = require("name", name)?;
        let quantity = require("quantity", quantity)?;
        let price = require("price", price)?;

        Ok(Self {
            kind,
            symbol: symbol.to_uppercase(),
            name: name.to_string(),
            quantity: parse_quantity(quantity)?,
            price: parse_price(price)?,
        })
    }
}

/// A sell request whose fields have all been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct SellOrder {
    pub symbol: String,
    pub quantity: u64,
}

impl SellOrder {
    pub fn parse(symbol: &str, quantity: &str) -> Result<Self, CoreError> {
        let symbol = require("symbol", symbol)?;
        let quantity = require("quantity", quantity)?;

        Ok(Self {
            symbol: symbol.to_uppercase(),
            quantity: parse_quantity(quantity)?,
        })
    }
}

/// A price update whose fields have all been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    pub symbol: String,
    pub price: f64,
}

impl PriceUpdate {
    pub fn parse(symbol: &str, price: &str) -> Result<Self, CoreError> {
        let symbol = require("symbol", symbol)?;
        let price = require("price", price)?;

        Ok(Self {
            symbol: symbol.to_uppercase(),
            price: parse_price(price)?,
        })
    }
}

/// Trim `value` and fail with `Validation` if nothing is left.
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

/// Parse a whole, strictly positive unit count.
pub fn parse_quantity(raw: &str) -> Result<u64, CoreError> {
    let trimmed = raw.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| CoreError::parse("quantity", trimmed))?;
    if value <= 0 {
        return Err(CoreError::Validation(format!(
            "quantity must be positive, got {value}"
        )));
    }
    Ok(value as u64)
}

/// Parse a finite, non-negative price.
pub fn parse_price(raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::parse("price", trimmed))?;
    if !value.is_finite() {
        return Err(CoreError::parse("price", trimmed));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(format!(
            "price must not be negative, got {value}"
        )));
    }
    Ok(value)
}

/// Parse a price range: `"10-20"`, `"10-"` (at least), `"-20"` (at most)
/// or `"15"` (exactly). Bounds may use exponent notation such as `"1e-5"`.
pub fn parse_price_range(raw: &str) -> Result<PriceRange, CoreError> {
    let trimmed = require("price range", raw)?;

    let Some(sep) = range_separator(trimmed) else {
        return Ok(PriceRange::exactly(parse_price(trimmed)?));
    };

    let (low, high) = (trimmed[..sep].trim(), trimmed[sep + 1..].trim());
    let range = match (low.is_empty(), high.is_empty()) {
        (true, true) => {
            return Err(CoreError::Validation(
                "price range needs at least one bound".into(),
            ))
        }
        (false, true) => PriceRange::at_least(parse_price(low)?),
        (true, false) => PriceRange::at_most(parse_price(high)?),
        (false, false) => PriceRange::between(parse_price(low)?, parse_price(high)?),
    };

    if let (Some(low), Some(high)) = (range.low, range.high) {
        if low > high {
            return Err(CoreError::Validation(format!(
                "price range lower bound {low} exceeds upper bound {high}"
            )));
        }
    }

    Ok(range)
}

/// Byte index of the first `'-'` that is not an exponent sign.
fn range_separator(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    (0..bytes.len()).find(|&i| bytes[i] == b'-' && (i == 0 || !matches!(bytes[i - 1], b'e' | b'E')))
}

/// Build a search query from optional text filters. Blank filters are ignored.
pub fn parse_search_query(
    symbol: &str,
    name_keywords: &str,
    price_range: &str,
    symbol_match: SymbolMatch,
) -> Result<SearchQuery, CoreError> {
    let mut query = SearchQuery::new().symbol_match(symbol_match);

    if !symbol.trim().is_empty() {
        query = query.symbol(symbol);
    }
    if !name_keywords.trim().is_empty() {
        query = query.name_keywords(name_keywords);
    }
    if !price_range.trim().is_empty() {
        query = query.price_range(parse_price_range(price_range)?);
    }

    Ok(query)
}
