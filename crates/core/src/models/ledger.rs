use serde::{Deserialize, Serialize};

use super::position::Position;

/// The holdings ledger: at most one position per symbol, in insertion order.
///
/// Lookups compare uppercased symbols. A linear scan is used instead of a
/// map so that display order is the order positions were first bought.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    positions: Vec<Position>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate positions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }

    /// All positions as a slice, in insertion order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Symbols of all open positions, in insertion order.
    #[must_use]
    pub fn symbols(&self) -> Vec<&str> {
        self.positions.iter().map(|p| p.symbol.as_str()).collect()
    }

    /// Find a position by symbol (case-insensitive).
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Position> {
        self.index_of(symbol).map(|idx| &self.positions[idx])
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.index_of(symbol).is_some()
    }

    pub(crate) fn get_mut(&mut self, symbol: &str) -> Option<&mut Position> {
        let idx = self.index_of(symbol)?;
        Some(&mut self.positions[idx])
    }

    pub(crate) fn position_at_mut(&mut self, idx: usize) -> &mut Position {
        &mut self.positions[idx]
    }

    pub(crate) fn index_of(&self, symbol: &str) -> Option<usize> {
        self.positions.iter().position(|p| p.has_symbol(symbol))
    }

    /// Append a position. Callers must have checked the symbol is absent.
    pub(crate) fn push(&mut self, position: Position) {
        debug_assert!(!self.contains(&position.symbol));
        self.positions.push(position);
    }

    pub(crate) fn remove_at(&mut self, idx: usize) -> Position {
        self.positions.remove(idx)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}
