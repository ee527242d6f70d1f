use serde::{Deserialize, Serialize};

/// How a bare symbol query is matched against position symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SymbolMatch {
    /// Whole symbol, case-insensitive ("ibm" finds "IBM", not "IBMX")
    #[default]
    Exact,
    /// Symbol contains the query, case-insensitive
    Substring,
}

/// User-configurable settings, stored inside the portfolio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Currency label shown next to monetary values (e.g., "USD", "CAD").
    /// The ledger never converts between currencies.
    pub display_currency: String,

    /// Matching rule used by symbol searches.
    #[serde(default)]
    pub symbol_match: SymbolMatch,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_currency: "USD".to_string(),
            symbol_match: SymbolMatch::default(),
        }
    }
}
