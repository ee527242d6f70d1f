pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::path::Path;

use log::debug;
use models::{
    ledger::Ledger,
    outcome::SaleOutcome,
    portfolio::Portfolio,
    position::{Position, PositionKind},
    search::SearchQuery,
    settings::{Settings, SymbolMatch},
    summary::GainSummary,
};
use services::{
    gain_service::GainService,
    input::{self, BuyOrder, PriceUpdate, SellOrder},
    ledger_service::LedgerService,
};
use storage::{encryption::KdfParams, manager::StorageManager, traits::HoldingsStore};

use errors::CoreError;

/// Main entry point for the ePortfolio core library.
///
/// Owns the portfolio and the services that operate on it. A presentation
/// shell keeps one of these for the life of the process and calls into it
/// synchronously; it is not meant to be shared across threads without a lock.
#[must_use]
pub struct EPortfolio {
    portfolio: Portfolio,
    ledger_service: LedgerService,
    gain_service: GainService,
    /// Realized gain accumulated by sales since this value was created.
    realized_gain: f64,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for EPortfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EPortfolio")
            .field("positions", &self.portfolio.ledger.len())
            .field("settings", &self.portfolio.settings)
            .field("realized_gain", &self.realized_gain)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Default for EPortfolio {
    fn default() -> Self {
        Self::create_new()
    }
}

impl EPortfolio {
    /// Create an empty portfolio with default settings.
    pub fn create_new() -> Self {
        Self::build(Portfolio::default())
    }

    /// Wrap an already loaded portfolio. The portfolio is validated first.
    pub fn from_portfolio(portfolio: Portfolio) -> Result<Self, CoreError> {
        StorageManager::validate(&portfolio)?;
        Ok(Self::build(portfolio))
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Load from encrypted bytes (password required).
    pub fn load_from_bytes(encrypted: &[u8], password: &str) -> Result<Self, CoreError> {
        let portfolio = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::build(portfolio))
    }

    /// Save to encrypted bytes with the default key-derivation cost.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        self.save_to_bytes_with(password, &KdfParams::default())
    }

    /// Save to encrypted bytes with explicit key-derivation costs.
    pub fn save_to_bytes_with(
        &mut self,
        password: &str,
        params: &KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes_with(&self.portfolio, password, params)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk.
    pub fn load_from_file(path: impl AsRef<Path>, password: &str) -> Result<Self, CoreError> {
        let portfolio = StorageManager::load_from_file(path, password)?;
        Ok(Self::build(portfolio))
    }

    /// Save to an encrypted file on disk with the default key-derivation cost.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>, password: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.portfolio, path, password, &KdfParams::default())?;
        self.dirty = false;
        Ok(())
    }

    /// Load from any injected store. The loaded portfolio is validated, so a
    /// store that hands back duplicate symbols or empty positions is refused.
    pub fn load_from_store(store: &dyn HoldingsStore) -> Result<Self, CoreError> {
        let portfolio = store.load()?;
        StorageManager::validate(&portfolio)?;
        debug!(
            "loaded {} positions from {}",
            portfolio.ledger.len(),
            store.describe()
        );
        Ok(Self::build(portfolio))
    }

    /// Write the current portfolio to an injected store.
    pub fn save_to_store(&mut self, store: &mut dyn HoldingsStore) -> Result<(), CoreError> {
        store.save(&self.portfolio)?;
        debug!(
            "saved {} positions to {}",
            self.portfolio.ledger.len(),
            store.describe()
        );
        self.dirty = false;
        Ok(())
    }

    // ── Ledger Commands ─────────────────────────────────────────────

    /// Buy `quantity` units of `symbol` at `price`. All inputs but `kind` are
    /// raw text. Buying a held symbol adds to the existing position.
    pub fn buy(
        &mut self,
        kind: PositionKind,
        symbol: &str,
        name: &str,
        quantity: &str,
        price: &str,
    ) -> Result<Position, CoreError> {
        let order = BuyOrder::parse(kind, symbol, name, quantity, price)?;
        let position = self.ledger_service.buy(&mut self.portfolio.ledger, order)?;
        self.dirty = true;
        Ok(position)
    }

    /// Sell `quantity` units of `symbol` at its current price.
    pub fn sell(&mut self, symbol: &str, quantity: &str) -> Result<SaleOutcome, CoreError> {
        let order = SellOrder::parse(symbol, quantity)?;
        let outcome = self.ledger_service.sell(&mut self.portfolio.ledger, order)?;
        self.realized_gain += outcome.realized_gain;
        self.dirty = true;
        Ok(outcome)
    }

    /// Set the current market price of `symbol`.
    pub fn update_price(&mut self, symbol: &str, price: &str) -> Result<Position, CoreError> {
        let update = PriceUpdate::parse(symbol, price)?;
        let position = self
            .ledger_service
            .update_price(&mut self.portfolio.ledger, update)?;
        self.dirty = true;
        Ok(position)
    }

    // ── Search ──────────────────────────────────────────────────────

    /// Positions satisfying an arbitrary predicate, in ledger order.
    #[must_use]
    pub fn search<P>(&self, predicate: P) -> Vec<&Position>
    where
        P: Fn(&Position) -> bool,
    {
        self.ledger_service.search(&self.portfolio.ledger, predicate)
    }

    /// Positions matching every filter of `query`, in ledger order.
    #[must_use]
    pub fn search_query(&self, query: &SearchQuery) -> Vec<&Position> {
        self.ledger_service
            .search_query(&self.portfolio.ledger, query)
    }

    /// Positions whose symbol matches `symbol` under the configured
    /// [`SymbolMatch`]. A blank symbol matches everything.
    #[must_use]
    pub fn search_symbol(&self, symbol: &str) -> Vec<&Position> {
        let mut query = SearchQuery::new().symbol_match(self.portfolio.settings.symbol_match);
        if !symbol.trim().is_empty() {
            query = query.symbol(symbol);
        }
        self.search_query(&query)
    }

    /// Search from raw text filters: symbol, name keywords and a price range
    /// such as `"10-20"`. Blank filters are ignored.
    pub fn search_text(
        &self,
        symbol: &str,
        name_keywords: &str,
        price_range: &str,
    ) -> Result<Vec<&Position>, CoreError> {
        let query = input::parse_search_query(
            symbol,
            name_keywords,
            price_range,
            self.portfolio.settings.symbol_match,
        )?;
        Ok(self.search_query(&query))
    }

    // ── Gain ────────────────────────────────────────────────────────

    /// Unrealized gain over all open positions.
    #[must_use]
    pub fn total_gain(&self) -> f64 {
        self.gain_service.total_gain(&self.portfolio.ledger)
    }

    /// Per-position and total gain figures.
    #[must_use]
    pub fn gain_summary(&self) -> GainSummary {
        self.gain_service
            .summary(&self.portfolio.ledger, &self.portfolio.settings.display_currency)
    }

    /// Realized gain from sales made through this value. Not persisted.
    #[must_use]
    pub fn realized_gain(&self) -> f64 {
        self.realized_gain
    }

    // ── Inspection ──────────────────────────────────────────────────

    /// Look up one position by symbol (case-insensitive).
    #[must_use]
    pub fn get_position(&self, symbol: &str) -> Option<&Position> {
        self.portfolio.ledger.get(symbol)
    }

    /// All positions, in ledger order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        self.portfolio.ledger.positions()
    }

    #[must_use]
    pub fn position_count(&self) -> usize {
        self.portfolio.ledger.len()
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.portfolio.ledger
    }

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Returns `true` if the portfolio has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.portfolio.settings
    }

    /// Set the currency label shown with monetary values.
    /// Must be exactly 3 ASCII letters; stored uppercased.
    pub fn set_display_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let trimmed = currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::Validation(format!(
                "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., USD, CAD)"
            )));
        }
        self.portfolio.settings.display_currency = trimmed;
        self.dirty = true;
        Ok(())
    }

    pub fn set_symbol_match(&mut self, mode: SymbolMatch) {
        if self.portfolio.settings.symbol_match != mode {
            self.portfolio.settings.symbol_match = mode;
            self.dirty = true;
        }
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all positions as a JSON array.
    pub fn export_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.portfolio.ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize positions to JSON: {e}")))
    }

    /// Import a JSON array of positions, as exported by [`Self::export_to_json`].
    ///
    /// Each entry is added as a lot with its own book value, so held symbols
    /// are topped up. All-or-nothing: if any entry is invalid, the ledger is
    /// unchanged. Returns the number of entries imported.
    pub fn import_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let incoming: Vec<Position> = serde_json::from_str(json)?;
        let count = incoming.len();
        let mut ledger = self.portfolio.ledger.clone();

        for mut lot in incoming {
            lot.symbol = lot.symbol.trim().to_uppercase();
            StorageManager::validate_position(&lot)?;
            self.ledger_service.absorb(&mut ledger, lot)?;
        }

        self.portfolio.ledger = ledger;
        self.dirty = true;
        debug!("imported {count} positions from JSON");
        Ok(count)
    }

    /// Export all positions as CSV.
    /// Columns: kind, symbol, name, quantity, price, book_value
    #[must_use]
    pub fn export_to_csv(&self) -> String {
        let mut csv = String::from("kind,symbol,name,quantity,price,book_value\n");
        for p in self.portfolio.ledger.iter() {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                csv_field(&p.kind.to_string()),
                csv_field(&p.symbol),
                csv_field(&p.name),
                p.quantity,
                p.price,
                p.book_value,
            ));
        }
        csv
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(portfolio: Portfolio) -> Self {
        Self {
            portfolio,
            ledger_service: LedgerService::new(),
            gain_service: GainService::new(),
            realized_gain: 0.0,
            dirty: false,
        }
    }
}

/// Quote a CSV field if it contains a comma, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
