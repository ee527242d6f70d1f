use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

/// Where a portfolio comes from at startup and goes to at shutdown.
///
/// The ledger knows nothing about formats; hosts inject whichever store
/// fits (encrypted file, plain JSON, memory) and the facade calls it.
pub trait HoldingsStore {
    /// Human-readable description of this store (for logs/errors).
    fn describe(&self) -> String;

    /// Read the stored portfolio.
    fn load(&self) -> Result<Portfolio, CoreError>;

    /// Replace the stored portfolio with `portfolio`.
    fn save(&mut self, portfolio: &Portfolio) -> Result<(), CoreError>;
}
