use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

use super::manager::StorageManager;
use super::traits::HoldingsStore;

/// Keeps the last saved portfolio in memory. Useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    stored: Portfolio,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing portfolio, as if it had been saved earlier.
    pub fn with_portfolio(portfolio: Portfolio) -> Self {
        Self {
            stored: portfolio,
            saves: 0,
        }
    }

    /// The portfolio as last saved.
    #[must_use]
    pub fn stored(&self) -> &Portfolio {
        &self.stored
    }

    /// Number of successful `save` calls.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl HoldingsStore for MemoryStore {
    fn describe(&self) -> String {
        "in-memory store".to_string()
    }

    fn load(&self) -> Result<Portfolio, CoreError> {
        StorageManager::validate(&self.stored)?;
        Ok(self.stored.clone())
    }

    fn save(&mut self, portfolio: &Portfolio) -> Result<(), CoreError> {
        self.stored = portfolio.clone();
        self.saves += 1;
        Ok(())
    }
}
