use serde::{Deserialize, Serialize};

use super::ledger::Ledger;
use super::settings::Settings;

/// The persisted data container. Everything in here gets serialized
/// (and optionally encrypted) by the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// All open positions
    pub ledger: Ledger,

    /// User settings (display currency, search behaviour)
    #[serde(default)]
    pub settings: Settings,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger,
            settings: Settings::default(),
        }
    }
}
