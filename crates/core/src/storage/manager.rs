use std::collections::HashSet;
use std::path::Path;

use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::position::Position;

use super::encryption::{self, KdfParams};
use super::format;

/// Encodes portfolios to and from bytes, encrypted or as plain JSON.
///
/// Every load path runs [`StorageManager::validate`], so a file that breaks
/// ledger invariants never reaches a ledger.
pub struct StorageManager;

impl StorageManager {
    /// Encrypt a portfolio with the default Argon2id cost.
    ///
    /// Flow: Portfolio → bincode → AES-256-GCM(Argon2id(password)) → EPRT bytes
    pub fn save_to_bytes(portfolio: &Portfolio, password: &str) -> Result<Vec<u8>, CoreError> {
        Self::save_to_bytes_with(portfolio, password, &KdfParams::default())
    }

    /// Encrypt a portfolio with explicit key-derivation costs.
    pub fn save_to_bytes_with(
        portfolio: &Portfolio,
        password: &str,
        params: &KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(portfolio)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))?;
        let sealed = encryption::seal(&plaintext, password, params)?;
        let bytes = format::encode(&sealed);
        debug!(
            "encrypted portfolio with {} positions into {} bytes",
            portfolio.ledger.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Decrypt and validate a portfolio.
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<Portfolio, CoreError> {
        let sealed = format::decode(data).inspect_err(|e| warn!("rejected portfolio file: {e}"))?;
        let plaintext = encryption::open(&sealed, password)?;
        let portfolio: Portfolio = bincode::deserialize(&plaintext).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize portfolio: {e}"))
        })?;
        Self::validate(&portfolio).inspect_err(|e| warn!("rejected portfolio contents: {e}"))?;
        debug!("loaded portfolio with {} positions", portfolio.ledger.len());
        Ok(portfolio)
    }

    pub fn to_json(portfolio: &Portfolio) -> Result<String, CoreError> {
        serde_json::to_string_pretty(portfolio)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio to JSON: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Portfolio, CoreError> {
        let portfolio: Portfolio = serde_json::from_str(json)?;
        Self::validate(&portfolio).inspect_err(|e| warn!("rejected portfolio JSON: {e}"))?;
        debug!("parsed portfolio JSON with {} positions", portfolio.ledger.len());
        Ok(portfolio)
    }

    /// Encrypt and write a portfolio to disk.
    pub fn save_to_file(
        portfolio: &Portfolio,
        path: impl AsRef<Path>,
        password: &str,
        params: &KdfParams,
    ) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes_with(portfolio, password, params)?;
        std::fs::write(path.as_ref(), bytes)?;
        debug!("saved portfolio to {}", path.as_ref().display());
        Ok(())
    }

    /// Read and decrypt a portfolio from disk.
    pub fn load_from_file(path: impl AsRef<Path>, password: &str) -> Result<Portfolio, CoreError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::load_from_bytes(&bytes, password)
    }

    /// Check that a deserialized portfolio satisfies the ledger invariants:
    /// every position is valid and no symbol appears twice.
    pub fn validate(portfolio: &Portfolio) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        for position in portfolio.ledger.iter() {
            Self::validate_position(position)?;
            if !seen.insert(position.symbol.as_str()) {
                return Err(CoreError::InvalidFileFormat(format!(
                    "duplicate symbol {}",
                    position.symbol
                )));
            }
        }
        Ok(())
    }

    /// Check a single stored position: non-empty uppercased symbol, non-empty
    /// name, positive quantity, finite non-negative price and book value.
    pub fn validate_position(position: &Position) -> Result<(), CoreError> {
        let symbol = position.symbol.as_str();
        if symbol.trim().is_empty() {
            return Err(CoreError::InvalidFileFormat("position with empty symbol".into()));
        }
        if symbol != symbol.trim().to_uppercase() {
            return Err(CoreError::InvalidFileFormat(format!(
                "symbol '{symbol}' is not normalized"
            )));
        }
        if position.name.trim().is_empty() {
            return Err(CoreError::InvalidFileFormat(format!("{symbol} has an empty name")));
        }
        if position.quantity == 0 {
            return Err(CoreError::InvalidFileFormat(format!("{symbol} has zero quantity")));
        }
        if !position.price.is_finite() || position.price < 0.0 {
            return Err(CoreError::InvalidFileFormat(format!(
                "{symbol} has invalid price {}",
                position.price
            )));
        }
        if !position.book_value.is_finite() || position.book_value < 0.0 {
            return Err(CoreError::InvalidFileFormat(format!(
                "{symbol} has invalid book value {}",
                position.book_value
            )));
        }
        Ok(())
    }
}
