use std::path::PathBuf;

use log::debug;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

use super::encryption::KdfParams;
use super::manager::StorageManager;
use super::traits::HoldingsStore;

/// Password-protected portfolio file in the EPRT format.
pub struct EncryptedFileStore {
    path: PathBuf,
    password: String,
    kdf_params: KdfParams,
}

impl EncryptedFileStore {
    pub fn new(path: impl Into<PathBuf>, password: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            password: password.into(),
            kdf_params: KdfParams::default(),
        }
    }

    /// Override the Argon2id cost used when saving.
    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf_params = params;
        self
    }
}

impl std::fmt::Debug for EncryptedFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileStore")
            .field("path", &self.path)
            .field("kdf_params", &self.kdf_params)
            .finish_non_exhaustive()
    }
}

impl HoldingsStore for EncryptedFileStore {
    fn describe(&self) -> String {
        format!("encrypted file {}", self.path.display())
    }

    fn load(&self) -> Result<Portfolio, CoreError> {
        StorageManager::load_from_file(&self.path, &self.password)
    }

    fn save(&mut self, portfolio: &Portfolio) -> Result<(), CoreError> {
        StorageManager::save_to_file(portfolio, &self.path, &self.password, &self.kdf_params)
    }
}

/// Unencrypted, human-readable portfolio file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HoldingsStore for JsonFileStore {
    fn describe(&self) -> String {
        format!("JSON file {}", self.path.display())
    }

    fn load(&self) -> Result<Portfolio, CoreError> {
        let json = std::fs::read_to_string(&self.path)?;
        StorageManager::from_json(&json)
    }

    fn save(&mut self, portfolio: &Portfolio) -> Result<(), CoreError> {
        let json = StorageManager::to_json(portfolio)?;
        std::fs::write(&self.path, json)?;
        debug!("wrote portfolio JSON to {}", self.path.display());
        Ok(())
    }
}
