// ═══════════════════════════════════════════════════════════════════
// Storage Tests — encryption, file format, StorageManager, stores
// ═══════════════════════════════════════════════════════════════════

use eportfolio_core::errors::CoreError;
use eportfolio_core::models::ledger::Ledger;
use eportfolio_core::models::portfolio::Portfolio;
use eportfolio_core::models::position::{Position, PositionKind};
use eportfolio_core::services::input::BuyOrder;
use eportfolio_core::services::ledger_service::LedgerService;
use eportfolio_core::storage::encryption::{derive_key, open, seal, KdfParams};
use eportfolio_core::storage::file_store::{EncryptedFileStore, JsonFileStore};
use eportfolio_core::storage::format::{self, CURRENT_VERSION, HEADER_SIZE, MAGIC};
use eportfolio_core::storage::manager::StorageManager;
use eportfolio_core::storage::memory_store::MemoryStore;
use eportfolio_core::storage::traits::HoldingsStore;

fn fast() -> KdfParams {
    KdfParams::minimal()
}

fn sample_portfolio() -> Portfolio {
    let mut ledger = Ledger::new();
    let service = LedgerService::new();
    for (kind, symbol, name, qty, price) in [
        (PositionKind::Stock, "IBM", "IBM Corp", "100", "50"),
        (PositionKind::MutualFund, "VFIAX", "Vanguard 500", "12", "410.25"),
    ] {
        let order = BuyOrder::parse(kind, symbol, name, qty, price).unwrap();
        service.buy(&mut ledger, order).unwrap();
    }
    Portfolio::with_ledger(ledger)
}

/// A portfolio that bypasses ledger validation, for corrupt-file tests.
fn raw_portfolio(json_positions: &str) -> Portfolio {
    serde_json::from_str(&format!(r#"{{"ledger": {json_positions}}}"#)).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Encryption
// ═══════════════════════════════════════════════════════════════════

mod encryption {
    use super::*;

    #[test]
    fn default_kdf_params() {
        let p = KdfParams::default();
        assert_eq!(p.memory_cost, 65_536);
        assert_eq!(p.time_cost, 3);
        assert_eq!(p.parallelism, 4);
    }

    #[test]
    fn derive_key_is_deterministic_per_salt() {
        let a = derive_key("pw", &[1u8; 16], &fast()).unwrap();
        let b = derive_key("pw", &[1u8; 16], &fast()).unwrap();
        let c = derive_key("pw", &[2u8; 16], &fast()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let bad = KdfParams {
            memory_cost: 1,
            time_cost: 1,
            parallelism: 1,
        };
        assert!(matches!(derive_key("pw", &[0u8; 16], &bad), Err(CoreError::Encryption(_))));
    }

    #[test]
    fn seal_then_open() {
        let sealed = seal(b"holdings", "secret", &fast()).unwrap();
        assert_ne!(sealed.ciphertext, b"holdings");
        assert_eq!(open(&sealed, "secret").unwrap(), b"holdings");
    }

    #[test]
    fn wrong_password_fails() {
        let sealed = seal(b"holdings", "secret", &fast()).unwrap();
        assert_eq!(open(&sealed, "guess").unwrap_err(), CoreError::Decryption);
    }

    #[test]
    fn fresh_salt_and_nonce_each_time() {
        let a = seal(b"x", "pw", &fast()).unwrap();
        let b = seal(b"x", "pw", &fast()).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
    }
}

// ═══════════════════════════════════════════════════════════════════
// File format
// ═══════════════════════════════════════════════════════════════════

mod file_format {
    use super::*;

    #[test]
    fn header_layout() {
        let sealed = seal(b"abc", "pw", &fast()).unwrap();
        let bytes = format::encode(&sealed);
        assert_eq!(HEADER_SIZE, 54);
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), CURRENT_VERSION);
        assert_eq!(bytes.len(), HEADER_SIZE + sealed.ciphertext.len());
        assert_eq!(format::decode(&bytes).unwrap(), sealed);
    }

    #[test]
    fn too_small() {
        let err = format::decode(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileFormat(_)));
    }

    #[test]
    fn wrong_magic() {
        let mut bytes = format::encode(&seal(b"abc", "pw", &fast()).unwrap());
        bytes[0..4].copy_from_slice(b"SVTK");
        assert!(matches!(format::decode(&bytes), Err(CoreError::InvalidFileFormat(_))));
    }

    #[test]
    fn unsupported_versions() {
        let mut bytes = format::encode(&seal(b"abc", "pw", &fast()).unwrap());
        bytes[4..6].copy_from_slice(&0u16.to_le_bytes());
        assert_eq!(format::decode(&bytes).unwrap_err(), CoreError::UnsupportedVersion(0));
        bytes[4..6].copy_from_slice(&(CURRENT_VERSION + 1).to_le_bytes());
        assert_eq!(
            format::decode(&bytes).unwrap_err(),
            CoreError::UnsupportedVersion(CURRENT_VERSION + 1)
        );
    }

    #[test]
    fn hostile_kdf_params() {
        let mut bytes = format::encode(&seal(b"abc", "pw", &fast()).unwrap());
        bytes[6..10].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = format::decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("memory_cost"));
    }

    #[test]
    fn truncated_ciphertext() {
        let bytes = format::encode(&seal(b"abcdef", "pw", &fast()).unwrap());
        let err = format::decode(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager
// ═══════════════════════════════════════════════════════════════════

mod manager {
    use super::*;

    #[test]
    fn bytes_roundtrip() {
        let portfolio = sample_portfolio();
        let bytes = StorageManager::save_to_bytes_with(&portfolio, "pw", &fast()).unwrap();
        let loaded = StorageManager::load_from_bytes(&bytes, "pw").unwrap();
        assert_eq!(loaded, portfolio);
    }

    #[test]
    fn wrong_password() {
        let bytes = StorageManager::save_to_bytes_with(&sample_portfolio(), "pw", &fast()).unwrap();
        assert_eq!(
            StorageManager::load_from_bytes(&bytes, "nope").unwrap_err(),
            CoreError::Decryption
        );
    }

    #[test]
    fn tampered_ciphertext() {
        let mut bytes =
            StorageManager::save_to_bytes_with(&sample_portfolio(), "pw", &fast()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert_eq!(
            StorageManager::load_from_bytes(&bytes, "pw").unwrap_err(),
            CoreError::Decryption
        );
    }

    #[test]
    fn json_roundtrip() {
        let portfolio = sample_portfolio();
        let json = StorageManager::to_json(&portfolio).unwrap();
        assert!(json.contains("\"IBM\""));
        assert_eq!(StorageManager::from_json(&json).unwrap(), portfolio);
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            StorageManager::from_json("{not json"),
            Err(CoreError::Deserialization(_))
        ));
    }

    #[test]
    fn rejects_ledger_invariant_violations() {
        let cases = [
            r#"[{"kind":"Stock","symbol":"IBM","name":"IBM","quantity":0,"price":1.0,"book_value":0.0}]"#,
            r#"[{"kind":"Stock","symbol":"","name":"IBM","quantity":1,"price":1.0,"book_value":1.0}]"#,
            r#"[{"kind":"Stock","symbol":"ibm","name":"IBM","quantity":1,"price":1.0,"book_value":1.0}]"#,
            r#"[{"kind":"Stock","symbol":"IBM","name":" ","quantity":1,"price":1.0,"book_value":1.0}]"#,
            r#"[{"kind":"Stock","symbol":"IBM","name":"IBM","quantity":1,"price":-1.0,"book_value":1.0}]"#,
            r#"[{"kind":"Stock","symbol":"IBM","name":"IBM","quantity":1,"price":1.0,"book_value":-1.0}]"#,
            r#"[{"kind":"Stock","symbol":"IBM","name":"IBM","quantity":1,"price":1.0,"book_value":1.0},
                {"kind":"Stock","symbol":"IBM","name":"IBM 2","quantity":1,"price":1.0,"book_value":1.0}]"#,
        ];
        for case in cases {
            let portfolio = raw_portfolio(case);
            assert!(
                matches!(StorageManager::validate(&portfolio), Err(CoreError::InvalidFileFormat(_))),
                "accepted {case}"
            );
        }
    }

    #[test]
    fn encrypted_load_rejects_invalid_contents() {
        let bad = raw_portfolio(
            r#"[{"kind":"Stock","symbol":"IBM","name":"IBM","quantity":0,"price":1.0,"book_value":0.0}]"#,
        );
        let bytes = StorageManager::save_to_bytes_with(&bad, "pw", &fast()).unwrap();
        assert!(matches!(
            StorageManager::load_from_bytes(&bytes, "pw"),
            Err(CoreError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StorageManager::load_from_file(dir.path().join("absent.eprt"), "pw").unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// HoldingsStore implementations
// ═══════════════════════════════════════════════════════════════════

mod stores {
    use super::*;

    #[test]
    fn encrypted_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.eprt");
        let mut store = EncryptedFileStore::new(&path, "pw").with_kdf_params(fast());

        store.save(&sample_portfolio()).unwrap();
        assert!(path.exists());
        assert_eq!(store.load().unwrap(), sample_portfolio());
        assert!(store.describe().contains("holdings.eprt"));
    }

    #[test]
    fn encrypted_file_store_debug_hides_password() {
        let store = EncryptedFileStore::new("x.eprt", "hunter2");
        assert!(!format!("{store:?}").contains("hunter2"));
    }

    #[test]
    fn json_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.json");
        let mut store = JsonFileStore::new(&path);

        store.save(&sample_portfolio()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Vanguard 500"));
        assert_eq!(store.load().unwrap(), sample_portfolio());
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().ledger.is_empty());
        store.save(&sample_portfolio()).unwrap();
        store.save(&sample_portfolio()).unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.stored().ledger.len(), 2);
    }

    #[test]
    fn memory_store_validates_on_load() {
        let mut position = Position::stock("IBM", "IBM", 1, 1.0);
        position.quantity = 0;
        let bad = raw_portfolio(&serde_json::to_string(&vec![position]).unwrap());
        let store = MemoryStore::with_portfolio(bad);
        assert!(matches!(store.load(), Err(CoreError::InvalidFileFormat(_))));
    }
}
