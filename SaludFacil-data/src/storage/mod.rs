pub mod file;
pub mod in_memory;

use async_trait::async_trait;

use crate::errors::StorageError;

pub use file::FileStorage;
pub use in_memory::InMemoryStorage;

/// Storage key holding the JSON array of medications.
pub const MEDICATIONS_KEY: &str = "saludfacil_medications";

/// Storage key holding the JSON array of blood pressure readings.
pub const BLOOD_PRESSURE_KEY: &str = "saludfacil_blood_pressure";

/// Storage key holding the two-letter UI language code.
pub const LANGUAGE_KEY: &str = "saludfacil_language";

/// Key-value storage port (the localStorage analogue).
///
/// Readers must tolerate absent keys: `read` returns `Ok(None)` for a key
/// that was never written. Values are whole documents; there is no partial
/// update, every write replaces the full value.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the full value stored under `key`, if any.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the full value stored under `key`.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
