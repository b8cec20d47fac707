use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::RepositoryError;
use crate::models::{BloodPressureReading, Medication};
use crate::storage::{StorageBackend, BLOOD_PRESSURE_KEY, LANGUAGE_KEY, MEDICATIONS_KEY};

/// Repository trait for the tracked collections.
///
/// Each collection is one JSON document under a fixed key; load and save
/// are all-or-nothing on the whole collection. An absent key loads as an
/// empty collection; a present-but-unparseable document is an error the
/// caller surfaces once and then continues with empty state.
#[async_trait]
pub trait HealthRepositoryTrait: Send + Sync {
    /// Load the full medication collection.
    async fn load_medications(&self) -> Result<Vec<Medication>, RepositoryError>;

    /// Replace the stored medication collection.
    async fn save_medications(&self, medications: &[Medication]) -> Result<(), RepositoryError>;

    /// Load the full blood pressure collection.
    async fn load_readings(&self) -> Result<Vec<BloodPressureReading>, RepositoryError>;

    /// Replace the stored blood pressure collection.
    async fn save_readings(&self, readings: &[BloodPressureReading])
        -> Result<(), RepositoryError>;

    /// Load the stored UI language code, if any.
    async fn load_language(&self) -> Result<Option<String>, RepositoryError>;

    /// Replace the stored UI language code.
    async fn save_language(&self, code: &str) -> Result<(), RepositoryError>;
}

/// Repository over an injected [`StorageBackend`].
#[derive(Clone)]
pub struct HealthRepository {
    storage: Arc<dyn StorageBackend>,
}

impl HealthRepository {
    /// Create a repository over the given storage backend.
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    async fn load_collection<T: serde::de::DeserializeOwned>(
        &self,
        key: &'static str,
    ) -> Result<Vec<T>, RepositoryError> {
        match self.storage.read(key).await? {
            None => Ok(Vec::new()),
            Some(document) => serde_json::from_str(&document)
                .map_err(|source| RepositoryError::Corrupted { key, source }),
        }
    }

    async fn save_collection<T: serde::Serialize>(
        &self,
        key: &'static str,
        items: &[T],
    ) -> Result<(), RepositoryError> {
        let document = serde_json::to_string(items)?;
        debug!("Saving {} items under '{}'", items.len(), key);
        self.storage.write(key, &document).await?;
        Ok(())
    }
}

#[async_trait]
impl HealthRepositoryTrait for HealthRepository {
    async fn load_medications(&self) -> Result<Vec<Medication>, RepositoryError> {
        self.load_collection(MEDICATIONS_KEY).await
    }

    async fn save_medications(&self, medications: &[Medication]) -> Result<(), RepositoryError> {
        self.save_collection(MEDICATIONS_KEY, medications).await
    }

    async fn load_readings(&self) -> Result<Vec<BloodPressureReading>, RepositoryError> {
        self.load_collection(BLOOD_PRESSURE_KEY).await
    }

    async fn save_readings(
        &self,
        readings: &[BloodPressureReading],
    ) -> Result<(), RepositoryError> {
        self.save_collection(BLOOD_PRESSURE_KEY, readings).await
    }

    async fn load_language(&self) -> Result<Option<String>, RepositoryError> {
        Ok(self.storage.read(LANGUAGE_KEY).await?)
    }

    async fn save_language(&self, code: &str) -> Result<(), RepositoryError> {
        Ok(self.storage.write(LANGUAGE_KEY, code).await?)
    }
}

/// Next identifier for a newly created entity.
///
/// Ids are creation-timestamp millis like the original app's, but bumped
/// past the current maximum so two creations in the same millisecond stay
/// unique and the "monotonic by creation order" invariant actually holds.
pub fn next_id(now_millis: i64, existing: impl Iterator<Item = i64>) -> i64 {
    let max_existing = existing.max().unwrap_or(0);
    now_millis.max(max_existing + 1)
}

/// Mock repository for unit testing services without a storage backend.
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// In-memory [`HealthRepositoryTrait`] with switchable failure modes.
    #[derive(Default)]
    pub struct MockHealthRepository {
        medications: Mutex<Vec<Medication>>,
        readings: Mutex<Vec<BloodPressureReading>>,
        language: Mutex<Option<String>>,
        fail_saves: AtomicBool,
        fail_loads: AtomicBool,
    }

    impl MockHealthRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent save return a storage error.
        pub fn fail_saves(&self, fail: bool) {
            self.fail_saves.store(fail, Ordering::SeqCst);
        }

        /// Make every subsequent load return a storage error.
        pub fn fail_loads(&self, fail: bool) {
            self.fail_loads.store(fail, Ordering::SeqCst);
        }

        pub fn stored_medications(&self) -> Vec<Medication> {
            self.medications.lock().unwrap().clone()
        }

        pub fn stored_readings(&self) -> Vec<BloodPressureReading> {
            self.readings.lock().unwrap().clone()
        }

        fn save_error() -> RepositoryError {
            RepositoryError::Storage(crate::errors::StorageError::Lock(
                "mock save failure".to_string(),
            ))
        }
    }

    #[async_trait]
    impl HealthRepositoryTrait for MockHealthRepository {
        async fn load_medications(&self) -> Result<Vec<Medication>, RepositoryError> {
            if self.fail_loads.load(Ordering::SeqCst) {
                return Err(Self::save_error());
            }
            Ok(self.medications.lock().unwrap().clone())
        }

        async fn save_medications(
            &self,
            medications: &[Medication],
        ) -> Result<(), RepositoryError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(Self::save_error());
            }
            *self.medications.lock().unwrap() = medications.to_vec();
            Ok(())
        }

        async fn load_readings(&self) -> Result<Vec<BloodPressureReading>, RepositoryError> {
            if self.fail_loads.load(Ordering::SeqCst) {
                return Err(Self::save_error());
            }
            Ok(self.readings.lock().unwrap().clone())
        }

        async fn save_readings(
            &self,
            readings: &[BloodPressureReading],
        ) -> Result<(), RepositoryError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(Self::save_error());
            }
            *self.readings.lock().unwrap() = readings.to_vec();
            Ok(())
        }

        async fn load_language(&self) -> Result<Option<String>, RepositoryError> {
            if self.fail_loads.load(Ordering::SeqCst) {
                return Err(Self::save_error());
            }
            Ok(self.language.lock().unwrap().clone())
        }

        async fn save_language(&self, code: &str) -> Result<(), RepositoryError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(Self::save_error());
            }
            *self.language.lock().unwrap() = Some(code.to_string());
            Ok(())
        }
    }
}
