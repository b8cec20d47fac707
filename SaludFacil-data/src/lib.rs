// SaludFácil data layer
// Persisted models, the key-value storage port and the repository that
// loads and saves the tracked collections as whole JSON documents.

pub mod models;
pub mod storage;
pub mod repository;
pub mod errors;

pub use errors::{RepositoryError, StorageError};
pub use repository::{HealthRepository, HealthRepositoryTrait};
pub use storage::{FileStorage, InMemoryStorage, StorageBackend};
