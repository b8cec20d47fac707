// SaludFácil domain layer
// This crate contains the business logic of the tracker: dose scheduling,
// history aggregation, backup/restore, and the AI trend summary.

// Services that implement business logic
pub mod services;

// Derived (non-persisted) entities
pub mod entities;

// Static string table and language handling
pub mod i18n;

// Tracing setup for embedding applications and test harnesses
pub mod logging;

// Re-export the data layer for convenience
pub use salud_facil_data as data;
