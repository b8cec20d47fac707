// Business logic services

pub mod analysis;
pub mod backup;
pub mod chart;
pub mod history;
pub mod schedule;
pub mod tracker;

pub use analysis::{AnalysisError, AnalysisService, GeminiClient, TextGenerator};
pub use backup::{BackupDocument, BackupError};
pub use chart::{ChartPoint, ChartSeries};
pub use tracker::{HealthTracker, TrackerError};
