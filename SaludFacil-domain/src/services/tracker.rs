//! The tracker: owns the in-memory collections and writes them through
//! an injected repository.
//!
//! Persistence mirrors the original application's model: every mutation
//! rewrites the whole affected collection. A failed write is logged and
//! the in-memory mutation stands, so the user keeps working and the next
//! successful save catches the state up.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationErrors};

use salud_facil_data::errors::RepositoryError;
use salud_facil_data::models::{
    BloodPressureReading, CreateBloodPressureRequest, CreateMedicationRequest, DoseRecord,
    Medication,
};
use salud_facil_data::repository::{next_id, HealthRepositoryTrait};

use crate::entities::SlotId;
use crate::i18n::Language;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("no medication with id {0}")]
    MedicationNotFound(i64),

    #[error("no blood pressure reading with id {0}")]
    ReadingNotFound(i64),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct HealthTracker {
    repository: Arc<dyn HealthRepositoryTrait>,
    medications: Vec<Medication>,
    readings: Vec<BloodPressureReading>,
    language: Language,
}

impl HealthTracker {
    /// Load the tracker from the repository.
    ///
    /// Absent keys load as empty collections. A corrupted or unreadable
    /// key is returned as the second element so the caller can surface
    /// it once; the affected collection starts empty and the tracker is
    /// fully usable either way.
    pub async fn load(repository: Arc<dyn HealthRepositoryTrait>) -> (Self, Option<TrackerError>) {
        let mut first_error: Option<TrackerError> = None;

        let medications = match repository.load_medications().await {
            Ok(medications) => medications,
            Err(err) => {
                error!("Failed to load medications: {}", err);
                first_error.get_or_insert(err.into());
                Vec::new()
            }
        };

        let readings = match repository.load_readings().await {
            Ok(readings) => readings,
            Err(err) => {
                error!("Failed to load blood pressure readings: {}", err);
                first_error.get_or_insert(err.into());
                Vec::new()
            }
        };

        let language = match repository.load_language().await {
            Ok(code) => Language::from_code(code.as_deref()),
            Err(err) => {
                error!("Failed to load language: {}", err);
                first_error.get_or_insert(err.into());
                Language::default()
            }
        };

        info!(
            "Loaded {} medications and {} readings",
            medications.len(),
            readings.len()
        );
        (
            Self {
                repository,
                medications,
                readings,
                language,
            },
            first_error,
        )
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn readings(&self) -> &[BloodPressureReading] {
        &self.readings
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Validate and add a medication; its id is stamped from the clock,
    /// bumped past existing ids.
    pub async fn add_medication(
        &mut self,
        request: CreateMedicationRequest,
    ) -> Result<Medication, TrackerError> {
        request.validate()?;
        let id = next_id(
            Utc::now().timestamp_millis(),
            self.medications.iter().map(|m| m.id),
        );
        let medication = Medication::from_request(id, request);
        self.medications.push(medication.clone());
        self.persist_medications().await;
        Ok(medication)
    }

    /// Overwrite an existing medication's definition; the completion log
    /// is preserved.
    pub async fn update_medication(
        &mut self,
        id: i64,
        request: CreateMedicationRequest,
    ) -> Result<(), TrackerError> {
        request.validate()?;
        let medication = self
            .medications
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(TrackerError::MedicationNotFound(id))?;
        medication.apply_request(request);
        self.persist_medications().await;
        Ok(())
    }

    pub async fn delete_medication(&mut self, id: i64) -> Result<(), TrackerError> {
        let before = self.medications.len();
        self.medications.retain(|m| m.id != id);
        if self.medications.len() == before {
            return Err(TrackerError::MedicationNotFound(id));
        }
        self.persist_medications().await;
        Ok(())
    }

    /// Record a completed dose against `slot` for today (UTC calendar
    /// day). The log is append-only and not deduplicated; callers offer
    /// only untaken slots.
    pub async fn mark_taken(&mut self, id: i64, slot: &SlotId) -> Result<(), TrackerError> {
        let medication = self
            .medications
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(TrackerError::MedicationNotFound(id))?;
        medication.taken_dates.push(DoseRecord {
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            identifier: slot.identifier(),
        });
        self.persist_medications().await;
        Ok(())
    }

    /// Validate and add a reading, stamped with the current moment.
    pub async fn add_reading(
        &mut self,
        request: CreateBloodPressureRequest,
    ) -> Result<BloodPressureReading, TrackerError> {
        request.validate()?;
        let id = next_id(
            Utc::now().timestamp_millis(),
            self.readings.iter().map(|r| r.id),
        );
        let reading = BloodPressureReading::from_request(id, now_iso(), request);
        self.readings.push(reading.clone());
        self.persist_readings().await;
        Ok(reading)
    }

    /// Overwrite an existing reading; its timestamp is refreshed to the
    /// moment of the edit.
    pub async fn update_reading(
        &mut self,
        id: i64,
        request: CreateBloodPressureRequest,
    ) -> Result<(), TrackerError> {
        request.validate()?;
        let reading = self
            .readings
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(TrackerError::ReadingNotFound(id))?;
        reading.apply_request(now_iso(), request);
        self.persist_readings().await;
        Ok(())
    }

    pub async fn delete_reading(&mut self, id: i64) -> Result<(), TrackerError> {
        let before = self.readings.len();
        self.readings.retain(|r| r.id != id);
        if self.readings.len() == before {
            return Err(TrackerError::ReadingNotFound(id));
        }
        self.persist_readings().await;
        Ok(())
    }

    pub async fn set_language(&mut self, language: Language) {
        self.language = language;
        if let Err(err) = self.repository.save_language(language.code()).await {
            error!("Failed to save language: {}", err);
        }
    }

    /// Replace both collections at once (restore path) and persist them.
    pub async fn replace_collections(
        &mut self,
        medications: Vec<Medication>,
        readings: Vec<BloodPressureReading>,
    ) {
        self.medications = medications;
        self.readings = readings;
        self.persist_medications().await;
        self.persist_readings().await;
    }

    async fn persist_medications(&self) {
        if let Err(err) = self.repository.save_medications(&self.medications).await {
            error!("Failed to save medications: {}", err);
        }
    }

    async fn persist_readings(&self) {
        if let Err(err) = self.repository.save_readings(&self.readings).await {
            error!("Failed to save blood pressure readings: {}", err);
        }
    }
}

/// Current moment as an ISO-8601 UTC timestamp with millisecond
/// precision, the format the stored documents use.
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
