//! Backup and restore of the full tracked state.
//!
//! A backup is one pretty-printed JSON document holding both collections.
//! Restore is strict about shape: a document missing either top-level
//! section is rejected before any typed decoding, so a failed restore
//! never leaves half of the state replaced.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use salud_facil_data::models::{BloodPressureReading, Medication};

const FILE_NAME_PREFIX: &str = "salud_facil_backup_";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("backup document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("backup document is missing the '{0}' section")]
    MissingSection(&'static str),
}

/// The backup document. Field names match the stored collection
/// documents so a backup is readable by the original application too.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub medications: Vec<Medication>,
    pub blood_pressure_readings: Vec<BloodPressureReading>,
}

/// File name for a backup taken on `date`:
/// `salud_facil_backup_YYYY-MM-DD.json`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("{FILE_NAME_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

/// Serialize both collections to the pretty-printed backup document.
pub fn render_backup(
    medications: &[Medication],
    readings: &[BloodPressureReading],
) -> Result<String, BackupError> {
    let document = BackupDocument {
        medications: medications.to_vec(),
        blood_pressure_readings: readings.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write a backup into `dir`, named for `date`. Returns the full path
/// of the written file.
pub async fn write_backup(
    dir: &Path,
    date: NaiveDate,
    medications: &[Medication],
    readings: &[BloodPressureReading],
) -> Result<PathBuf, BackupError> {
    let path = dir.join(backup_file_name(date));
    let document = render_backup(medications, readings)?;
    tokio::fs::write(&path, document).await?;
    info!(
        "Wrote backup of {} medications and {} readings to {}",
        medications.len(),
        readings.len(),
        path.display()
    );
    Ok(path)
}

/// Parse a backup document.
///
/// Both top-level sections must be present, even if empty; their absence
/// usually means the user picked the wrong file, and a partial restore
/// would silently wipe one collection.
pub fn parse_backup(raw: &str) -> Result<BackupDocument, BackupError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    for section in ["medications", "bloodPressureReadings"] {
        if value.get(section).map(|v| v.is_array()) != Some(true) {
            return Err(BackupError::MissingSection(section));
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Read and parse a backup file.
pub async fn read_backup(path: &Path) -> Result<BackupDocument, BackupError> {
    let raw = tokio::fs::read_to_string(path).await?;
    parse_backup(&raw)
}

/// Restore a backup payload into the tracker. The payload is fully
/// parsed before anything is replaced, so a failure leaves the tracker
/// exactly as it was.
pub async fn restore(
    tracker: &mut crate::services::tracker::HealthTracker,
    payload: &str,
) -> Result<(), BackupError> {
    let document = parse_backup(payload)?;
    info!(
        "Restoring {} medications and {} readings from backup",
        document.medications.len(),
        document.blood_pressure_readings.len()
    );
    tracker
        .replace_collections(document.medications, document.blood_pressure_readings)
        .await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use salud_facil_data::models::{CreateMedicationRequest, Frequency};

    fn sample_medication() -> Medication {
        Medication::from_request(
            1718000000000,
            CreateMedicationRequest {
                name: "Aspirina".to_string(),
                dosage: "100mg".to_string(),
                frequency: Frequency::Daily,
                days: vec![],
                times: vec![],
                meal_times: vec![],
            },
        )
    }

    #[test]
    fn file_name_embeds_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(backup_file_name(date), "salud_facil_backup_2024-03-05.json");
    }

    #[test]
    fn rendered_backup_parses_back() {
        let meds = vec![sample_medication()];
        let rendered = render_backup(&meds, &[]).unwrap();
        let document = parse_backup(&rendered).unwrap();
        assert_eq!(document.medications.len(), 1);
        assert_eq!(document.medications[0].name, "Aspirina");
        assert!(document.blood_pressure_readings.is_empty());
    }

    #[test]
    fn missing_section_is_rejected() {
        let err = parse_backup(r#"{"medications": []}"#).unwrap_err();
        assert!(matches!(
            err,
            BackupError::MissingSection("bloodPressureReadings")
        ));

        let err = parse_backup(r#"{"bloodPressureReadings": []}"#).unwrap_err();
        assert!(matches!(err, BackupError::MissingSection("medications")));

        // Present but wrong type counts as missing.
        let err =
            parse_backup(r#"{"medications": {}, "bloodPressureReadings": []}"#).unwrap_err();
        assert!(matches!(err, BackupError::MissingSection("medications")));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            parse_backup("not json at all"),
            Err(BackupError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let meds = vec![sample_medication()];

        let path = write_backup(dir.path(), date, &meds, &[]).await.unwrap();
        assert!(path.ends_with("salud_facil_backup_2024-03-05.json"));

        let document = read_backup(&path).await.unwrap();
        assert_eq!(document.medications[0].id, 1718000000000);
    }
}
