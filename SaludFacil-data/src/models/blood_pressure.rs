use serde::{Deserialize, Serialize};
use validator::Validate;

/// Domain model for a blood pressure reading.
///
/// Serialized field names match the original stored document format
/// (camelCase). The reminder fields are stored but inert: nothing
/// schedules or fires them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodPressureReading {
    /// Unique identifier (creation timestamp derived)
    pub id: i64,

    /// Systolic blood pressure (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: u16,

    /// Pulse rate in beats per minute
    pub pulse: u16,

    /// Optional notes about the reading (empty = none)
    #[serde(default)]
    pub notes: String,

    /// When the reading was recorded, ISO-8601; set at creation/update
    /// time, never user-editable
    pub date: String,

    /// Stored reminder time ("HH:MM"), never scheduled
    #[serde(default)]
    pub reminder_time: String,

    /// Stored reminder weekdays, never scheduled
    #[serde(default)]
    pub reminder_days: Vec<String>,
}

/// Request payload for creating or fully overwriting a reading.
/// The timestamp is stamped by the store, not supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBloodPressureRequest {
    /// Systolic blood pressure (the higher number)
    #[validate(range(min = 1, message = "Systolic must be a positive number"))]
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    #[validate(range(min = 1, message = "Diastolic must be a positive number"))]
    pub diastolic: u16,

    /// Pulse rate in beats per minute
    #[validate(range(min = 1, message = "Pulse must be a positive number"))]
    pub pulse: u16,

    /// Optional notes
    #[serde(default)]
    pub notes: String,

    /// Stored reminder time, inert
    #[serde(default)]
    pub reminder_time: String,

    /// Stored reminder weekdays, inert
    #[serde(default)]
    pub reminder_days: Vec<String>,
}

impl BloodPressureReading {
    /// Build a new reading from a validated request, stamped with `date`.
    pub fn from_request(id: i64, date: String, request: CreateBloodPressureRequest) -> Self {
        Self {
            id,
            systolic: request.systolic,
            diastolic: request.diastolic,
            pulse: request.pulse,
            notes: request.notes,
            date,
            reminder_time: request.reminder_time,
            reminder_days: request.reminder_days,
        }
    }

    /// Full-field overwrite from an edit request; the timestamp is
    /// refreshed to the moment of the edit.
    pub fn apply_request(&mut self, date: String, request: CreateBloodPressureRequest) {
        self.systolic = request.systolic;
        self.diastolic = request.diastolic;
        self.pulse = request.pulse;
        self.notes = request.notes;
        self.date = date;
        self.reminder_time = request.reminder_time;
        self.reminder_days = request.reminder_days;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vitals_rejected() {
        let request = CreateBloodPressureRequest {
            systolic: 0,
            diastolic: 80,
            pulse: 70,
            notes: String::new(),
            reminder_time: String::new(),
            reminder_days: Vec::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn wire_format_tolerates_missing_optional_fields() {
        // Older documents may lack notes/reminder fields entirely.
        let json = r#"{
            "id": 1718000000001,
            "systolic": 128,
            "diastolic": 82,
            "pulse": 66,
            "date": "2024-01-06T09:30:00.000Z"
        }"#;

        let reading: BloodPressureReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.notes, "");
        assert!(reading.reminder_days.is_empty());

        let back = serde_json::to_value(&reading).unwrap();
        assert_eq!(back["reminderTime"], "");
    }

    #[test]
    fn edit_refreshes_timestamp() {
        let request = CreateBloodPressureRequest {
            systolic: 120,
            diastolic: 80,
            pulse: 70,
            notes: "morning".to_string(),
            reminder_time: String::new(),
            reminder_days: Vec::new(),
        };
        let mut reading =
            BloodPressureReading::from_request(1, "2024-01-05T08:00:00Z".to_string(), request.clone());

        reading.apply_request("2024-01-06T10:00:00Z".to_string(), request);
        assert_eq!(reading.date, "2024-01-06T10:00:00Z");
    }
}
