use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// How often a medication is scheduled.
///
/// The variant decides which of the schedule fields on [`Medication`]
/// are meaningful: `days` for `Weekly`, `times` for `SpecificTime`,
/// `meal_times` for `MealTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    SpecificTime,
    MealTime,
}

/// Meal slot for meal-bound medications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    /// Stable name used inside dose identifiers ("meal-breakfast" etc.)
    /// and as the localization key.
    pub fn name(&self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
        }
    }
}

/// One completed dose: the local day it was taken plus the slot
/// identifier (e.g. "daily", "weekly-3", "time-08:00", "meal-lunch").
///
/// The list these live in is append-only; a given (date, identifier)
/// pair should appear at most once, but the model does not deduplicate —
/// callers guard before appending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseRecord {
    /// Local calendar day, "YYYY-MM-DD"
    pub date: String,

    /// Which slot of that day was completed
    pub identifier: String,
}

/// Domain model for a tracked medication.
///
/// Serialized field names match the original backup/storage document
/// format (camelCase, weekday indices as strings), so existing backup
/// files restore unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Unique identifier, monotonic by creation order
    pub id: i64,

    /// Medication name
    pub name: String,

    /// Dose description (free text, e.g. "500mg")
    pub dosage: String,

    /// Recurrence rule selector
    pub frequency: Frequency,

    /// Weekday indices 0-6, Sunday = 0; used only when frequency is weekly
    #[serde(with = "weekday_wire", default)]
    pub days: Vec<u8>,

    /// "HH:MM" entries; used only when frequency is specific_time
    #[serde(default)]
    pub times: Vec<String>,

    /// Meal slots; used only when frequency is meal_time
    #[serde(default)]
    pub meal_times: Vec<Meal>,

    /// Append-only completion log, one entry per completed dose slot per day
    #[serde(default)]
    pub taken_dates: Vec<DoseRecord>,
}

/// Request payload for creating or fully overwriting a medication.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_schedule_fields"))]
pub struct CreateMedicationRequest {
    /// Medication name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    /// Dose description
    #[validate(length(min = 1, message = "Dosage is required"))]
    pub dosage: String,

    /// Recurrence rule selector
    pub frequency: Frequency,

    /// Weekday indices for weekly medications
    #[serde(default)]
    pub days: Vec<u8>,

    /// "HH:MM" entries for specific-time medications
    #[serde(default)]
    pub times: Vec<String>,

    /// Meal slots for meal-bound medications
    #[serde(default)]
    pub meal_times: Vec<Meal>,
}

/// Frequency-specific requirements: weekly needs at least one day,
/// specific_time at least one non-blank time, meal_time at least one meal.
fn validate_schedule_fields(request: &CreateMedicationRequest) -> Result<(), ValidationError> {
    match request.frequency {
        Frequency::Daily => Ok(()),
        Frequency::Weekly => {
            if request.days.is_empty() {
                return Err(ValidationError::new("selectAtLeastOneDay"));
            }
            if request.days.iter().any(|d| *d > 6) {
                return Err(ValidationError::new("invalidWeekday"));
            }
            Ok(())
        }
        Frequency::SpecificTime => {
            if request.times.is_empty() || request.times.iter().any(|t| t.trim().is_empty()) {
                return Err(ValidationError::new("enterAllTimes"));
            }
            Ok(())
        }
        Frequency::MealTime => {
            if request.meal_times.is_empty() {
                return Err(ValidationError::new("selectMealTime"));
            }
            Ok(())
        }
    }
}

impl Medication {
    /// Build a new medication from a validated request with an empty
    /// completion log.
    pub fn from_request(id: i64, request: CreateMedicationRequest) -> Self {
        Self {
            id,
            name: request.name,
            dosage: request.dosage,
            frequency: request.frequency,
            days: request.days,
            times: request.times,
            meal_times: request.meal_times,
            taken_dates: Vec::new(),
        }
    }

    /// Full-field overwrite from an edit request. The completion log is
    /// preserved; records are never partially updated.
    pub fn apply_request(&mut self, request: CreateMedicationRequest) {
        self.name = request.name;
        self.dosage = request.dosage;
        self.frequency = request.frequency;
        self.days = request.days;
        self.times = request.times;
        self.meal_times = request.meal_times;
    }

    /// Whether the slot identified by `identifier` was completed on `date`.
    pub fn taken_on(&self, date: &str, identifier: &str) -> bool {
        self.taken_dates
            .iter()
            .any(|dose| dose.date == date && dose.identifier == identifier)
    }
}

/// Weekday indices travel as JSON strings ("0".."6") in the stored
/// document format. Unparseable entries are dropped on read.
mod weekday_wire {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(days: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let as_strings: Vec<String> = days.iter().map(|d| d.to_string()).collect();
        as_strings.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let as_strings = Vec::<String>::deserialize(deserializer)?;
        Ok(as_strings
            .iter()
            .filter_map(|s| s.parse::<u8>().ok())
            .collect())
    }
}
