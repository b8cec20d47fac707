//! Unified history events.
//!
//! The history view merges medication intakes and blood pressure readings
//! into a single reverse-chronological stream. Events carry pre-split
//! date and time fields because the two sources record moments at
//! different precisions (a dose record keeps a slot identifier, a
//! reading keeps a wall-clock `HH:MM`).

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    MedicationTaken {
        /// Day of the intake, `YYYY-MM-DD`.
        date: String,
        medication_name: String,
        dosage: String,
        /// Raw slot identifier as persisted (e.g. `"meal-lunch"`).
        /// Kept unparsed so records outside the grammar still render.
        identifier: String,
    },
    ReadingRecorded {
        /// Day of the measurement, `YYYY-MM-DD`.
        date: String,
        /// Wall-clock time of the measurement, `HH:MM`.
        time: String,
        systolic: u16,
        diastolic: u16,
        pulse: u16,
        notes: String,
    },
}

impl HistoryEvent {
    /// The day the event belongs to, used for sorting and grouping.
    pub fn date(&self) -> &str {
        match self {
            HistoryEvent::MedicationTaken { date, .. } => date,
            HistoryEvent::ReadingRecorded { date, .. } => date,
        }
    }
}
