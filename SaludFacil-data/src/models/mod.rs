pub mod medication;
pub mod blood_pressure;

pub use blood_pressure::{BloodPressureReading, CreateBloodPressureRequest};
pub use medication::{CreateMedicationRequest, DoseRecord, Frequency, Meal, Medication};
