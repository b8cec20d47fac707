//! History aggregation, filtering, grouping and CSV export.

use indexmap::IndexMap;
use salud_facil_data::models::{BloodPressureReading, Medication};

use crate::entities::{HistoryEvent, SlotId};
use crate::i18n::Language;

/// File name offered for the exported history.
pub const EXPORT_FILE_NAME: &str = "historial_salud_facil.csv";

/// Column header of the exported CSV. Medication and reading rows share
/// the columns, so several carry double duty.
const CSV_HEADER: &str = "Tipo,Fecha,Hora/Momento,Medicamento/Sistólica,Dosis/Diastólica,Pulso,Notas";

/// Flatten medications and readings into one event stream, newest day
/// first. The sort is stable: within the same day, medication intakes
/// keep their log order and precede readings, mirroring how the stream
/// is assembled.
pub fn collect_events(
    medications: &[Medication],
    readings: &[BloodPressureReading],
) -> Vec<HistoryEvent> {
    let mut events: Vec<HistoryEvent> = Vec::new();

    for medication in medications {
        for dose in &medication.taken_dates {
            events.push(HistoryEvent::MedicationTaken {
                date: dose.date.clone(),
                medication_name: medication.name.clone(),
                dosage: medication.dosage.clone(),
                identifier: dose.identifier.clone(),
            });
        }
    }

    for reading in readings {
        let (date, time) = split_timestamp(&reading.date);
        events.push(HistoryEvent::ReadingRecorded {
            date,
            time,
            systolic: reading.systolic,
            diastolic: reading.diastolic,
            pulse: reading.pulse,
            notes: reading.notes.clone(),
        });
    }

    // ISO day strings order lexicographically, so a string compare is a
    // chronological compare.
    events.sort_by(|a, b| b.date().cmp(a.date()));
    events
}

/// Case-insensitive substring filter. Medication events match on name or
/// dosage; reading events on the systolic/diastolic values (as digits)
/// or the notes. An empty query passes everything through.
pub fn filter_events(events: &[HistoryEvent], query: &str) -> Vec<HistoryEvent> {
    if query.is_empty() {
        return events.to_vec();
    }
    let needle = query.to_lowercase();
    events
        .iter()
        .filter(|event| match event {
            HistoryEvent::MedicationTaken {
                medication_name,
                dosage,
                ..
            } => {
                medication_name.to_lowercase().contains(&needle)
                    || dosage.to_lowercase().contains(&needle)
            }
            HistoryEvent::ReadingRecorded {
                systolic,
                diastolic,
                notes,
                ..
            } => {
                systolic.to_string().contains(&needle)
                    || diastolic.to_string().contains(&needle)
                    || notes.to_lowercase().contains(&needle)
            }
        })
        .cloned()
        .collect()
}

/// Group events by day, preserving the stream's order both across and
/// within groups.
pub fn group_by_date(events: Vec<HistoryEvent>) -> IndexMap<String, Vec<HistoryEvent>> {
    let mut groups: IndexMap<String, Vec<HistoryEvent>> = IndexMap::new();
    for event in events {
        groups.entry(event.date().to_string()).or_default().push(event);
    }
    groups
}

/// Display label for a dose slot identifier: recognized identifiers get
/// their localized label, anything else renders verbatim.
pub fn slot_label(identifier: &str, lang: Language) -> String {
    match SlotId::parse(identifier) {
        Some(slot) => slot.label(lang),
        None => identifier.to_string(),
    }
}

/// Render the event stream as CSV. Free-text columns are quoted with
/// doubled-quote escaping; numeric columns are written bare. Medication
/// rows leave the pulse and notes columns empty.
pub fn export_csv(events: &[HistoryEvent], lang: Language) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for event in events {
        match event {
            HistoryEvent::MedicationTaken {
                date,
                medication_name,
                dosage,
                identifier,
            } => {
                let moment = slot_label(identifier, lang);
                csv.push_str(&format!(
                    "Medicamento,{date},{},{},{},,\n",
                    quote(&moment),
                    quote(medication_name),
                    quote(dosage),
                ));
            }
            HistoryEvent::ReadingRecorded {
                date,
                time,
                systolic,
                diastolic,
                pulse,
                notes,
            } => {
                csv.push_str(&format!(
                    "Tensión Arterial,{date},{time},{systolic},{diastolic},{pulse},{}\n",
                    quote(notes),
                ));
            }
        }
    }
    csv
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Split a stored ISO-8601 timestamp into (`YYYY-MM-DD`, `HH:MM`).
/// Timestamps shorter than expected degrade to what is present rather
/// than failing the whole export.
fn split_timestamp(timestamp: &str) -> (String, String) {
    let date = timestamp.get(..10).unwrap_or(timestamp).to_string();
    let time = timestamp.get(11..16).unwrap_or("").to_string();
    (date, time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use salud_facil_data::models::{CreateMedicationRequest, DoseRecord, Frequency};

    fn medication(name: &str, dosage: &str, doses: &[(&str, &str)]) -> Medication {
        let mut med = Medication::from_request(
            1,
            CreateMedicationRequest {
                name: name.to_string(),
                dosage: dosage.to_string(),
                frequency: Frequency::Daily,
                days: vec![],
                times: vec![],
                meal_times: vec![],
            },
        );
        med.taken_dates = doses
            .iter()
            .map(|(date, identifier)| DoseRecord {
                date: date.to_string(),
                identifier: identifier.to_string(),
            })
            .collect();
        med
    }

    fn reading(date: &str, systolic: u16, diastolic: u16, pulse: u16, notes: &str) -> BloodPressureReading {
        BloodPressureReading {
            id: 1,
            systolic,
            diastolic,
            pulse,
            notes: notes.to_string(),
            date: date.to_string(),
            reminder_time: String::new(),
            reminder_days: Vec::new(),
        }
    }

    #[test]
    fn events_sort_newest_first_and_keep_source_order_within_a_day() {
        let meds = vec![medication(
            "Aspirina",
            "100mg",
            &[("2024-01-05", "daily"), ("2024-01-06", "daily")],
        )];
        let readings = vec![reading("2024-01-06T09:30:00.000Z", 128, 82, 66, "")];

        let events = collect_events(&meds, &readings);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].date(), "2024-01-06");
        assert_eq!(events[1].date(), "2024-01-06");
        assert_eq!(events[2].date(), "2024-01-05");
        // Same day: the medication intake was assembled before the
        // reading and the stable sort keeps it there.
        assert!(matches!(events[0], HistoryEvent::MedicationTaken { .. }));
        assert!(matches!(events[1], HistoryEvent::ReadingRecorded { .. }));
    }

    #[test]
    fn filter_matches_name_dosage_values_and_notes() {
        let meds = vec![medication("Aspirina", "100mg", &[("2024-01-05", "daily")])];
        let readings = vec![reading("2024-01-06T09:30:00.000Z", 128, 82, 66, "después de correr")];
        let events = collect_events(&meds, &readings);

        assert_eq!(filter_events(&events, "").len(), 2);
        assert_eq!(filter_events(&events, "ASPI").len(), 1);
        assert_eq!(filter_events(&events, "100mg").len(), 1);
        assert_eq!(filter_events(&events, "128").len(), 1);
        assert_eq!(filter_events(&events, "CORRER").len(), 1);
        assert!(filter_events(&events, "ibuprofeno").is_empty());
    }

    #[test]
    fn grouping_preserves_stream_order() {
        let meds = vec![medication(
            "Aspirina",
            "100mg",
            &[("2024-01-05", "daily"), ("2024-01-06", "daily")],
        )];
        let groups = group_by_date(collect_events(&meds, &[]));
        let days: Vec<&String> = groups.keys().collect();
        assert_eq!(days, vec!["2024-01-06", "2024-01-05"]);
    }

    #[test]
    fn slot_labels_localize_and_fall_back_verbatim() {
        assert_eq!(slot_label("daily", Language::Es), "Diaria");
        assert_eq!(slot_label("weekly-3", Language::Es), "Miércoles");
        assert_eq!(slot_label("time-08:30", Language::Es), "08:30");
        assert_eq!(slot_label("meal-lunch", Language::It), "Pranzo");
        assert_eq!(slot_label("someday", Language::Es), "someday");
    }

    #[test]
    fn csv_escapes_quotes_and_leaves_medication_vitals_blank() {
        let meds = vec![medication(
            "Jarabe \"Forte\"",
            "5ml",
            &[("2024-01-05", "meal-dinner")],
        )];
        let readings = vec![reading(
            "2024-01-06T09:30:00.000Z",
            128,
            82,
            66,
            "con \"mareo\"",
        )];
        let csv = export_csv(&collect_events(&meds, &readings), Language::Es);

        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Tipo,Fecha,Hora/Momento,Medicamento/Sistólica,Dosis/Diastólica,Pulso,Notas"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Tensión Arterial,2024-01-06,09:30,128,82,66,\"con \"\"mareo\"\"\""
        );
        assert_eq!(
            lines.next().unwrap(),
            "Medicamento,2024-01-05,\"Cena\",\"Jarabe \"\"Forte\"\"\",\"5ml\",,"
        );
    }

    #[test]
    fn short_timestamp_degrades_gracefully() {
        let readings = vec![reading("2024-01-06", 120, 80, 60, "")];
        let events = collect_events(&[], &readings);
        match &events[0] {
            HistoryEvent::ReadingRecorded { date, time, .. } => {
                assert_eq!(date, "2024-01-06");
                assert_eq!(time, "");
            }
            _ => panic!("expected a reading event"),
        }
    }
}
