//! Static string table and language handling.
//!
//! The translation contract is deliberately forgiving: `translate` returns
//! the stored text for a known key and the raw key itself on a miss. That
//! fallback is part of the interface (callers and tests rely on it), not an
//! accident.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// UI language. Unknown or absent codes fall back to Spanish, the
/// original application's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    It,
    En,
    De,
}

impl Language {
    /// Parse a stored two-letter code, falling back to the default for
    /// anything unknown or absent.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("es") => Language::Es,
            Some("it") => Language::It,
            Some("en") => Language::En,
            Some("de") => Language::De,
            _ => Language::default(),
        }
    }

    /// The two-letter code persisted to storage.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::It => "it",
            Language::En => "en",
            Language::De => "de",
        }
    }
}

/// Look up `key` for `lang`; a miss returns the key itself.
pub fn translate<'a>(lang: Language, key: &'a str) -> &'a str {
    lookup(lang, key).unwrap_or(key)
}

/// Like [`translate`], with `{param}` placeholder substitution.
pub fn translate_with(lang: Language, key: &str, params: &[(&str, &str)]) -> String {
    let mut text = translate(lang, key).to_string();
    for (name, value) in params {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

/// Localization key for a Sunday-based weekday index (0 = Sunday).
pub fn weekday_key(day: u8) -> &'static str {
    match day {
        0 => "sunday",
        1 => "monday",
        2 => "tuesday",
        3 => "wednesday",
        4 => "thursday",
        5 => "friday",
        6 => "saturday",
        _ => "unknownDay",
    }
}

/// Short numeric date in the language's customary order, used when
/// rendering readings into the AI prompt.
pub fn format_date(lang: Language, date: NaiveDate) -> String {
    match lang {
        Language::Es | Language::It => date.format("%d/%m/%Y").to_string(),
        Language::De => date.format("%d.%m.%Y").to_string(),
        Language::En => date.format("%m/%d/%Y").to_string(),
    }
}

fn lookup(lang: Language, key: &str) -> Option<&'static str> {
    match lang {
        Language::Es => lookup_es(key),
        Language::It => lookup_it(key),
        Language::En => lookup_en(key),
        Language::De => lookup_de(key),
    }
}

fn lookup_es(key: &str) -> Option<&'static str> {
    Some(match key {
        "daily" => "Diaria",
        "weekly" => "Semanal",
        "breakfast" => "Desayuno",
        "lunch" => "Almuerzo",
        "dinner" => "Cena",
        "sunday" => "Domingo",
        "monday" => "Lunes",
        "tuesday" => "Martes",
        "wednesday" => "Miércoles",
        "thursday" => "Jueves",
        "friday" => "Viernes",
        "saturday" => "Sábado",
        "fillAllFields" => "Por favor, completa todos los campos.",
        "selectAtLeastOneDay" => "Selecciona al menos un día.",
        "enterAllTimes" => "Introduce todas las horas.",
        "selectMealTime" => "Selecciona al menos una comida.",
        "dataLoadError" => "No se pudieron cargar los datos guardados.",
        "backupSuccess" => "Copia de seguridad creada correctamente.",
        "backupFailed" => "No se pudo crear la copia de seguridad.",
        "restoreSuccess" => "Datos restaurados correctamente.",
        "restoreFailed" => "No se pudo restaurar la copia de seguridad.",
        "exportSuccess" => "Historial exportado correctamente.",
        "needMoreReadingsForAI" => "Se necesitan al menos 5 mediciones para el análisis.",
        "aiAnalysisError" => "No se pudo completar el análisis. Inténtalo de nuevo más tarde.",
        "aiAnalysisDisclaimer" => {
            "Este análisis es informativo y no sustituye el consejo médico profesional."
        }
        "medicationEvent" => "Tomó {name} ({dosage})",
        "bpEvent" => "Tensión {systolic}/{diastolic} mmHg, pulso {pulse} bpm a las {time}",
        _ => return None,
    })
}

fn lookup_it(key: &str) -> Option<&'static str> {
    Some(match key {
        "daily" => "Giornaliera",
        "weekly" => "Settimanale",
        "breakfast" => "Colazione",
        "lunch" => "Pranzo",
        "dinner" => "Cena",
        "sunday" => "Domenica",
        "monday" => "Lunedì",
        "tuesday" => "Martedì",
        "wednesday" => "Mercoledì",
        "thursday" => "Giovedì",
        "friday" => "Venerdì",
        "saturday" => "Sabato",
        "fillAllFields" => "Compila tutti i campi.",
        "selectAtLeastOneDay" => "Seleziona almeno un giorno.",
        "enterAllTimes" => "Inserisci tutti gli orari.",
        "selectMealTime" => "Seleziona almeno un pasto.",
        "dataLoadError" => "Impossibile caricare i dati salvati.",
        "backupSuccess" => "Backup creato correttamente.",
        "backupFailed" => "Impossibile creare il backup.",
        "restoreSuccess" => "Dati ripristinati correttamente.",
        "restoreFailed" => "Impossibile ripristinare il backup.",
        "exportSuccess" => "Cronologia esportata correttamente.",
        "needMoreReadingsForAI" => "Servono almeno 5 misurazioni per l'analisi.",
        "aiAnalysisError" => "Impossibile completare l'analisi. Riprova più tardi.",
        "aiAnalysisDisclaimer" => {
            "Questa analisi è informativa e non sostituisce il parere medico professionale."
        }
        "medicationEvent" => "Assunto {name} ({dosage})",
        "bpEvent" => "Pressione {systolic}/{diastolic} mmHg, polso {pulse} bpm alle {time}",
        _ => return None,
    })
}

fn lookup_en(key: &str) -> Option<&'static str> {
    Some(match key {
        "daily" => "Daily",
        "weekly" => "Weekly",
        "breakfast" => "Breakfast",
        "lunch" => "Lunch",
        "dinner" => "Dinner",
        "sunday" => "Sunday",
        "monday" => "Monday",
        "tuesday" => "Tuesday",
        "wednesday" => "Wednesday",
        "thursday" => "Thursday",
        "friday" => "Friday",
        "saturday" => "Saturday",
        "fillAllFields" => "Please fill in all fields.",
        "selectAtLeastOneDay" => "Select at least one day.",
        "enterAllTimes" => "Enter all times.",
        "selectMealTime" => "Select at least one meal.",
        "dataLoadError" => "Could not load saved data.",
        "backupSuccess" => "Backup created successfully.",
        "backupFailed" => "Could not create the backup.",
        "restoreSuccess" => "Data restored successfully.",
        "restoreFailed" => "Could not restore the backup.",
        "exportSuccess" => "History exported successfully.",
        "needMoreReadingsForAI" => "At least 5 readings are needed for the analysis.",
        "aiAnalysisError" => "The analysis could not be completed. Please try again later.",
        "aiAnalysisDisclaimer" => {
            "This analysis is informational and does not replace professional medical advice."
        }
        "medicationEvent" => "Took {name} ({dosage})",
        "bpEvent" => "Blood pressure {systolic}/{diastolic} mmHg, pulse {pulse} bpm at {time}",
        _ => return None,
    })
}

fn lookup_de(key: &str) -> Option<&'static str> {
    Some(match key {
        "daily" => "Täglich",
        "weekly" => "Wöchentlich",
        "breakfast" => "Frühstück",
        "lunch" => "Mittagessen",
        "dinner" => "Abendessen",
        "sunday" => "Sonntag",
        "monday" => "Montag",
        "tuesday" => "Dienstag",
        "wednesday" => "Mittwoch",
        "thursday" => "Donnerstag",
        "friday" => "Freitag",
        "saturday" => "Samstag",
        "fillAllFields" => "Bitte alle Felder ausfüllen.",
        "selectAtLeastOneDay" => "Wähle mindestens einen Tag.",
        "enterAllTimes" => "Alle Uhrzeiten eingeben.",
        "selectMealTime" => "Wähle mindestens eine Mahlzeit.",
        "dataLoadError" => "Gespeicherte Daten konnten nicht geladen werden.",
        "backupSuccess" => "Sicherung erfolgreich erstellt.",
        "backupFailed" => "Sicherung konnte nicht erstellt werden.",
        "restoreSuccess" => "Daten erfolgreich wiederhergestellt.",
        "restoreFailed" => "Sicherung konnte nicht wiederhergestellt werden.",
        "exportSuccess" => "Verlauf erfolgreich exportiert.",
        "needMoreReadingsForAI" => "Für die Analyse werden mindestens 5 Messungen benötigt.",
        "aiAnalysisError" => {
            "Die Analyse konnte nicht abgeschlossen werden. Bitte später erneut versuchen."
        }
        "aiAnalysisDisclaimer" => {
            "Diese Analyse dient nur zur Information und ersetzt keinen ärztlichen Rat."
        }
        "medicationEvent" => "{name} eingenommen ({dosage})",
        "bpEvent" => "Blutdruck {systolic}/{diastolic} mmHg, Puls {pulse} bpm um {time}",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_falls_back_to_spanish() {
        assert_eq!(Language::from_code(Some("fr")), Language::Es);
        assert_eq!(Language::from_code(None), Language::Es);
        assert_eq!(Language::from_code(Some("de")), Language::De);
    }

    #[test]
    fn missing_key_returns_the_key_itself() {
        // Documented contract: lookup(key) -> text | key.
        assert_eq!(translate(Language::En, "weekly-3"), "weekly-3");
        assert_eq!(translate(Language::Es, "noSuchKey"), "noSuchKey");
    }

    #[test]
    fn known_key_translates_per_language() {
        assert_eq!(translate(Language::Es, "lunch"), "Almuerzo");
        assert_eq!(translate(Language::It, "lunch"), "Pranzo");
        assert_eq!(translate(Language::De, "daily"), "Täglich");
    }

    #[test]
    fn params_are_substituted() {
        let text = translate_with(
            Language::En,
            "medicationEvent",
            &[("name", "Aspirin"), ("dosage", "100mg")],
        );
        assert_eq!(text, "Took Aspirin (100mg)");
    }

    #[test]
    fn date_formats_follow_language() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(format_date(Language::Es, date), "31/01/2024");
        assert_eq!(format_date(Language::De, date), "31.01.2024");
        assert_eq!(format_date(Language::En, date), "01/31/2024");
    }
}
