//! Dose slot identifiers.
//!
//! Every dose a medication can call for on a given day is addressed by a
//! slot identifier. Persisted dose records store the identifier in its
//! string form (`"daily"`, `"weekly-3"`, `"time-08:30"`, `"meal-lunch"`),
//! so the string grammar is a stable wire format; in code the identifier
//! is a tagged enum and the strings only appear at the storage edge.

use salud_facil_data::models::Meal;

use crate::i18n::{self, Language};

/// One schedulable dose slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// The single daily dose.
    Daily,
    /// A weekly dose on the given Sunday-based weekday index (0-6).
    Weekly(u8),
    /// A dose pinned to a clock time, stored as `HH:MM`.
    Time(String),
    /// A dose tied to a meal window.
    Meal(Meal),
}

impl SlotId {
    /// Render the persisted string form.
    pub fn identifier(&self) -> String {
        match self {
            SlotId::Daily => "daily".to_string(),
            SlotId::Weekly(day) => format!("weekly-{day}"),
            SlotId::Time(time) => format!("time-{time}"),
            SlotId::Meal(meal) => format!("meal-{}", meal.name()),
        }
    }

    /// Parse a persisted identifier. Returns `None` for strings outside
    /// the grammar; callers treat those as foreign records and leave
    /// them alone.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "daily" {
            return Some(SlotId::Daily);
        }
        if let Some(day) = raw.strip_prefix("weekly-") {
            let day: u8 = day.parse().ok()?;
            if day > 6 {
                return None;
            }
            return Some(SlotId::Weekly(day));
        }
        if let Some(time) = raw.strip_prefix("time-") {
            return Some(SlotId::Time(time.to_string()));
        }
        if let Some(meal) = raw.strip_prefix("meal-") {
            let meal = match meal {
                "breakfast" => Meal::Breakfast,
                "lunch" => Meal::Lunch,
                "dinner" => Meal::Dinner,
                _ => return None,
            };
            return Some(SlotId::Meal(meal));
        }
        None
    }

    /// Human-readable label for history rows and the medication list.
    pub fn label(&self, lang: Language) -> String {
        match self {
            SlotId::Daily => i18n::translate(lang, "daily").to_string(),
            SlotId::Weekly(day) => i18n::translate(lang, i18n::weekday_key(*day)).to_string(),
            SlotId::Time(time) => time.clone(),
            SlotId::Meal(meal) => i18n::translate(lang, meal.name()).to_string(),
        }
    }
}

/// A slot scheduled for today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseSlot {
    pub slot: SlotId,
    /// A dose was already recorded against this slot today.
    pub taken: bool,
    /// The wall clock currently sits inside the slot's window. Daily and
    /// weekly slots are actionable all day.
    pub actionable: bool,
}
