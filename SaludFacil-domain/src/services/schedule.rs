//! Recurrence evaluation.
//!
//! Produces the dose slots a medication schedules for a given moment. The
//! functions are pure over the supplied clock value so the edge cases
//! (window boundaries, midnight, week rollover) are directly testable.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use salud_facil_data::models::{Frequency, Meal, Medication};

use crate::entities::{DoseSlot, SlotId};
use crate::i18n::{self, Language};

/// Clock-time tolerance around a specific-time slot, in minutes. A dose
/// at 08:00 is open from 07:30 through 08:30 inclusive.
const TIME_SLOT_TOLERANCE_MINUTES: i64 = 30;

/// Meal windows as half-open minute-of-day ranges `[start, end)`.
fn meal_window(meal: Meal) -> (u32, u32) {
    match meal {
        Meal::Breakfast => (6 * 60, 10 * 60),
        Meal::Lunch => (12 * 60, 15 * 60),
        Meal::Dinner => (18 * 60, 22 * 60),
    }
}

/// Sunday-based weekday index (0 = Sunday .. 6 = Saturday) for the date
/// component of `now`.
fn weekday_index(now: NaiveDateTime) -> u8 {
    now.date().weekday().num_days_from_sunday() as u8
}

/// All dose slots `medication` schedules for the day of `now`, in
/// declaration order, each flagged with whether its window is currently
/// open and whether a dose was already recorded against it today.
///
/// Rules by frequency:
/// - daily: one slot, actionable all day;
/// - weekly: one slot on a configured weekday (none otherwise),
///   actionable all day;
/// - specific time: one slot per entry, actionable within ±30 minutes of
///   the slot time, boundaries included;
/// - meal time: one slot per entry, actionable while the wall clock sits
///   inside the meal's window (end exclusive).
pub fn doses_for_today(medication: &Medication, now: NaiveDateTime) -> Vec<DoseSlot> {
    let today = now.date().format("%Y-%m-%d").to_string();
    let slots: Vec<(SlotId, bool)> = match medication.frequency {
        Frequency::Daily => vec![(SlotId::Daily, true)],
        Frequency::Weekly => {
            let today_index = weekday_index(now);
            if medication.days.contains(&today_index) {
                vec![(SlotId::Weekly(today_index), true)]
            } else {
                Vec::new()
            }
        }
        Frequency::SpecificTime => medication
            .times
            .iter()
            .map(|time| {
                let open = time_slot_is_open(time, now.time());
                (SlotId::Time(time.clone()), open)
            })
            .collect(),
        Frequency::MealTime => medication
            .meal_times
            .iter()
            .copied()
            .map(|meal| (SlotId::Meal(meal), meal_slot_is_open(meal, now.time())))
            .collect(),
    };

    slots
        .into_iter()
        .map(|(slot, actionable)| {
            let taken = medication.taken_on(&today, &slot.identifier());
            DoseSlot {
                slot,
                taken,
                actionable,
            }
        })
        .collect()
}

/// Label for a slot button on the medication list: daily and weekly
/// slots show the frequency word, timed slots the clock time, meal slots
/// the meal name.
pub fn display_label(slot: &SlotId, lang: Language) -> String {
    match slot {
        SlotId::Daily => i18n::translate(lang, "daily").to_string(),
        SlotId::Weekly(_) => i18n::translate(lang, "weekly").to_string(),
        SlotId::Time(time) => time.clone(),
        SlotId::Meal(meal) => i18n::translate(lang, meal.name()).to_string(),
    }
}

/// Medications in display order: by name, case-insensitive ascending.
pub fn sort_for_display(medications: &mut [Medication]) {
    medications.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

fn time_slot_is_open(slot_time: &str, now: NaiveTime) -> bool {
    let Ok(slot) = NaiveTime::parse_from_str(slot_time, "%H:%M") else {
        // Unparseable times never open; the slot stays visible but
        // cannot become actionable.
        return false;
    };
    let now_minutes = (now.hour() * 60 + now.minute()) as i64;
    let slot_minutes = (slot.hour() * 60 + slot.minute()) as i64;
    (now_minutes - slot_minutes).abs() <= TIME_SLOT_TOLERANCE_MINUTES
}

fn meal_slot_is_open(meal: Meal, now: NaiveTime) -> bool {
    let minutes = now.hour() * 60 + now.minute();
    let (start, end) = meal_window(meal);
    minutes >= start && minutes < end
}
