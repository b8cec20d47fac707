//! Blood pressure chart series.
//!
//! Prepares readings for a line chart: oldest first, with a shared value
//! axis covering all three vitals plus breathing room on each side.

use salud_facil_data::models::BloodPressureReading;

/// Axis padding added below the minimum and above the maximum vital.
const AXIS_PADDING: i32 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Measurement timestamp as stored, ISO-8601.
    pub date: String,
    pub systolic: u16,
    pub diastolic: u16,
    pub pulse: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Points in chronological order, oldest first.
    pub points: Vec<ChartPoint>,
    /// Lower bound of the value axis (may go below zero for very low
    /// pulse values; renderers clamp as they see fit).
    pub min_value: i32,
    /// Upper bound of the value axis.
    pub max_value: i32,
}

/// Build the series, or `None` when fewer than two readings exist (a
/// single point draws no line).
pub fn chart_series(readings: &[BloodPressureReading]) -> Option<ChartSeries> {
    if readings.len() < 2 {
        return None;
    }

    let mut sorted: Vec<&BloodPressureReading> = readings.iter().collect();
    // ISO timestamps order lexicographically.
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let mut min = i32::MAX;
    let mut max = i32::MIN;
    for reading in &sorted {
        for value in [reading.systolic, reading.diastolic, reading.pulse] {
            min = min.min(value as i32);
            max = max.max(value as i32);
        }
    }

    Some(ChartSeries {
        points: sorted
            .into_iter()
            .map(|r| ChartPoint {
                date: r.date.clone(),
                systolic: r.systolic,
                diastolic: r.diastolic,
                pulse: r.pulse,
            })
            .collect(),
        min_value: min - AXIS_PADDING,
        max_value: max + AXIS_PADDING,
    })
}
