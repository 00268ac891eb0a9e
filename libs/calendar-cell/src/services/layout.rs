use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{CalendarAppointment, DayView, DayWindow, LayoutAssignment};
use crate::services::day_view::build_day_view;

/// Horizontal gap, in percent of track width, left between adjacent columns.
pub const COLUMN_GUTTER_PERCENT: f64 = 0.5;

/// Half-open interval intersection: appointments that only touch at an
/// endpoint do not overlap.
pub fn appointments_overlap(a: &CalendarAppointment, b: &CalendarAppointment) -> bool {
    a.start_time < b.end_time && b.start_time < a.end_time
}

/// Assign every appointment to a display column so that overlapping
/// appointments never share one.
///
/// Appointments are placed greedily in start order, longer ones first on
/// equal starts, each into the leftmost column that has room. Width is sized
/// by `max_concurrent`, the number of appointments overlapping this one
/// (itself included) across the whole input. For non-transitive overlap
/// chains that can exceed the number of columns actually used.
///
/// The result is in placement order, not input order.
pub fn layout_appointments(appointments: &[CalendarAppointment]) -> Vec<LayoutAssignment> {
    layout_with_sources(appointments)
        .into_iter()
        .map(|(_, assignment)| assignment)
        .collect()
}

/// Same as [`layout_appointments`], paired with the appointment each
/// assignment was computed for.
pub(crate) fn layout_with_sources(
    appointments: &[CalendarAppointment],
) -> Vec<(&CalendarAppointment, LayoutAssignment)> {
    if appointments.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&CalendarAppointment> = appointments.iter().collect();
    sorted.sort_by(|a, b| placement_order(a, b));

    let mut columns: Vec<Vec<&CalendarAppointment>> = Vec::new();
    let mut placements: Vec<usize> = Vec::with_capacity(sorted.len());

    for &appointment in &sorted {
        let free_column = columns.iter().position(|column| {
            column
                .iter()
                .all(|placed| !appointments_overlap(placed, appointment))
        });

        let column_index = match free_column {
            Some(index) => {
                columns[index].push(appointment);
                index
            }
            None => {
                columns.push(vec![appointment]);
                columns.len() - 1
            }
        };

        placements.push(column_index);
    }

    sorted
        .iter()
        .zip(placements)
        .enumerate()
        .map(|(position, (&appointment, column_index))| {
            let overlapping = sorted
                .iter()
                .enumerate()
                .filter(|(other_position, other)| {
                    *other_position != position && appointments_overlap(appointment, other)
                })
                .count();
            let max_concurrent = overlapping + 1;
            let share = 100.0 / max_concurrent as f64;

            let assignment = LayoutAssignment {
                appointment_id: appointment.id.clone(),
                column_index,
                column_width: share - COLUMN_GUTTER_PERCENT,
                column_left: share * column_index as f64,
                max_concurrent,
            };
            (appointment, assignment)
        })
        .collect()
}

/// Number of columns a layout occupies.
pub fn column_count(assignments: &[LayoutAssignment]) -> usize {
    assignments
        .iter()
        .map(|assignment| assignment.column_index + 1)
        .max()
        .unwrap_or(0)
}

fn placement_order(a: &CalendarAppointment, b: &CalendarAppointment) -> Ordering {
    a.start_time
        .cmp(&b.start_time)
        .then_with(|| b.duration().cmp(&a.duration()))
}

pub struct CalendarLayoutService {
    window: DayWindow,
}

impl CalendarLayoutService {
    pub fn new(window: DayWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> DayWindow {
        self.window
    }

    pub fn overlaps(&self, a: &CalendarAppointment, b: &CalendarAppointment) -> bool {
        let overlaps = appointments_overlap(a, b);
        debug!("Overlap check {} vs {}: {}", a.id, b.id, overlaps);
        overlaps
    }

    pub fn layout(&self, appointments: &[CalendarAppointment]) -> Vec<LayoutAssignment> {
        let assignments = layout_appointments(appointments);
        debug!(
            "Laid out {} appointments across {} columns",
            assignments.len(),
            column_count(&assignments)
        );
        assignments
    }

    /// Day view using the service's configured window unless one is given.
    pub fn day_view(
        &self,
        appointments: &[CalendarAppointment],
        date: NaiveDate,
        window: Option<DayWindow>,
    ) -> DayView {
        let window = window.unwrap_or(self.window);
        let view = build_day_view(appointments, date, window);
        debug!(
            "Day view for {} ({}:00-{}:00): {} of {} appointments visible",
            date,
            window.start_hour,
            window.end_hour,
            view.entries.len(),
            appointments.len()
        );
        view
    }
}
