use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::models::{CalendarAppointment, CalendarError, DayView, DayViewEntry, DayWindow};
use crate::services::layout::layout_with_sources;

impl DayWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, CalendarError> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(CalendarError::InvalidDayWindow { start_hour, end_hour });
        }
        Ok(Self { start_hour, end_hour })
    }

    pub fn full_day() -> Self {
        Self { start_hour: 0, end_hour: 24 }
    }

    /// UTC instants bounding the window on `date`. `end_hour` 24 is the
    /// following midnight.
    pub fn bounds(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let midnight = date.and_time(NaiveTime::default()).and_utc();
        (
            midnight + Duration::hours(self.start_hour as i64),
            midnight + Duration::hours(self.end_hour as i64),
        )
    }
}

/// Vertical placement of an appointment within a day window, in percent of
/// the window height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPosition {
    pub top_percent: f64,
    pub height_percent: f64,
    pub clipped_start: bool,
    pub clipped_end: bool,
}

/// `None` when the appointment lies entirely outside the window.
pub fn position_in_window(
    appointment: &CalendarAppointment,
    date: NaiveDate,
    window: DayWindow,
) -> Option<WindowPosition> {
    let (window_start, window_end) = window.bounds(date);

    if !(appointment.start_time < window_end && window_start < appointment.end_time) {
        return None;
    }

    let visible_start = appointment.start_time.max(window_start);
    let visible_end = appointment.end_time.min(window_end);
    let window_millis = (window_end - window_start).num_milliseconds() as f64;

    Some(WindowPosition {
        top_percent: (visible_start - window_start).num_milliseconds() as f64 / window_millis * 100.0,
        height_percent: (visible_end - visible_start).num_milliseconds() as f64 / window_millis * 100.0,
        clipped_start: appointment.start_time < window_start,
        clipped_end: appointment.end_time > window_end,
    })
}

/// Lay out the appointments visible in `window` on `date`. Appointments
/// outside the window take no part in column assignment.
pub fn build_day_view(
    appointments: &[CalendarAppointment],
    date: NaiveDate,
    window: DayWindow,
) -> DayView {
    let visible: Vec<CalendarAppointment> = appointments
        .iter()
        .filter(|appointment| position_in_window(appointment, date, window).is_some())
        .cloned()
        .collect();

    let entries: Vec<DayViewEntry> = layout_with_sources(&visible)
        .into_iter()
        .filter_map(|(appointment, assignment)| {
            position_in_window(appointment, date, window).map(|position| DayViewEntry {
                assignment,
                top_percent: position.top_percent,
                height_percent: position.height_percent,
                clipped_start: position.clipped_start,
                clipped_end: position.clipped_end,
            })
        })
        .collect();

    let column_count = entries
        .iter()
        .map(|entry| entry.assignment.column_index + 1)
        .max()
        .unwrap_or(0);

    DayView {
        date,
        window,
        entries,
        column_count,
    }
}
