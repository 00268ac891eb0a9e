use std::collections::HashSet;

use tracing::debug;

use crate::models::{CalendarAppointment, CalendarError};

/// Rejects what the layout engine does not define behavior for: intervals
/// that do not end after they start, and ids repeated within one batch.
pub fn validate_appointments(appointments: &[CalendarAppointment]) -> Result<(), CalendarError> {
    let mut seen = HashSet::with_capacity(appointments.len());

    for appointment in appointments {
        validate_interval(appointment)?;
        if !seen.insert(appointment.id.as_str()) {
            return Err(CalendarError::DuplicateAppointment(appointment.id.clone()));
        }
    }

    debug!("Validated {} appointments", appointments.len());
    Ok(())
}

pub fn validate_interval(appointment: &CalendarAppointment) -> Result<(), CalendarError> {
    if appointment.id.trim().is_empty() {
        return Err(CalendarError::ValidationError(
            "Appointment id must not be empty".to_string(),
        ));
    }
    if appointment.end_time <= appointment.start_time {
        return Err(CalendarError::InvalidInterval {
            id: appointment.id.clone(),
        });
    }
    Ok(())
}
