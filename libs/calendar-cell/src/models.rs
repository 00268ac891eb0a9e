// libs/calendar-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

// ==============================================================================
// CORE CALENDAR MODELS
// ==============================================================================

/// An appointment as the calendar sees it: an identifier and a time interval.
/// Persistence and ownership of the record belong to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarAppointment {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CalendarAppointment {
    pub fn new(id: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            title: None,
            status: None,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }
}

/// Horizontal placement of one appointment in a calendar track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAssignment {
    pub appointment_id: String,
    pub column_index: usize,
    /// Percentage (0-100) of the track width.
    pub column_width: f64,
    /// Percentage (0-100) offset from the left edge of the track.
    pub column_left: f64,
    pub max_concurrent: usize,
}

// ==============================================================================
// DAY VIEW MODELS
// ==============================================================================

/// Visible hour range of a day column, `start_hour..end_hour` in UTC.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayViewEntry {
    #[serde(flatten)]
    pub assignment: LayoutAssignment,
    pub top_percent: f64,
    pub height_percent: f64,
    pub clipped_start: bool,
    pub clipped_end: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayView {
    pub date: NaiveDate,
    pub window: DayWindow,
    pub entries: Vec<DayViewEntry>,
    pub column_count: usize,
}

// ==============================================================================
// CACHE MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutCacheKey {
    pub calendar_id: String,
    pub date: NaiveDate,
}

impl LayoutCacheKey {
    pub fn new(calendar_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CachedLayout {
    /// `layout_fingerprint` of the appointments the layout was computed from.
    pub fingerprint: u64,
    pub assignments: Vec<LayoutAssignment>,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct OverlapCheckRequest {
    pub a: CalendarAppointment,
    pub b: CalendarAppointment,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OverlapCheckResponse {
    pub overlaps: bool,
}

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub appointments: Vec<CalendarAppointment>,
    pub calendar_id: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LayoutResponse {
    pub assignments: Vec<LayoutAssignment>,
    pub column_count: usize,
    pub total: usize,
    pub cached: bool,
}

#[derive(Debug, Deserialize)]
pub struct DayViewRequest {
    pub date: NaiveDate,
    pub appointments: Vec<CalendarAppointment>,
    pub start_hour: Option<u32>,
    pub end_hour: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvalidateCacheRequest {
    pub calendar_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvalidateCacheResponse {
    pub invalidated: usize,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    #[error("Appointment {id} must end after it starts")]
    InvalidInterval { id: String },

    #[error("Appointment {0} appears more than once")]
    DuplicateAppointment(String),

    #[error("Invalid day window {start_hour}..{end_hour}")]
    InvalidDayWindow { start_hour: u32, end_hour: u32 },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
