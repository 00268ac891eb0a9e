// =====================================================================================
// CALENDAR CELL - APPOINTMENT LAYOUT FOR CALENDAR RENDERING
// =====================================================================================
//
// Turns a day's appointments into side-by-side column placements:
// - Overlap detection and greedy column assignment
// - Vertical placement within a configurable day window
// - A per-calendar layout cache with explicit invalidation
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    CalendarAppointment, CalendarError, DayView, DayViewEntry, DayWindow, LayoutAssignment,
};

pub use services::{appointments_overlap, layout_appointments, CalendarLayoutService, LayoutCache};

pub use router::calendar_routes;
pub use handlers::CalendarHandlers;
