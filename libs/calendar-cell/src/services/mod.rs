pub mod cache;
pub mod day_view;
pub mod layout;
pub mod validation;

pub use cache::{layout_fingerprint, LayoutCache};
pub use day_view::{build_day_view, position_in_window, WindowPosition};
pub use layout::{appointments_overlap, column_count, layout_appointments, CalendarLayoutService};
pub use validation::{validate_appointments, validate_interval};
