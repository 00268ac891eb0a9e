// libs/calendar-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers::{self, CalendarHandlers};

pub fn calendar_routes(config: Arc<AppConfig>) -> Router {
    let handlers = Arc::new(CalendarHandlers::new(config));

    Router::new()
        .route("/overlaps", post(handlers::check_overlap))
        .route("/layout", post(handlers::compute_layout))
        .route("/day-view", post(handlers::get_day_view))
        .route("/cache/invalidate", post(handlers::invalidate_cache))
        .route("/cache/stats", get(handlers::get_cache_stats))
        .with_state(handlers)
}
