// libs/calendar-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Duration;
use tracing::{info, instrument, warn};

use shared_config::{AppConfig, DEFAULT_LAYOUT_CACHE_TTL_SECONDS};
use shared_models::error::AppError;

use crate::models::{
    CacheStats, DayView, DayViewRequest, DayWindow, InvalidateCacheRequest,
    InvalidateCacheResponse, LayoutCacheKey, LayoutRequest, LayoutResponse,
    OverlapCheckRequest, OverlapCheckResponse,
};
use crate::services::{
    column_count, layout_fingerprint, validate_appointments, validate_interval,
    CalendarLayoutService, LayoutCache,
};

pub struct CalendarHandlers {
    layout_service: CalendarLayoutService,
    cache: LayoutCache,
}

impl CalendarHandlers {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let window = DayWindow::new(config.calendar_day_start_hour, config.calendar_day_end_hour)
            .unwrap_or_else(|e| {
                warn!("{} - using the full day", e);
                DayWindow::full_day()
            });

        let ttl = Duration::try_seconds(config.layout_cache_ttl_seconds.max(0))
            .unwrap_or_else(|| {
                warn!(
                    "Layout cache TTL of {}s is out of range - using {}s",
                    config.layout_cache_ttl_seconds, DEFAULT_LAYOUT_CACHE_TTL_SECONDS
                );
                Duration::seconds(DEFAULT_LAYOUT_CACHE_TTL_SECONDS)
            });

        Self {
            layout_service: CalendarLayoutService::new(window),
            cache: LayoutCache::new(ttl),
        }
    }
}

// ==============================================================================
// LAYOUT HANDLERS
// ==============================================================================

#[instrument(skip_all)]
pub async fn check_overlap(
    State(handlers): State<Arc<CalendarHandlers>>,
    Json(request): Json<OverlapCheckRequest>,
) -> Result<Json<OverlapCheckResponse>, AppError> {
    validate_interval(&request.a)?;
    validate_interval(&request.b)?;

    let overlaps = handlers.layout_service.overlaps(&request.a, &request.b);
    Ok(Json(OverlapCheckResponse { overlaps }))
}

/// Column layout for a batch of appointments. When both `calendar_id` and
/// `date` are supplied the result is cached for that calendar day; a cached
/// layout is only served back for the same set of appointments.
#[instrument(skip_all)]
pub async fn compute_layout(
    State(handlers): State<Arc<CalendarHandlers>>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    validate_appointments(&request.appointments)?;

    let cache_key = match (request.calendar_id, request.date) {
        (Some(calendar_id), Some(date)) => Some(LayoutCacheKey::new(calendar_id, date)),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "calendar_id and date must be supplied together".to_string(),
            ))
        }
    };

    let fingerprint = layout_fingerprint(&request.appointments);

    if let Some(key) = &cache_key {
        if let Some(assignments) = handlers.cache.get(key, fingerprint).await {
            return Ok(Json(LayoutResponse {
                column_count: column_count(&assignments),
                total: assignments.len(),
                assignments,
                cached: true,
            }));
        }
    }

    let assignments = handlers.layout_service.layout(&request.appointments);

    if let Some(key) = cache_key {
        handlers.cache.insert(key, fingerprint, assignments.clone()).await;
    }

    Ok(Json(LayoutResponse {
        column_count: column_count(&assignments),
        total: assignments.len(),
        assignments,
        cached: false,
    }))
}

#[instrument(skip_all)]
pub async fn get_day_view(
    State(handlers): State<Arc<CalendarHandlers>>,
    Json(request): Json<DayViewRequest>,
) -> Result<Json<DayView>, AppError> {
    validate_appointments(&request.appointments)?;

    let default_window = handlers.layout_service.window();
    let window = match (request.start_hour, request.end_hour) {
        (None, None) => None,
        (start_hour, end_hour) => Some(DayWindow::new(
            start_hour.unwrap_or(default_window.start_hour),
            end_hour.unwrap_or(default_window.end_hour),
        )?),
    };

    let view = handlers
        .layout_service
        .day_view(&request.appointments, request.date, window);
    Ok(Json(view))
}

// ==============================================================================
// CACHE HANDLERS
// ==============================================================================

#[instrument(skip_all)]
pub async fn invalidate_cache(
    State(handlers): State<Arc<CalendarHandlers>>,
    Json(request): Json<InvalidateCacheRequest>,
) -> Result<Json<InvalidateCacheResponse>, AppError> {
    let invalidated = match request.calendar_id {
        Some(calendar_id) => handlers.cache.invalidate_calendar(&calendar_id).await,
        None => handlers.cache.invalidate_all().await,
    };

    info!("Layout cache invalidation removed {} entries", invalidated);
    Ok(Json(InvalidateCacheResponse { invalidated }))
}

#[instrument(skip_all)]
pub async fn get_cache_stats(
    State(handlers): State<Arc<CalendarHandlers>>,
) -> Result<Json<CacheStats>, AppError> {
    Ok(Json(handlers.cache.stats().await))
}
