use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use calendar_cell::router::calendar_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Calendar API is running!" }))
        .nest("/calendar", calendar_routes(state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_route_responds() {
        let app = create_router(Arc::new(AppConfig::default()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_calendar_routes_are_nested() {
        let app = create_router(Arc::new(AppConfig::default()));

        let response = app
            .oneshot(Request::builder().uri("/calendar/cache/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
