pub mod rest;
pub mod state;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use rest::{
    add_day_handler, add_event_handler, delete_day_handler, delete_event_handler,
    get_schedule_handler, initialize_handler, root_handler, update_event_handler, ApiDoc,
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application: schedule routes, Swagger UI and CORS.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_router = Router::new()
        .route("/", get(root_handler))
        .route("/api/schedule", get(get_schedule_handler))
        .route("/api/schedule/day", post(add_day_handler))
        .route("/api/schedule/day/{day_id}", delete(delete_day_handler))
        .route("/api/schedule/event", post(add_event_handler))
        .route(
            "/api/schedule/event/{day_id}/{event_id}",
            put(update_event_handler).delete(delete_event_handler),
        )
        .route("/api/schedule/initialize", post(initialize_handler))
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
}
