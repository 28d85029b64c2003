pub mod davening;
pub mod rest;
pub mod state;

pub use rest::{
    create_shiur_handler, delete_shiur_handler, get_shiur_handler, health_handler,
    list_shiurim_handler, replace_shiur_handler, shiur_calendar_handler, shiur_days_handler,
};

use crate::web::rest::ApiDoc;
use crate::web::state::AppState;
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application: API routes, CORS, request tracing and the
/// Swagger UI.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);
    let cors = match state.config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            warn!(
                "CORS_ORIGIN '{}' is not a valid header value; cross-origin requests will be refused",
                state.config.cors_origin
            );
            cors
        }
    };

    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/shiurim", get(list_shiurim_handler).post(create_shiur_handler))
        .route("/shiurim/calendar", get(shiur_calendar_handler))
        .route("/shiurim/days", get(shiur_days_handler))
        .route(
            "/shiurim/{id}",
            get(get_shiur_handler)
                .put(replace_shiur_handler)
                .delete(delete_shiur_handler),
        )
        .route(
            "/shuls/{shul_id}/davening",
            get(davening::list_davening_handler).post(davening::create_davening_handler),
        )
        .route(
            "/shuls/{shul_id}/davening/{id}",
            axum::routing::put(davening::replace_davening_handler)
                .delete(davening::delete_davening_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
