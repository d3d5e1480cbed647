use std::sync::Arc;

use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::resources::{GatewayResponse, OutcomeKind, ResourceGateway, ResourceRepository};

use crate::errors::ApiResponse;
use crate::openapi::ApiDoc;

pub mod resources;

#[derive(Clone)]
pub struct AppState {
    pub gateway: ResourceGateway,
}

impl AppState {
    pub fn new(store: Arc<dyn ResourceRepository>) -> Self {
        Self { gateway: ResourceGateway::new(store) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is reachable", body = crate::openapi::HealthDoc)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], Json(ApiDoc::openapi()))
}

const DOCS_PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Resource Registry API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui", deepLinking: true });
  </script>
</body>
</html>
"##;

/// Swagger UI over `/openapi.json`; the UI assets are loaded from a CDN.
async fn docs() -> Html<&'static str> {
    Html(DOCS_PAGE)
}

async fn route_not_found() -> ApiResponse {
    ApiResponse(GatewayResponse::error(OutcomeKind::NotFound, "Route not found"))
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(docs));

    let api = Router::new()
        .route("/api/resources", get(resources::list).post(resources::create))
        .route(
            "/api/resources/:id",
            get(resources::get).put(resources::update).delete(resources::delete),
        );

    public
        .merge(api)
        .fallback(route_not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
