use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::errors::ApiResponse;
use crate::routes::AppState;

/// Bodies that are not valid JSON are handed to the gateway as `null`,
/// which it rejects like any other non-object body.
fn payload(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(v)) => v,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable request body");
            Value::Null
        }
    }
}

#[utoipa::path(
    get, path = "/api/resources", tag = "resources",
    params(crate::openapi::ListQueryDoc),
    responses(
        (status = 200, description = "Resources matching the filters", body = crate::openapi::ResourceListDoc),
        (status = 400, description = "Invalid filter input", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<AppState>, Query(query): Query<HashMap<String, String>>) -> ApiResponse {
    ApiResponse(state.gateway.list(&query).await)
}

#[utoipa::path(
    post, path = "/api/resources", tag = "resources",
    request_body = crate::openapi::ResourceCreateDoc,
    responses(
        (status = 201, description = "Resource created", body = crate::openapi::ResourceSingleDoc),
        (status = 400, description = "Validation error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResponse {
    ApiResponse(state.gateway.create(&payload(body)).await)
}

#[utoipa::path(
    get, path = "/api/resources/{id}", tag = "resources",
    params(("id" = String, Path, description = "Resource id (UUID)")),
    responses(
        (status = 200, description = "Resource found", body = crate::openapi::ResourceSingleDoc),
        (status = 404, description = "Resource not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    ApiResponse(state.gateway.get(&id).await)
}

#[utoipa::path(
    put, path = "/api/resources/{id}", tag = "resources",
    params(("id" = String, Path, description = "Resource id (UUID)")),
    request_body = crate::openapi::ResourceUpdateDoc,
    responses(
        (status = 200, description = "Resource updated", body = crate::openapi::ResourceSingleDoc),
        (status = 400, description = "Validation error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Resource not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResponse {
    ApiResponse(state.gateway.update(&id, &payload(body)).await)
}

#[utoipa::path(
    delete, path = "/api/resources/{id}", tag = "resources",
    params(("id" = String, Path, description = "Resource id (UUID)")),
    responses(
        (status = 204, description = "Resource deleted"),
        (status = 404, description = "Resource not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    ApiResponse(state.gateway.delete(&id).await)
}
