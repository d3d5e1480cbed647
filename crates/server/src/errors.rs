use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use service::resources::{GatewayResponse, OutcomeKind};
use thiserror::Error;

/// HTTP rendering of a gateway outcome.
#[derive(Debug)]
pub struct ApiResponse(pub GatewayResponse);

pub fn status_for(kind: OutcomeKind) -> StatusCode {
    match kind {
        OutcomeKind::Ok => StatusCode::OK,
        OutcomeKind::Created => StatusCode::CREATED,
        OutcomeKind::NoContent => StatusCode::NO_CONTENT,
        OutcomeKind::ClientError => StatusCode::BAD_REQUEST,
        OutcomeKind::NotFound => StatusCode::NOT_FOUND,
        OutcomeKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind);
        match self.0.body {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("resource store unavailable: {0}")]
    Store(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_outcome() {
        assert_eq!(status_for(OutcomeKind::Ok), StatusCode::OK);
        assert_eq!(status_for(OutcomeKind::Created), StatusCode::CREATED);
        assert_eq!(status_for(OutcomeKind::NoContent), StatusCode::NO_CONTENT);
        assert_eq!(status_for(OutcomeKind::ClientError), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(OutcomeKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(OutcomeKind::ServerError), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn no_content_has_empty_body() {
        let resp = ApiResponse(GatewayResponse { kind: OutcomeKind::NoContent, body: None }).into_response();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn store_failures_abort_startup_with_detail() {
        let err: StartupError = ServiceError::Corrupt("resources.json: EOF".into()).into();
        assert!(matches!(err, StartupError::Store(_)));
        assert_eq!(err.to_string(), "resource store unavailable: corrupt data file: resources.json: EOF");
    }
}
