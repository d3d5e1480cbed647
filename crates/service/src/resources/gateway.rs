//! Request gateway: untrusted input in, outcome kind plus envelope out.
//!
//! Transport-agnostic; the HTTP layer only maps [`OutcomeKind`] to a status
//! code and serializes the [`Envelope`].

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::errors::ServiceError;

use super::domain::Resource;
use super::repository::ResourceRepository;
use super::validators::{parse_create_payload, parse_filters, parse_id, parse_update_payload};

pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Unexpected error";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeKind {
    Ok,
    Created,
    NoContent,
    ClientError,
    NotFound,
    ServerError,
}

/// Response body: `{ "data": ... }` or `{ "error": "..." }`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Envelope {
    One { data: Resource },
    Many { data: Vec<Resource> },
    Error { error: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct GatewayResponse {
    pub kind: OutcomeKind,
    /// `None` only for `NoContent`.
    pub body: Option<Envelope>,
}

impl GatewayResponse {
    fn one(kind: OutcomeKind, data: Resource) -> Self {
        Self { kind, body: Some(Envelope::One { data }) }
    }

    fn many(data: Vec<Resource>) -> Self {
        Self { kind: OutcomeKind::Ok, body: Some(Envelope::Many { data }) }
    }

    fn no_content() -> Self {
        Self { kind: OutcomeKind::NoContent, body: None }
    }

    pub fn error(kind: OutcomeKind, msg: impl Into<String>) -> Self {
        Self { kind, body: Some(Envelope::Error { error: msg.into() }) }
    }

    pub fn not_found() -> Self {
        Self::error(OutcomeKind::NotFound, NOT_FOUND_MESSAGE)
    }

    /// Map a service error; internal detail is logged, never returned.
    fn from_error(op: &'static str, err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => {
                debug!(op, error = %msg, "request rejected");
                Self::error(OutcomeKind::ClientError, msg)
            }
            other => {
                error!(op, error = %other, "resource operation failed");
                Self::error(OutcomeKind::ServerError, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

/// Validates requests and dispatches them to an injected repository.
#[derive(Clone)]
pub struct ResourceGateway {
    store: Arc<dyn ResourceRepository>,
}

impl ResourceGateway {
    pub fn new(store: Arc<dyn ResourceRepository>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &HashMap<String, String>) -> GatewayResponse {
        let filters = match parse_filters(query) {
            Ok(f) => f,
            Err(e) => return GatewayResponse::from_error("list", e),
        };
        match self.store.list(&filters).await {
            Ok(items) => GatewayResponse::many(items),
            Err(e) => GatewayResponse::from_error("list", e),
        }
    }

    pub async fn get(&self, id: &str) -> GatewayResponse {
        let Some(id) = parse_id(id) else { return GatewayResponse::not_found() };
        match self.store.find_by_id(id).await {
            Ok(Some(r)) => GatewayResponse::one(OutcomeKind::Ok, r),
            Ok(None) => GatewayResponse::not_found(),
            Err(e) => GatewayResponse::from_error("get", e),
        }
    }

    pub async fn create(&self, payload: &Value) -> GatewayResponse {
        let input = match parse_create_payload(payload) {
            Ok(i) => i,
            Err(e) => return GatewayResponse::from_error("create", e),
        };
        match self.store.insert(input).await {
            Ok(r) => GatewayResponse::one(OutcomeKind::Created, r),
            Err(e) => GatewayResponse::from_error("create", e),
        }
    }

    /// Payload is validated before the id is resolved, so a bad body is a
    /// client error even for an unknown id.
    pub async fn update(&self, id: &str, payload: &Value) -> GatewayResponse {
        let patch = match parse_update_payload(payload) {
            Ok(p) => p,
            Err(e) => return GatewayResponse::from_error("update", e),
        };
        let Some(id) = parse_id(id) else { return GatewayResponse::not_found() };
        match self.store.update(id, patch).await {
            Ok(Some(r)) => GatewayResponse::one(OutcomeKind::Ok, r),
            Ok(None) => GatewayResponse::not_found(),
            Err(e) => GatewayResponse::from_error("update", e),
        }
    }

    pub async fn delete(&self, id: &str) -> GatewayResponse {
        let Some(id) = parse_id(id) else { return GatewayResponse::not_found() };
        match self.store.remove(id).await {
            Ok(true) => GatewayResponse::no_content(),
            Ok(false) => GatewayResponse::not_found(),
            Err(e) => GatewayResponse::from_error("delete", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::resources::repository::mock::MockResourceRepository;
    use crate::resources::store::JsonResourceStore;

    fn gateway() -> (Arc<MockResourceRepository>, ResourceGateway) {
        let repo = Arc::new(MockResourceRepository::default());
        let gw = ResourceGateway::new(repo.clone());
        (repo, gw)
    }

    fn created_id(resp: &GatewayResponse) -> String {
        match &resp.body {
            Some(Envelope::One { data }) => data.id.to_string(),
            other => panic!("expected single record, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let (_, gw) = gateway();
        let resp = gw.create(&json!({"name": "Component library", "tags": ["Design", "design", " ops "]})).await;
        assert_eq!(resp.kind, OutcomeKind::Created);
        let id = created_id(&resp);

        let got = gw.get(&id).await;
        assert_eq!(got.kind, OutcomeKind::Ok);
        match got.body {
            Some(Envelope::One { data }) => {
                assert_eq!(data.version, 1);
                assert_eq!(data.created_at, data.updated_at);
                assert_eq!(data.tags, vec!["design".to_string(), "ops".to_string()]);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_update_never_reaches_store() {
        let (repo, gw) = gateway();
        let resp = gw.update(&uuid::Uuid::new_v4().to_string(), &json!({})).await;
        assert_eq!(resp.kind, OutcomeKind::ClientError);
        assert_eq!(
            resp.body,
            Some(Envelope::Error { error: "Provide at least one field to update".into() })
        );
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_filters_never_reach_store() {
        let (repo, gw) = gateway();
        let mut q = HashMap::new();
        q.insert("updatedAfter".to_string(), "not-a-date".to_string());
        let resp = gw.list(&q).await;
        assert_eq!(resp.kind, OutcomeKind::ClientError);
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn missing_records_map_to_not_found() {
        let (_, gw) = gateway();
        let id = uuid::Uuid::new_v4().to_string();
        assert_eq!(gw.get(&id).await, GatewayResponse::not_found());
        assert_eq!(gw.update(&id, &json!({"name": "x"})).await, GatewayResponse::not_found());
        assert_eq!(gw.delete(&id).await, GatewayResponse::not_found());
        assert_eq!(gw.get("not-a-uuid").await, GatewayResponse::not_found());
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (_, gw) = gateway();
        let id = created_id(&gw.create(&json!({"name": "temp"})).await);
        let resp = gw.delete(&id).await;
        assert_eq!(resp.kind, OutcomeKind::NoContent);
        assert!(resp.body.is_none());
        assert_eq!(gw.get(&id).await.kind, OutcomeKind::NotFound);
    }

    #[tokio::test]
    async fn list_filters_by_search_and_tag() {
        let (_, gw) = gateway();
        gw.create(&json!({"name": "Component library", "description": "UI kit", "tags": ["design"]})).await;
        gw.create(&json!({"name": "Other", "description": "none", "tags": ["ops"]})).await;

        let mut q = HashMap::new();
        q.insert("search".to_string(), "kit".to_string());
        match gw.list(&q).await.body {
            Some(Envelope::Many { data }) => {
                assert_eq!(data.len(), 1);
                assert_eq!(data[0].name, "Component library");
            }
            other => panic!("unexpected body {other:?}"),
        }

        let mut q = HashMap::new();
        q.insert("tag".to_string(), "OPS".to_string());
        match gw.list(&q).await.body {
            Some(Envelope::Many { data }) => {
                assert_eq!(data.len(), 1);
                assert!(data[0].tags.contains(&"ops".to_string()));
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn storage_faults_are_opaque_server_errors() {
        let gw = ResourceGateway::new(Arc::new(MockResourceRepository::failing()));
        let opaque = GatewayResponse::error(OutcomeKind::ServerError, "Unexpected error");
        let id = uuid::Uuid::new_v4().to_string();

        assert_eq!(gw.create(&json!({"name": "x"})).await, opaque);
        assert_eq!(gw.update(&id, &json!({"name": "renamed"})).await, opaque);
        assert_eq!(gw.delete(&id).await, opaque);
    }

    #[tokio::test]
    async fn corrupt_store_fails_reads_opaquely() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("resource_gateway_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join("resources.json");
        tokio::fs::write(&path, b"{ not json").await?;
        let gw = ResourceGateway::new(Arc::new(JsonResourceStore::new(&path)));

        let resp = gw.list(&HashMap::new()).await;
        assert_eq!(resp.kind, OutcomeKind::ServerError);
        assert_eq!(serde_json::to_value(&resp.body)?, json!({"error": "Unexpected error"}));
        assert_eq!(gw.get(&uuid::Uuid::new_v4().to_string()).await.kind, OutcomeKind::ServerError);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[test]
    fn envelope_serializes_flat() -> Result<(), anyhow::Error> {
        let err = serde_json::to_value(Envelope::Error { error: "boom".into() })?;
        assert_eq!(err, json!({"error": "boom"}));
        let many = serde_json::to_value(Envelope::Many { data: vec![] })?;
        assert_eq!(many, json!({"data": []}));
        Ok(())
    }
}
