//! Validation of untrusted request input.
//!
//! Payloads arrive as raw JSON so that type mismatches (a numeric `name`,
//! a `tags` string instead of an array) produce precise messages instead of
//! a generic deserialization failure.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ServiceError;

use super::domain::{normalize_tags, ResourceCreateInput, ResourceFilters, ResourceUpdateInput};

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ServiceError> {
    payload
        .as_object()
        .ok_or_else(|| ServiceError::validation("Request body must be a JSON object"))
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_tags(value: Option<&Value>) -> Result<Option<Vec<String>>, ServiceError> {
    let Some(value) = value else { return Ok(None) };
    let items = value
        .as_array()
        .ok_or_else(|| ServiceError::validation("tags must be an array of strings"))?;
    let tags = items
        .iter()
        .map(|item| {
            non_empty_str(item).ok_or_else(|| ServiceError::validation("tags must be an array of non-empty strings"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(normalize_tags(tags)))
}

fn parse_description(value: Option<&Value>, msg: &str) -> Result<Option<String>, ServiceError> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ServiceError::validation(msg)),
    }
}

/// Validate a creation payload: `name` required, `description`/`tags` optional.
pub fn parse_create_payload(payload: &Value) -> Result<ResourceCreateInput, ServiceError> {
    let body = as_object(payload)?;
    let name = body
        .get("name")
        .and_then(non_empty_str)
        .ok_or_else(|| ServiceError::validation("name is required"))?;
    let description = parse_description(body.get("description"), "description must be a string")?;
    let tags = parse_tags(body.get("tags"))?;
    Ok(ResourceCreateInput { name: name.to_string(), description, tags })
}

/// Validate an update payload; at least one of `name`/`description`/`tags` must be present.
pub fn parse_update_payload(payload: &Value) -> Result<ResourceUpdateInput, ServiceError> {
    let body = as_object(payload)?;
    let name = match body.get("name") {
        None => None,
        Some(v) => Some(
            non_empty_str(v)
                .ok_or_else(|| ServiceError::validation("name must be a non-empty string when provided"))?
                .to_string(),
        ),
    };
    let description = parse_description(body.get("description"), "description must be a string when provided")?;
    let tags = parse_tags(body.get("tags"))?;

    let patch = ResourceUpdateInput { name, description, tags };
    if patch.is_empty() {
        return Err(ServiceError::validation("Provide at least one field to update"));
    }
    Ok(patch)
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn present<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    query.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Build list filters from query parameters. Blank values are ignored.
pub fn parse_filters(query: &HashMap<String, String>) -> Result<ResourceFilters, ServiceError> {
    let search = present(query, "search").map(str::to_string);
    let tag = present(query, "tag").map(str::to_lowercase);
    let updated_after = match present(query, "updatedAfter") {
        None => None,
        Some(raw) => Some(
            parse_timestamp(raw)
                .ok_or_else(|| ServiceError::validation("updatedAfter must be a valid ISO date string"))?,
        ),
    };
    Ok(ResourceFilters { search, tag, updated_after })
}

/// Ids that are not UUIDs cannot name a stored record.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
