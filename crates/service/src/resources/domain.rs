use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, tagged record persisted by the registry.
/// - `tags`: lowercase, no duplicates, no empty strings
/// - `version`: starts at 1, +1 on every successful update
/// - `updated_at >= created_at`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

/// Validated creation input; id and timestamps are assigned by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceCreateInput {
    pub name: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Partial update; `None` leaves the field untouched, `tags` replaces wholesale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl ResourceUpdateInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.tags.is_none()
    }
}

/// List filters, combined with logical AND. Absent filters match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceFilters {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub updated_after: Option<DateTime<Utc>>,
}

impl ResourceFilters {
    pub fn matches(&self, resource: &Resource) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(needle) => {
                let needle = needle.to_lowercase();
                resource.name.to_lowercase().contains(&needle)
                    || resource.description.to_lowercase().contains(&needle)
            }
            None => true,
        };
        let matches_tag = match self.tag.as_deref() {
            Some(tag) => {
                let tag = tag.to_lowercase();
                resource.tags.iter().any(|t| *t == tag)
            }
            None => true,
        };
        let matches_updated_after = match self.updated_after {
            Some(after) => resource.updated_at >= after,
            None => true,
        };
        matches_search && matches_tag && matches_updated_after
    }
}

/// Trim, lowercase, drop empties and dedupe tags, keeping first occurrence order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() || out.contains(&tag) {
            continue;
        }
        out.push(tag);
    }
    out
}
