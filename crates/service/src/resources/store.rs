use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::{
    fs,
    io::AsyncWriteExt,
    sync::{OnceCell, RwLock},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ServiceError;

use super::domain::{normalize_tags, Resource, ResourceCreateInput, ResourceFilters, ResourceUpdateInput};
use super::repository::ResourceRepository;

/// On-disk document: the whole collection under a single `resources` field.
#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    resources: Vec<Resource>,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    resources: &'a [Resource],
}

/// JSON file-backed resource store.
///
/// The collection is loaded lazily on first use behind a one-shot barrier, so
/// concurrent first callers share a single load. Reads share the lock; every
/// mutation holds the write lock while the full document is rewritten.
/// Mutations are applied to a copy and only committed once the file write
/// succeeded, so a failed write leaves memory unchanged.
pub struct JsonResourceStore {
    file_path: PathBuf,
    collection: OnceCell<RwLock<Vec<Resource>>>,
}

impl JsonResourceStore {
    /// Create an uninitialized store; nothing touches the disk until the first operation.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), collection: OnceCell::new() }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn is_initialized(&self) -> bool {
        self.collection.initialized()
    }

    /// Force initialization. Fails with `Corrupt` if the file exists but cannot be parsed.
    pub async fn init(&self) -> Result<(), ServiceError> {
        self.collection().await.map(|_| ())
    }

    async fn collection(&self) -> Result<&RwLock<Vec<Resource>>, ServiceError> {
        self.collection
            .get_or_try_init(|| async { self.load().await.map(RwLock::new) })
            .await
    }

    async fn load(&self) -> Result<Vec<Resource>, ServiceError> {
        let path = self.file_path.display().to_string();
        match fs::read(&self.file_path).await {
            Ok(bytes) => {
                let doc: Document = serde_json::from_slice(&bytes)
                    .map_err(|e| ServiceError::Corrupt(format!("{path}: {e}")))?;
                info!(%path, count = doc.resources.len(), "resource store loaded");
                Ok(doc.resources)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .await
                        .map_err(|e| ServiceError::Storage(format!("cannot create {}: {e}", parent.display())))?;
                }
                self.persist(&[]).await?;
                info!(%path, "resource store created empty data file");
                Ok(Vec::new())
            }
            Err(e) => Err(ServiceError::Storage(format!("cannot read {path}: {e}"))),
        }
    }

    /// Rewrite the whole document: write and fsync a sibling temp file, then
    /// rename it over the target.
    async fn persist(&self, resources: &[Resource]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(&DocumentRef { resources })
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let tmp = self.file_path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = write_synced(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Storage(format!("cannot write {}: {e}", tmp.display())));
        }
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Storage(format!("cannot replace {}: {e}", self.file_path.display())));
        }
        Ok(())
    }

    /// Apply `f` to a copy of the collection; persist and commit only when it yields `Some`.
    async fn mutate<T, F>(&self, f: F) -> Result<Option<T>, ServiceError>
    where
        F: FnOnce(&mut Vec<Resource>) -> Option<T>,
    {
        let lock = self.collection().await?;
        let mut current = lock.write().await;
        let mut next = current.clone();
        let Some(out) = f(&mut next) else {
            return Ok(None);
        };
        self.commit(&mut current, next).await?;
        Ok(Some(out))
    }

    async fn commit(&self, current: &mut Vec<Resource>, next: Vec<Resource>) -> Result<(), ServiceError> {
        self.persist(&next).await?;
        *current = next;
        Ok(())
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await
}

/// Current time, bumped past `previous` if the clock has not moved.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous { now } else { previous + Duration::microseconds(1) }
}

#[async_trait]
impl ResourceRepository for JsonResourceStore {
    async fn list(&self, filters: &ResourceFilters) -> Result<Vec<Resource>, ServiceError> {
        let items = self.collection().await?.read().await;
        Ok(items.iter().filter(|r| filters.matches(r)).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resource>, ServiceError> {
        let items = self.collection().await?.read().await;
        Ok(items.iter().find(|r| r.id == id).cloned())
    }

    async fn insert(&self, input: ResourceCreateInput) -> Result<Resource, ServiceError> {
        let now = Utc::now();
        let resource = Resource {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description.map(|d| d.trim().to_string()).unwrap_or_default(),
            tags: input.tags.map(normalize_tags).unwrap_or_default(),
            created_at: now,
            updated_at: now,
            version: 1,
        };
        let lock = self.collection().await?;
        let mut current = lock.write().await;
        let mut next = current.clone();
        next.push(resource.clone());
        self.commit(&mut current, next).await?;
        debug!(id = %resource.id, "resource inserted");
        Ok(resource)
    }

    async fn update(&self, id: Uuid, patch: ResourceUpdateInput) -> Result<Option<Resource>, ServiceError> {
        let updated = self
            .mutate(|items| {
                let current = items.iter_mut().find(|r| r.id == id)?;
                if let Some(name) = patch.name {
                    current.name = name;
                }
                if let Some(description) = patch.description {
                    current.description = description.trim().to_string();
                }
                if let Some(tags) = patch.tags {
                    current.tags = normalize_tags(tags);
                }
                current.updated_at = next_timestamp(current.updated_at);
                current.version += 1;
                Some(current.clone())
            })
            .await?;
        if let Some(r) = &updated {
            debug!(id = %r.id, version = r.version, "resource updated");
        }
        Ok(updated)
    }

    async fn remove(&self, id: Uuid) -> Result<bool, ServiceError> {
        let removed = self
            .mutate(|items| {
                let idx = items.iter().position(|r| r.id == id)?;
                items.remove(idx);
                Some(())
            })
            .await?
            .is_some();
        if removed {
            debug!(%id, "resource removed");
        }
        Ok(removed)
    }
}
