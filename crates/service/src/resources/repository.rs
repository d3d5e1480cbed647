use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;

use super::domain::{Resource, ResourceCreateInput, ResourceFilters, ResourceUpdateInput};

/// Storage abstraction the gateway talks to.
/// Missing records are `Ok(None)` / `Ok(false)`, never an error.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn list(&self, filters: &ResourceFilters) -> Result<Vec<Resource>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resource>, ServiceError>;
    async fn insert(&self, input: ResourceCreateInput) -> Result<Resource, ServiceError>;
    async fn update(&self, id: Uuid, patch: ResourceUpdateInput) -> Result<Option<Resource>, ServiceError>;
    async fn remove(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::Utc;

    use crate::resources::domain::normalize_tags;

    #[derive(Default)]
    pub struct MockResourceRepository {
        items: Mutex<Vec<Resource>>,
        calls: AtomicUsize,
        fail_writes: bool,
    }

    impl MockResourceRepository {
        /// A repository whose mutations all fail with a storage error.
        pub fn failing() -> Self {
            Self { fail_writes: true, ..Default::default() }
        }

        /// Number of repository calls made so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn touch(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn check_writable(&self) -> Result<(), ServiceError> {
            if self.fail_writes {
                return Err(ServiceError::Storage("disk unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ResourceRepository for MockResourceRepository {
        async fn list(&self, filters: &ResourceFilters) -> Result<Vec<Resource>, ServiceError> {
            self.touch();
            let items = self.items.lock().unwrap();
            Ok(items.iter().filter(|r| filters.matches(r)).cloned().collect())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Resource>, ServiceError> {
            self.touch();
            let items = self.items.lock().unwrap();
            Ok(items.iter().find(|r| r.id == id).cloned())
        }

        async fn insert(&self, input: ResourceCreateInput) -> Result<Resource, ServiceError> {
            self.touch();
            self.check_writable()?;
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
            self.items.lock().unwrap().push(resource.clone());
            Ok(resource)
        }

        async fn update(&self, id: Uuid, patch: ResourceUpdateInput) -> Result<Option<Resource>, ServiceError> {
            self.touch();
            self.check_writable()?;
            let mut items = self.items.lock().unwrap();
            let Some(current) = items.iter_mut().find(|r| r.id == id) else {
                return Ok(None);
            };
            if let Some(name) = patch.name { current.name = name; }
            if let Some(description) = patch.description { current.description = description.trim().to_string(); }
            if let Some(tags) = patch.tags { current.tags = normalize_tags(tags); }
            current.updated_at = Utc::now().max(current.updated_at);
            current.version += 1;
            Ok(Some(current.clone()))
        }

        async fn remove(&self, id: Uuid) -> Result<bool, ServiceError> {
            self.touch();
            self.check_writable()?;
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|r| r.id != id);
            Ok(items.len() != before)
        }
    }
}
