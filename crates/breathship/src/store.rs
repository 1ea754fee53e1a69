//! Typed collections of sessions, blogs and testimonials.
//!
//! An [`EntityStore`] keeps one collection in memory. Reads fall back to
//! the built-in dataset when the backend cannot be read; writes go to the
//! backend first and only touch the local copy once the backend accepted
//! them.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::model::{
    merge_record, visible, Blog, Entity, Record, Session, SessionTag, Testimonial,
};
use crate::source::DataSource;

/// In-memory copy of one entity collection.
#[derive(Debug)]
pub struct EntityStore<E: Entity> {
    source: Arc<dyn DataSource>,
    items: Vec<E>,
    loading: bool,
    error: Option<String>,
}

/// Sessions shown on the booking page.
pub type SessionStore = EntityStore<Session>;

/// Blog posts.
pub type BlogStore = EntityStore<Blog>;

/// Client testimonials.
pub type TestimonialStore = EntityStore<Testimonial>;

impl<E: Entity> EntityStore<E> {
    /// Create an empty store. Call [`load`](Self::load) to fill it.
    #[must_use]
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            items: Vec::new(),
            loading: true,
            error: None,
        }
    }

    /// Records currently held.
    #[must_use]
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// True until the first load finishes.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Why the last load fell back to built-in data, if it did.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Load the visible records.
    pub async fn load(&mut self) -> &[E] {
        self.load_filtered(true).await
    }

    /// Load every record, hidden ones included, for admin listings.
    pub async fn load_all(&mut self) -> &[E] {
        self.load_filtered(false).await
    }

    async fn load_filtered(&mut self, only_visible: bool) -> &[E] {
        self.loading = true;

        let (items, error) = match self.fetch().await {
            Ok(items) => (items, None),
            Err(e) => {
                warn!("Failed to load {}, serving defaults: {e}", E::KIND);
                (E::fallback(), Some(e.to_string()))
            }
        };

        self.items = if only_visible { visible(items) } else { items };
        self.error = error;
        self.loading = false;
        debug!("Loaded {} {}", self.items.len(), E::KIND);
        &self.items
    }

    async fn fetch(&self) -> Result<Vec<E>> {
        let rows = self.source.list(E::KIND).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match E::from_record(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!("Skipping {} row: {e}", E::KIND);
                    None
                }
            })
            .collect())
    }

    /// Fetch one record straight from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the record does not exist.
    pub async fn get(&self, id: &str) -> Result<E> {
        let row = self.source.get(E::KIND, id).await?;
        E::from_record(row)
    }

    /// Store a new record and put it at the front of the local list.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub async fn create(&mut self, draft: &E) -> Result<E> {
        let mut record = draft.to_record()?;
        if draft.id().is_empty() {
            record.remove("id");
        }

        let stored = self
            .source
            .create(E::KIND, record)
            .await
            .map_err(|e| {
                error!("Failed to create {} record: {e}", E::KIND);
                e
            })?;
        let created = E::from_record(stored)?;

        info!("Created {} record {}", E::KIND, created.id());
        self.items.insert(0, created.clone());
        Ok(created)
    }

    /// Apply `patch` to the record with `id`.
    ///
    /// Returns the record as the backend stored it; the local copy gets the
    /// patch merged in. An `id` key in the patch is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub async fn update(&mut self, id: &str, mut patch: Record) -> Result<E> {
        patch.remove("id");
        let stored = self
            .source
            .update(E::KIND, id, patch.clone())
            .await
            .map_err(|e| {
                error!("Failed to update {} record {id}: {e}", E::KIND);
                e
            })?;
        let updated = E::from_record(stored)?;

        if let Some(index) = self.position(id) {
            let mut local = self.items[index].to_record()?;
            merge_record(&mut local, &patch);
            self.items[index] = E::from_record(local)?;
        }

        info!("Updated {} record {id}", E::KIND);
        Ok(updated)
    }

    /// Remove the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.source
            .delete(E::KIND, id)
            .await
            .map_err(|e| {
                error!("Failed to delete {} record {id}: {e}", E::KIND);
                e
            })?;

        self.items.retain(|item| item.id() != id);
        info!("Deleted {} record {id}", E::KIND);
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}

impl SessionStore {
    /// Loaded sessions carrying `tag`.
    #[must_use]
    pub fn by_tag(&self, tag: &SessionTag) -> Vec<&Session> {
        self.items.iter().filter(|s| s.has_tag(tag)).collect()
    }
}

impl BlogStore {
    /// A loaded post by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Blog> {
        self.items.iter().find(|blog| blog.id == id)
    }
}

impl TestimonialStore {
    /// Loaded testimonials marked as featured.
    #[must_use]
    pub fn featured(&self) -> Vec<&Testimonial> {
        self.items.iter().filter(|t| t.is_featured).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityKind, VisibilityFlag};
    use crate::source::testing::{EmptySource, FailingSource};
    use crate::source::LocalStore;
    use serde_json::{json, Value};

    fn local() -> Arc<LocalStore> {
        Arc::new(LocalStore::open_in_memory().unwrap())
    }

    fn patch(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_failing_backend_serves_fallback() {
        let mut sessions = SessionStore::new(Arc::new(FailingSource));
        assert!(sessions.loading());

        assert_eq!(sessions.load().await.len(), 3);
        assert!(!sessions.loading());
        assert!(sessions.error().unwrap().contains("500"));

        let mut blogs = BlogStore::new(Arc::new(FailingSource));
        assert_eq!(blogs.load().await.len(), 3);
        let mut testimonials = TestimonialStore::new(Arc::new(FailingSource));
        assert_eq!(testimonials.load().await.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_backend_is_not_an_error() {
        let mut sessions = SessionStore::new(Arc::new(EmptySource));
        assert!(sessions.load().await.is_empty());
        assert!(sessions.error().is_none());
    }

    #[tokio::test]
    async fn test_load_filters_hidden_records() {
        let source = local();
        source
            .replace(
                EntityKind::Sessions,
                &[
                    patch(json!({"id": "1", "title": "Hidden", "is_active": "FALSE"})),
                    patch(json!({"id": "2", "title": "Blank flag", "is_active": ""})),
                    patch(json!({"id": "3", "title": "No flag"})),
                ],
            )
            .unwrap();

        let mut store = SessionStore::new(source);
        let titles: Vec<_> = store.load().await.iter().map(|s| s.title.clone()).collect();
        assert_eq!(titles, ["Blank flag", "No flag"]);

        assert_eq!(store.load_all().await.len(), 3);
    }

    #[tokio::test]
    async fn test_create_prepends() {
        let mut store = BlogStore::new(local());
        store.load().await;

        let draft = Blog {
            title: "Box breathing".to_string(),
            excerpt: "Four counts in.".to_string(),
            is_published: VisibilityFlag::shown(),
            ..Blog::default()
        };
        let created = store.create(&draft).await.unwrap();

        assert_eq!(created.id, "4");
        assert_eq!(store.items()[0].title, "Box breathing");
        assert_eq!(store.items().len(), 4);
    }

    #[tokio::test]
    async fn test_update_merges_locally() {
        let mut store = SessionStore::new(local());
        store.load().await;

        let updated = store
            .update("2", patch(json!({"price": "$120"})))
            .await
            .unwrap();
        assert_eq!(updated.price, "$120");

        let local = store.items().iter().find(|s| s.id == "2").unwrap();
        assert_eq!(local.price, "$120");
        assert!(!local.title.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_record_id() {
        let source = local();
        let mut store = SessionStore::new(source.clone());
        store.load().await;

        store
            .update("2", patch(json!({"id": "99", "price": "$1"})))
            .await
            .unwrap();

        let ids: Vec<_> = store.items().iter().map(|s| s.id.clone()).collect();
        assert!(ids.contains(&"2".to_string()));
        assert!(!ids.contains(&"99".to_string()));
        let stored = source.get(EntityKind::Sessions, "2").await.unwrap();
        assert_eq!(stored["price"], "$1");

        store.delete("2").await.unwrap();
        assert!(store.items().iter().all(|s| s.id != "2"));
    }

    #[tokio::test]
    async fn test_delete_removes_locally() {
        let mut store = TestimonialStore::new(local());
        store.load().await;

        store.delete("1").await.unwrap();
        assert_eq!(store.items().len(), 4);
        assert!(store.items().iter().all(|t| t.id != "1"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state() {
        let mut store = SessionStore::new(Arc::new(FailingSource));
        store.load().await;
        let before = store.items().to_vec();

        assert!(store.delete("1").await.is_err());
        assert!(store
            .update("1", patch(json!({"title": "x"})))
            .await
            .is_err());
        assert!(store.create(&Session::default()).await.is_err());
        assert_eq!(store.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = BlogStore::new(local());
        let blog = store.get("2").await.unwrap();
        assert_eq!(blog.id, "2");
        assert!(store.get("404").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_entity_extras() {
        let source = local();

        let mut sessions = SessionStore::new(source.clone());
        sessions.load().await;
        assert_eq!(sessions.by_tag(&SessionTag::Corporate).len(), 1);

        let mut blogs = BlogStore::new(source.clone());
        blogs.load().await;
        assert!(blogs.find("1").is_some());
        assert!(blogs.find("missing").is_none());

        let mut testimonials = TestimonialStore::new(source);
        testimonials.load().await;
        assert!(testimonials.featured().iter().all(|t| t.is_featured));
    }
}
