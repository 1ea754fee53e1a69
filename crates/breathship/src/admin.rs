//! Admin editors.
//!
//! Every mutation the admin surface offers goes through [`AdminConsole`],
//! which refuses to act until its [`AdminGate`] is unlocked and reports
//! each outcome as user-facing [`Feedback`] instead of an error.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::defaults;
use crate::error::{Error, Result};
use crate::events::{RefreshBus, RefreshEvent};
use crate::model::{
    Blog, ContentField, Entity, EntityKind, Record, Session, Testimonial,
};
use crate::resolver::ContentResolver;
use crate::source::DataSource;
use crate::store::{BlogStore, EntityStore, SessionStore, TestimonialStore};

/// Four-digit access code check.
#[derive(Debug, Clone)]
pub struct AdminGate {
    code: String,
    unlocked: bool,
}

impl AdminGate {
    /// Create a locked gate for `code`.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            unlocked: false,
        }
    }

    /// Create a locked gate for the configured code.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.admin.access_code.clone())
    }

    /// Compare `attempt` with the code without changing state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccessDenied`] on mismatch.
    pub fn verify(&self, attempt: &str) -> Result<()> {
        if attempt == self.code {
            Ok(())
        } else {
            Err(Error::AccessDenied)
        }
    }

    /// Unlock the gate if `attempt` matches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccessDenied`] on mismatch; the gate stays locked.
    pub fn unlock(&mut self, attempt: &str) -> Result<()> {
        self.verify(attempt)?;
        self.unlocked = true;
        Ok(())
    }

    /// Lock the gate again.
    pub fn lock(&mut self) {
        self.unlocked = false;
    }

    /// Whether the gate is open.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

/// Outcome category shown to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// The action went through.
    Success,
    /// The action failed.
    Error,
}

/// A message for the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Success or failure.
    pub kind: FeedbackKind,
    /// Message in the editor's terms.
    pub message: String,
    /// Underlying cause, for failures.
    pub detail: Option<String>,
}

impl Feedback {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message: message.into(),
            detail: None,
        }
    }

    fn error(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: message.into(),
            detail,
        }
    }

    /// Whether the action went through.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.kind == FeedbackKind::Success
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({detail})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

fn noun(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Content => "Content",
        EntityKind::Sessions => "Session",
        EntityKind::Blogs => "Blog post",
        EntityKind::Testimonials => "Testimonial",
    }
}

async fn create_in<E: Entity>(store: &mut EntityStore<E>, draft: &E) -> Feedback {
    match store.create(draft).await {
        Ok(created) => Feedback::success(format!(
            "{} created successfully! (id {})",
            noun(E::KIND),
            created.id()
        )),
        Err(e) => Feedback::error(
            format!("Error creating {}. Please try again.", noun(E::KIND).to_lowercase()),
            Some(e.to_string()),
        ),
    }
}

async fn update_in<E: Entity>(store: &mut EntityStore<E>, id: &str, patch: Record) -> Feedback {
    match store.update(id, patch).await {
        Ok(_) => Feedback::success(format!("{} updated successfully!", noun(E::KIND))),
        Err(e) => Feedback::error(
            format!("Error updating {}. Please try again.", noun(E::KIND).to_lowercase()),
            Some(e.to_string()),
        ),
    }
}

async fn delete_in<E: Entity>(store: &mut EntityStore<E>, id: &str) -> Feedback {
    match store.delete(id).await {
        Ok(()) => Feedback::success(format!("{} deleted successfully!", noun(E::KIND))),
        Err(e) => Feedback::error(
            format!("Error deleting {}. Please try again.", noun(E::KIND).to_lowercase()),
            Some(e.to_string()),
        ),
    }
}

/// Gated mutation surface over content and the entity collections.
#[derive(Debug)]
pub struct AdminConsole {
    gate: AdminGate,
    source: Arc<dyn DataSource>,
    bus: RefreshBus,
    resolver: ContentResolver,
    sessions: SessionStore,
    blogs: BlogStore,
    testimonials: TestimonialStore,
}

impl AdminConsole {
    /// Create a locked console over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn DataSource>, bus: RefreshBus, gate: AdminGate) -> Self {
        Self {
            resolver: ContentResolver::new(source.clone(), bus.clone()),
            sessions: SessionStore::new(source.clone()),
            blogs: BlogStore::new(source.clone()),
            testimonials: TestimonialStore::new(source.clone()),
            gate,
            source,
            bus,
        }
    }

    /// Try to unlock the console.
    pub fn unlock(&mut self, code: &str) -> Feedback {
        match self.gate.unlock(code) {
            Ok(()) => {
                info!("Admin console unlocked");
                Feedback::success("Welcome back!")
            }
            Err(e) => {
                warn!("Rejected admin access code");
                Feedback::error("Invalid password. Please try again.", Some(e.to_string()))
            }
        }
    }

    /// Lock the console.
    pub fn lock(&mut self) {
        self.gate.lock();
    }

    /// Whether the console accepts mutations.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    fn locked(&self) -> Option<Feedback> {
        (!self.gate.is_unlocked()).then(|| {
            Feedback::error(
                "Admin access required.",
                Some(Error::AccessDenied.to_string()),
            )
        })
    }

    /// The content resolver edits go through.
    pub fn resolver(&mut self) -> &mut ContentResolver {
        &mut self.resolver
    }

    /// Every content row for the editing table, inactive ones included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccessDenied`] while the console is locked.
    pub async fn content_fields(&self) -> Result<Vec<ContentField>> {
        if !self.gate.is_unlocked() {
            return Err(Error::AccessDenied);
        }
        Ok(self.resolver.all_fields().await)
    }

    /// Change one content value.
    pub async fn update_content(&mut self, field_name: &str, value: &str) -> Feedback {
        if let Some(denied) = self.locked() {
            return denied;
        }
        let outcome = self.resolver.update(field_name, value).await;
        if outcome.success {
            Feedback::success("Content updated successfully! Changes are live on the website.")
        } else {
            Feedback::error("Error updating content. Please try again.", outcome.message)
        }
    }

    /// Flip a content field between active and inactive.
    pub async fn toggle_content_field(&mut self, field_name: &str) -> Feedback {
        if let Some(denied) = self.locked() {
            return denied;
        }
        match self.toggle(field_name).await {
            Ok(now_active) => {
                self.resolver.resolve().await;
                self.bus.publish(RefreshEvent::ContentReplaced);
                let state = if now_active { "activated" } else { "deactivated" };
                info!("Content field {field_name} {state}");
                Feedback::success(format!("Content {state} successfully!"))
            }
            Err(e) => Feedback::error("Error updating content status", Some(e.to_string())),
        }
    }

    async fn toggle(&self, field_name: &str) -> Result<bool> {
        let rows = self.source.list(EntityKind::Content).await?;
        let field = rows
            .into_iter()
            .filter_map(|row| ContentField::from_record(row).ok())
            .find(|field| field.field_name == field_name)
            .ok_or_else(|| Error::FieldNotFound(field_name.to_string()))?;

        let now_active = !field.is_visible();
        let mut patch = Record::new();
        patch.insert("is_active".to_string(), Value::Bool(now_active));
        self.source
            .update(EntityKind::Content, &field.id, patch)
            .await?;
        Ok(now_active)
    }

    /// Write every content field back to its built-in value.
    pub async fn reset_content(&mut self) -> Feedback {
        if let Some(denied) = self.locked() {
            return denied;
        }
        let mut failures = Vec::new();
        for field in defaults::content_fields() {
            let outcome = self
                .resolver
                .update(&field.field_name, &field.field_value)
                .await;
            if !outcome.success {
                failures.push(field.field_name);
            }
        }
        self.resolver.resolve().await;

        if failures.is_empty() {
            Feedback::success("Content reset to default successfully!")
        } else {
            Feedback::error(
                "Error resetting content. Please try again.",
                Some(format!("{} fields not reset: {}", failures.len(), failures.join(", "))),
            )
        }
    }

    /// Export every content row to a JSON file.
    pub async fn export_content(&self, path: Option<&Path>) -> Feedback {
        if let Some(denied) = self.locked() {
            return denied;
        }
        match self.resolver.export_to(path).await {
            Ok(written) => Feedback::success(format!(
                "Content exported successfully to {}",
                written.display()
            )),
            Err(e) => Feedback::error(
                "Error exporting content. Please try again.",
                Some(e.to_string()),
            ),
        }
    }

    /// Import a snapshot produced by [`export_content`](Self::export_content).
    pub async fn import_content(&mut self, json: &str) -> Feedback {
        if let Some(denied) = self.locked() {
            return denied;
        }
        match self.resolver.import_snapshot(json).await {
            Ok(report) => Feedback::success(format!(
                "Content imported successfully! {} applied, {} skipped.",
                report.applied, report.skipped
            )),
            Err(e) => Feedback::error(
                "Error importing content. Please check the file format.",
                Some(e.to_string()),
            ),
        }
    }

    /// Every session, hidden ones included.
    pub async fn sessions(&mut self) -> &[Session] {
        self.sessions.load_all().await
    }

    /// Every blog post, unpublished ones included.
    pub async fn blogs(&mut self) -> &[Blog] {
        self.blogs.load_all().await
    }

    /// Every testimonial, hidden ones included.
    pub async fn testimonials(&mut self) -> &[Testimonial] {
        self.testimonials.load_all().await
    }

    /// Add a session.
    pub async fn create_session(&mut self, draft: &Session) -> Feedback {
        match self.locked() {
            Some(denied) => denied,
            None => create_in(&mut self.sessions, draft).await,
        }
    }

    /// Change fields of a session.
    pub async fn update_session(&mut self, id: &str, patch: Record) -> Feedback {
        match self.locked() {
            Some(denied) => denied,
            None => update_in(&mut self.sessions, id, patch).await,
        }
    }

    /// Remove a session.
    pub async fn delete_session(&mut self, id: &str) -> Feedback {
        match self.locked() {
            Some(denied) => denied,
            None => delete_in(&mut self.sessions, id).await,
        }
    }

    /// Add a blog post.
    pub async fn create_blog(&mut self, draft: &Blog) -> Feedback {
        match self.locked() {
            Some(denied) => denied,
            None => create_in(&mut self.blogs, draft).await,
        }
    }

    /// Change fields of a blog post.
    pub async fn update_blog(&mut self, id: &str, patch: Record) -> Feedback {
        match self.locked() {
            Some(denied) => denied,
            None => update_in(&mut self.blogs, id, patch).await,
        }
    }

    /// Remove a blog post.
    pub async fn delete_blog(&mut self, id: &str) -> Feedback {
        match self.locked() {
            Some(denied) => denied,
            None => delete_in(&mut self.blogs, id).await,
        }
    }

    /// Add a testimonial.
    pub async fn create_testimonial(&mut self, draft: &Testimonial) -> Feedback {
        match self.locked() {
            Some(denied) => denied,
            None => create_in(&mut self.testimonials, draft).await,
        }
    }

    /// Change fields of a testimonial.
    pub async fn update_testimonial(&mut self, id: &str, patch: Record) -> Feedback {
        match self.locked() {
            Some(denied) => denied,
            None => update_in(&mut self.testimonials, id, patch).await,
        }
    }

    /// Remove a testimonial.
    pub async fn delete_testimonial(&mut self, id: &str) -> Feedback {
        match self.locked() {
            Some(denied) => denied,
            None => delete_in(&mut self.testimonials, id).await,
        }
    }
}
