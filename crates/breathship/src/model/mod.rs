//! Record types for site content, sessions, blogs and testimonials.
//!
//! Backends exchange untyped [`Record`]s; the entity stores and the content
//! resolver convert them into the typed structs defined here through the
//! [`Entity`] trait.

pub mod blog;
pub mod content;
pub(crate) mod lenient;
pub mod session;
pub mod testimonial;
pub mod visibility;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub use blog::Blog;
pub use content::{ContentField, ContentMap, FieldType};
pub use session::{Session, SessionTag};
pub use testimonial::Testimonial;
pub use visibility::VisibilityFlag;

/// A raw row as exchanged with a data source.
pub type Record = serde_json::Map<String, Value>;

/// The collections a data source holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Editable site copy.
    Content,
    /// Bookable breathwork sessions.
    Sessions,
    /// Blog posts.
    Blogs,
    /// Client testimonials.
    Testimonials,
}

impl EntityKind {
    /// Every entity kind.
    pub const ALL: [Self; 4] = [
        Self::Content,
        Self::Sessions,
        Self::Blogs,
        Self::Testimonials,
    ];

    /// Table (or sheet) name of this kind.
    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Sessions => "sessions",
            Self::Blogs => "blogs",
            Self::Testimonials => "testimonials",
        }
    }

    /// Key under which the local store persists this collection.
    #[must_use]
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Content => "breathship_content",
            Self::Sessions => "breathship_sessions",
            Self::Blogs => "breathship_blogs",
            Self::Testimonials => "breathship_testimonials",
        }
    }

    /// Canonical ordering, in `PostgREST` `order=` syntax.
    #[must_use]
    pub fn order_clause(self) -> &'static str {
        match self {
            Self::Content => "section,display_order",
            Self::Sessions => "date,time",
            Self::Blogs | Self::Testimonials => "created_at.desc",
        }
    }

    /// Name of the field holding the record's visibility flag.
    #[must_use]
    pub fn visibility_field(self) -> &'static str {
        match self {
            Self::Blogs => "is_published",
            Self::Content | Self::Sessions | Self::Testimonials => "is_active",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// A typed record bound to one entity kind.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// The collection this entity lives in.
    const KIND: EntityKind;

    /// Record id; empty for drafts that have not been stored yet.
    fn id(&self) -> &str;

    /// The record's visibility flag.
    fn visibility(&self) -> &VisibilityFlag;

    /// Dataset substituted when the backing store cannot be read.
    fn fallback() -> Vec<Self>;

    /// Whether the record is shown to site visitors.
    fn is_visible(&self) -> bool {
        self.visibility().is_visible()
    }

    /// Convert a raw record into the typed entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not have the entity's shape.
    fn from_record(record: Record) -> Result<Self> {
        serde_json::from_value(Value::Object(record))
            .map_err(|e| Error::invalid_record(Self::KIND, e.to_string()))
    }

    /// Convert the entity into a raw record.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not serialize to a JSON object.
    fn to_record(&self) -> Result<Record> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::internal(format!(
                "{} serialized to a non-object: {other}",
                Self::KIND
            ))),
        }
    }
}

/// Read a record's id as a string, accepting numeric ids.
#[must_use]
pub fn record_id(record: &Record) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Overwrite `target`'s keys with those of `patch`.
pub fn merge_record(target: &mut Record, patch: &Record) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

/// Keep the records whose visibility flag lets them through.
#[must_use]
pub fn visible<E: Entity>(items: Vec<E>) -> Vec<E> {
    items.into_iter().filter(Entity::is_visible).collect()
}
