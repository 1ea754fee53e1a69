//! Blog posts.

use serde::{Deserialize, Serialize};

use super::{lenient, Entity, EntityKind, VisibilityFlag};
use crate::defaults;

/// A blog post. `content` holds rendered HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    /// Backend id; empty for drafts.
    #[serde(
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,

    /// Title.
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,

    /// Teaser shown on listing pages.
    #[serde(default, deserialize_with = "lenient::text")]
    pub excerpt: String,

    /// Body as HTML.
    #[serde(default, deserialize_with = "lenient::text")]
    pub content: String,

    /// Cover image URL.
    #[serde(default, deserialize_with = "lenient::text")]
    pub image_link: String,

    /// Publication flag.
    #[serde(default, skip_serializing_if = "VisibilityFlag::is_unset")]
    pub is_published: VisibilityFlag,

    /// Creation time, when the backend tracks it.
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl Entity for Blog {
    const KIND: EntityKind = EntityKind::Blogs;

    fn id(&self) -> &str {
        &self.id
    }

    fn visibility(&self) -> &VisibilityFlag {
        &self.is_published
    }

    fn fallback() -> Vec<Self> {
        defaults::blogs()
    }
}
