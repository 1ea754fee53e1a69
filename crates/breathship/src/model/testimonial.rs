//! Client testimonials.

use serde::{Deserialize, Serialize};

use super::{lenient, Entity, EntityKind, VisibilityFlag};
use crate::defaults;

/// A quote from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    /// Backend id; empty for drafts.
    #[serde(
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,

    /// Client name.
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,

    /// Quote text.
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,

    /// Portrait URL.
    #[serde(default, deserialize_with = "lenient::text")]
    pub image_link: String,

    /// Visibility flag.
    #[serde(default, skip_serializing_if = "VisibilityFlag::is_unset")]
    pub is_active: VisibilityFlag,

    /// Whether the testimonial is highlighted on the home page.
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_featured: bool,

    /// Creation time, when the backend tracks it.
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl Entity for Testimonial {
    const KIND: EntityKind = EntityKind::Testimonials;

    fn id(&self) -> &str {
        &self.id
    }

    fn visibility(&self) -> &VisibilityFlag {
        &self.is_active
    }

    fn fallback() -> Vec<Self> {
        defaults::testimonials()
    }
}
